//! Crate-level error types shared across flows, verifiers, and profile lookups.

// self
use crate::{_prelude::*, openid::Rejection, provider::ProviderDescriptorError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Profile lookup failed after a credential was issued.
	#[error(transparent)]
	ProfileFetch(#[from] ProfileFetchError),

	/// The callback could not be verified as a genuine provider assertion.
	///
	/// The rendered message never reveals why; `reason` exists for logs only.
	#[error("Authentication failed: unable to verify Steam ID.")]
	AuthenticationFailed {
		/// Internal rejection reason.
		reason: Rejection,
	},
}
impl From<Rejection> for Error {
	fn from(reason: Rejection) -> Self {
		Self::AuthenticationFailed { reason }
	}
}

/// Configuration and validation failures raised before any request is served.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] ProviderDescriptorError),
	/// Credential signing key was rejected by the MAC implementation.
	#[error("Credential signing key is invalid.")]
	InvalidSigningKey,
	/// Signed credential lifetime is not positive or exceeds the supported maximum.
	#[error("Credential lifetime {ttl} is out of range.")]
	InvalidCredentialTtl {
		/// Rejected lifetime.
		ttl: Duration,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while fetching a player profile.
#[derive(Debug, ThisError)]
pub enum ProfileFetchError {
	/// Request could not be built or dispatched.
	#[error("Failed to fetch Steam profile.")]
	Transport(#[from] TransportError),
	/// Request could not be constructed.
	#[error("Failed to build the Steam profile request.")]
	Request(#[from] oauth2::http::Error),
	/// Profile endpoint answered with a non-success status.
	#[error("Failed to fetch Steam profile: HTTP {status}.")]
	Status {
		/// HTTP status code returned by the profile endpoint.
		status: u16,
	},
	/// Profile endpoint returned a body that does not match the player-summary shape.
	#[error("Profile endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
