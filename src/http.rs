//! Transport primitives for provider round-trips.
//!
//! The crate talks to Steam twice per sign-in: the `check_authentication` POST issued by the
//! relying party and the player-summary GET issued by the profile fetcher. Both go through
//! [`ProviderHttpClient`], so downstream crates can swap the HTTP stack (or inject a fake in
//! tests) without touching protocol code.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports capable of executing provider requests.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across provider
/// instances without additional wrappers, and the handles they return must own whatever state
/// is required so their request futures remain `Send` for the lifetime of the in-flight
/// operation.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	///
	/// The request future returned by [`AsyncHttpClient::call`] must be `Send` so adapter
	/// futures inherit the same guarantee.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for the next request.
	fn handle(&self) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// OpenID direct verification must be answered by the OP endpoint itself; configure any custom
/// [`ReqwestClient`] to disable redirect following when the deployment requires it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Request handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Dispatches `request` through a fresh handle and normalizes transport failures.
pub(crate) async fn execute<C>(client: &C, request: HttpRequest) -> Result<HttpResponse, TransportError>
where
	C: ?Sized + ProviderHttpClient,
{
	let handle = client.handle();

	handle.call(request).await.map_err(map_transport_error)
}

fn map_transport_error<E>(err: HttpClientError<E>) -> TransportError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner },
		HttpClientError::Http(inner) => TransportError::network(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Other { message },
		_ => TransportError::Other { message: "Unhandled HTTP client error variant".into() },
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug)]
	struct Refused;
	impl Display for Refused {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Connection refused.")
		}
	}
	impl StdError for Refused {}

	#[test]
	fn transport_errors_keep_their_source() {
		let mapped = map_transport_error(HttpClientError::Reqwest(Box::new(Refused)));

		match mapped {
			TransportError::Network { source } => {
				assert_eq!(source.to_string(), "Connection refused.");
			},
			other => panic!("Expected a network error, got {other:?}."),
		}

		let mapped = map_transport_error::<Refused>(HttpClientError::Other("boom".into()));

		assert!(matches!(mapped, TransportError::Other { message } if message == "boom"));
	}
}
