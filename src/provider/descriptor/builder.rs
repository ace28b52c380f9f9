// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
	openid::{self, DEFAULT_NONCE_MAX_AGE, STEAM_LOGIN_URL},
	profile::STEAM_PLAYER_SUMMARIES_URL,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderStyle},
};

/// Variable holding the Steam Web API key.
pub const API_KEY_VAR: &str = "STEAM_API_KEY";
/// Variable holding the absolute callback URL.
pub const CALLBACK_URL_VAR: &str = "STEAM_CALLBACK_URL";

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// The Steam Web API key is mandatory.
	#[error("Missing Steam API key.")]
	MissingApiKey,
	/// The callback URL is mandatory.
	#[error("Missing callback URL.")]
	MissingCallbackUrl,
	/// The callback URL must be an absolute http(s) URL without a fragment.
	#[error("Callback URL must be an absolute http(s) URL without a fragment: {url}.")]
	InvalidCallbackUrl {
		/// Rejected value.
		url: String,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The nonce freshness window must be positive.
	#[error("Nonce max age must be positive.")]
	InvalidNonceMaxAge,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Display name.
	pub name: String,
	/// Sign-in button colors.
	pub style: ProviderStyle,
	/// Callback URL (required).
	pub callback_url: Option<Url>,
	/// Steam Web API key (required).
	pub api_key: Option<TokenSecret>,
	/// OpenID OP endpoint.
	pub login_endpoint: Url,
	/// Player summaries endpoint.
	pub profile_endpoint: Url,
	/// Maximum accepted age of `openid.response_nonce`.
	pub nonce_max_age: Duration,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier and Steam's public endpoints.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			name: "Steam".into(),
			style: ProviderStyle::default(),
			callback_url: None,
			api_key: None,
			login_endpoint: steam_url(STEAM_LOGIN_URL),
			profile_endpoint: steam_url(STEAM_PLAYER_SUMMARIES_URL),
			nonce_max_age: DEFAULT_NONCE_MAX_AGE,
		}
	}

	/// Seeds a `steam` builder from a key lookup such as `|key| std::env::var(key).ok()`.
	///
	/// Reads [`API_KEY_VAR`] and [`CALLBACK_URL_VAR`]. Absent values are reported by
	/// [`ProviderDescriptorBuilder::build`]; an unparsable callback URL fails here.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderDescriptorError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = Self::new(ProviderId::steam());

		if let Some(api_key) = lookup(API_KEY_VAR) {
			builder = builder.api_key(api_key);
		}
		if let Some(raw) = lookup(CALLBACK_URL_VAR) {
			let url = Url::parse(raw.trim())
				.map_err(|_| ProviderDescriptorError::InvalidCallbackUrl { url: raw.clone() })?;

			builder = builder.callback_url(url);
		}

		Ok(builder)
	}

	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();

		self
	}

	/// Overrides the sign-in button colors.
	pub fn style(mut self, style: ProviderStyle) -> Self {
		self.style = style;

		self
	}

	/// Sets the callback URL.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Sets the Steam Web API key.
	pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(TokenSecret::new(api_key));

		self
	}

	/// Overrides the OpenID OP endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = url;

		self
	}

	/// Overrides the player summaries endpoint.
	pub fn profile_endpoint(mut self, url: Url) -> Self {
		self.profile_endpoint = url;

		self
	}

	/// Overrides the nonce freshness window.
	pub fn nonce_max_age(mut self, max_age: Duration) -> Self {
		self.nonce_max_age = max_age;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let api_key = self
			.api_key
			.filter(|key| !key.is_blank())
			.ok_or(ProviderDescriptorError::MissingApiKey)?;
		let callback_url = self.callback_url.ok_or(ProviderDescriptorError::MissingCallbackUrl)?;
		let realm = openid::realm_of(&callback_url);
		let endpoints =
			ProviderEndpoints { login: self.login_endpoint, profile: self.profile_endpoint };
		let descriptor = ProviderDescriptor {
			id: self.id,
			name: self.name,
			style: self.style,
			callback_url,
			realm,
			api_key,
			endpoints,
			nonce_max_age: self.nonce_max_age,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_callback_url(&self.callback_url)?;
		validate_endpoint("login", &self.endpoints.login)?;
		validate_endpoint("profile", &self.endpoints.profile)?;

		if !self.nonce_max_age.is_positive() {
			return Err(ProviderDescriptorError::InvalidNonceMaxAge);
		}

		Ok(())
	}
}

fn steam_url(raw: &'static str) -> Url {
	Url::parse(raw).expect("Built-in Steam URL must parse.")
}

fn validate_callback_url(url: &Url) -> Result<(), ProviderDescriptorError> {
	let absolute_http = matches!(url.scheme(), "http" | "https") && url.has_host();

	if absolute_http && url.fragment().is_none() {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InvalidCallbackUrl { url: url.to_string() })
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CALLBACK: &str = "https://app.example.com/api/auth/callback/steam";

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	fn lookup(
		entries: &'static [(&'static str, &'static str)],
	) -> impl Fn(&str) -> Option<String> {
		move |key: &str| {
			entries.iter().find(|(name, _)| *name == key).map(|(_, value)| (*value).into())
		}
	}

	#[test]
	fn defaults_point_at_steam() {
		let descriptor = ProviderDescriptor::builder(ProviderId::steam())
			.api_key("key")
			.callback_url(url(CALLBACK))
			.build()
			.expect("Descriptor should build.");

		assert_eq!(descriptor.name, "Steam");
		assert_eq!(descriptor.style, ProviderStyle { bg: "#000".into(), text: "#fff".into() });
		assert_eq!(descriptor.realm, "https://app.example.com");
		assert_eq!(descriptor.endpoints.login.as_str(), STEAM_LOGIN_URL);
		assert_eq!(descriptor.endpoints.profile.as_str(), STEAM_PLAYER_SUMMARIES_URL);
		assert_eq!(descriptor.nonce_max_age, DEFAULT_NONCE_MAX_AGE);
		assert_eq!(
			descriptor.authorization_request().url().origin().ascii_serialization(),
			"https://steamcommunity.com"
		);
	}

	#[test]
	fn api_key_is_required_and_not_blank() {
		let missing = ProviderDescriptor::builder(ProviderId::steam())
			.callback_url(url(CALLBACK))
			.build();

		assert_eq!(missing, Err(ProviderDescriptorError::MissingApiKey));

		let blank = ProviderDescriptor::builder(ProviderId::steam())
			.api_key("  ")
			.callback_url(url(CALLBACK))
			.build();

		assert_eq!(blank, Err(ProviderDescriptorError::MissingApiKey));
	}

	#[test]
	fn callback_url_must_be_absolute_http_without_fragment() {
		let build = |callback: &str| {
			ProviderDescriptor::builder(ProviderId::steam())
				.api_key("key")
				.callback_url(url(callback))
				.build()
		};

		assert!(build("http://localhost:3000/api/auth/verify").is_ok());
		assert!(matches!(
			build("ftp://app.example.com/cb"),
			Err(ProviderDescriptorError::InvalidCallbackUrl { .. })
		));
		assert!(matches!(
			build("https://app.example.com/cb#frag"),
			Err(ProviderDescriptorError::InvalidCallbackUrl { .. })
		));
		assert_eq!(
			ProviderDescriptor::builder(ProviderId::steam()).api_key("key").build(),
			Err(ProviderDescriptorError::MissingCallbackUrl)
		);
	}

	#[test]
	fn endpoints_must_use_https() {
		let err = ProviderDescriptor::builder(ProviderId::steam())
			.api_key("key")
			.callback_url(url(CALLBACK))
			.profile_endpoint(url("http://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/"))
			.build()
			.expect_err("Plain HTTP profile endpoint must be rejected.");

		assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "profile", .. }));
	}

	#[test]
	fn nonce_window_must_be_positive() {
		let err = ProviderDescriptor::builder(ProviderId::steam())
			.api_key("key")
			.callback_url(url(CALLBACK))
			.nonce_max_age(Duration::ZERO)
			.build()
			.expect_err("Zero nonce window must be rejected.");

		assert_eq!(err, ProviderDescriptorError::InvalidNonceMaxAge);
	}

	#[test]
	fn lookup_reads_steam_variables() {
		let descriptor = ProviderDescriptorBuilder::from_lookup(lookup(&[
			(API_KEY_VAR, "from-env"),
			(CALLBACK_URL_VAR, CALLBACK),
		]))
		.expect("Lookup should parse the callback URL.")
		.build()
		.expect("Descriptor should build from lookup.");

		assert_eq!(descriptor.id, ProviderId::steam());
		assert_eq!(descriptor.api_key.expose(), "from-env");
		assert_eq!(descriptor.callback_url.as_str(), CALLBACK);

		let missing = ProviderDescriptorBuilder::from_lookup(lookup(&[(CALLBACK_URL_VAR, CALLBACK)]))
			.expect("Lookup without a key should still parse.")
			.build();

		assert_eq!(missing, Err(ProviderDescriptorError::MissingApiKey));
		assert!(matches!(
			ProviderDescriptorBuilder::from_lookup(lookup(&[(CALLBACK_URL_VAR, "/relative")])),
			Err(ProviderDescriptorError::InvalidCallbackUrl { .. })
		));
	}
}
