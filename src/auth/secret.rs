//! Redacted holder for the Steam Web API key and issued access tokens.

// self
use crate::_prelude::*;

/// Secret string that formats as `<redacted>`.
///
/// Wraps the descriptor's Web API key and every [`Credential`](crate::auth::Credential) access
/// token, so neither shows up in `Debug` output of providers, fetchers, or credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for the `key` query parameter or a bearer header.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `true` for an empty or whitespace-only value, such as an unset `STEAM_API_KEY`.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
