//! `checkid_setup` redirect construction.

// self
use crate::{
	_prelude::*,
	openid::{IDENTIFIER_SELECT, MODE_CHECKID_SETUP, OPENID_NS},
};

/// Redirect sent to the provider's login endpoint.
///
/// Every field is derived from configuration; the value is rebuilt on demand and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Provider login (OP) endpoint.
	pub login_url: Url,
	/// Callback URL the provider redirects back to.
	pub return_to: Url,
	/// Origin of the callback URL.
	pub realm: String,
	/// Always [`MODE_CHECKID_SETUP`].
	pub mode: &'static str,
	/// Always [`OPENID_NS`].
	pub namespace: &'static str,
	/// Identifier-select sentinel sent as `openid.identity`.
	pub identity: &'static str,
	/// Identifier-select sentinel sent as `openid.claimed_id`.
	pub claimed_id: &'static str,
}
impl AuthorizationRequest {
	/// Builds the request for `return_to`; the realm is its origin.
	pub fn new(login_url: Url, return_to: Url) -> Self {
		let realm = realm_of(&return_to);

		Self {
			login_url,
			return_to,
			realm,
			mode: MODE_CHECKID_SETUP,
			namespace: OPENID_NS,
			identity: IDENTIFIER_SELECT,
			claimed_id: IDENTIFIER_SELECT,
		}
	}

	/// Query parameters appended to the login endpoint, in wire order.
	pub fn params(&self) -> Vec<(&'static str, String)> {
		vec![
			("openid.mode", self.mode.into()),
			("openid.ns", self.namespace.into()),
			("openid.identity", self.identity.into()),
			("openid.claimed_id", self.claimed_id.into()),
			("openid.return_to", self.return_to.as_str().into()),
			("openid.realm", self.realm.clone()),
		]
	}

	/// Fully-formed redirect URL.
	pub fn url(&self) -> Url {
		let mut url = self.login_url.clone();

		url.query_pairs_mut().extend_pairs(self.params());

		url
	}
}

/// Returns the OpenID realm for a callback URL (its ASCII origin, e.g. `https://app.example.com`).
pub fn realm_of(url: &Url) -> String {
	url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::openid::STEAM_LOGIN_URL;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn redirect_carries_fixed_protocol_fields() {
		let request = AuthorizationRequest::new(
			url(STEAM_LOGIN_URL),
			url("https://app.example.com/api/auth/callback/steam"),
		);
		let redirect = request.url();
		let pairs: HashMap<_, _> = redirect.query_pairs().into_owned().collect();

		assert_eq!(redirect.path(), "/openid/login");
		assert_eq!(pairs.len(), 6);
		assert_eq!(pairs.get("openid.mode"), Some(&"checkid_setup".into()));
		assert_eq!(pairs.get("openid.ns"), Some(&OPENID_NS.into()));
		assert_eq!(pairs.get("openid.identity"), Some(&IDENTIFIER_SELECT.into()));
		assert_eq!(pairs.get("openid.claimed_id"), Some(&IDENTIFIER_SELECT.into()));
		assert_eq!(
			pairs.get("openid.return_to"),
			Some(&"https://app.example.com/api/auth/callback/steam".into())
		);
		assert_eq!(pairs.get("openid.realm"), Some(&"https://app.example.com".into()));
	}

	#[test]
	fn realm_keeps_non_default_ports() {
		assert_eq!(realm_of(&url("http://localhost:3000/api/auth/verify")), "http://localhost:3000");
		assert_eq!(realm_of(&url("https://app.example.com:443/cb")), "https://app.example.com");
	}
}
