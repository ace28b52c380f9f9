//! Relying-party verification primitive.
//!
//! [`RelyingParty`] is the seam between the cheap field checks done by
//! [`AssertionVerifier`](crate::openid::AssertionVerifier) and the protocol-level check that
//! needs the network. [`DirectVerification`] is the built-in implementation:
//!
//! 1. `openid.mode` must be `id_res` (`cancel`/`setup_needed` are negative, `error` fails).
//! 2. `openid.return_to` must match the configured callback and the realm, and every query
//!    parameter it carries must be present in the callback.
//! 3. `openid.signed` must cover the fields OpenID 2.0 §10.1 requires.
//! 4. `openid.response_nonce` must be recent.
//! 5. The assertion is echoed to the OP endpoint with `openid.mode=check_authentication`; only
//!    `is_valid:true` authenticates it.
//!
//! Discovery on the claimed identifier is skipped: Steam has a single, fixed OP endpoint and the
//! verifier pins `openid.op_endpoint` to it before this primitive runs.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use time::format_description::well_known::Rfc3339;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{self, ProviderHttpClient},
	openid::CallbackQuery,
};

/// Default freshness window for `openid.response_nonce`.
pub const DEFAULT_NONCE_MAX_AGE: Duration = Duration::minutes(5);

const NONCE_TIMESTAMP_LEN: usize = 20;

/// Future returned by [`RelyingParty::verify_assertion`].
pub type VerifyFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AssertionResult, VerificationError>> + 'a + Send>>;

/// Protocol-level verification capability used by the assertion verifier.
pub trait RelyingParty
where
	Self: Send + Sync,
{
	/// Verifies the assertion carried by `request`.
	///
	/// `Ok` carries the provider's answer (which may be negative); `Err` means the answer could
	/// not be obtained.
	fn verify_assertion<'a>(&'a self, request: VerificationRequest<'a>) -> VerifyFuture<'a>;
}

/// Inputs handed to a [`RelyingParty`].
#[derive(Clone, Copy, Debug)]
pub struct VerificationRequest<'a> {
	/// Absolute URL the callback arrived on, which may be a relay target of `return_to`.
	pub callback_url: &'a Url,
	/// Parsed callback query.
	pub query: &'a CallbackQuery,
	/// Configured return-to URL.
	pub return_to: &'a Url,
	/// Configured realm.
	pub realm: &'a str,
}

/// Outcome reported by a [`RelyingParty`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionResult {
	/// Whether the provider vouched for the assertion.
	pub authenticated: bool,
	/// Claimed identifier asserted by the provider.
	pub claimed_identifier: Option<String>,
}
impl AssertionResult {
	/// Positive answer for `claimed_identifier`.
	pub fn authenticated(claimed_identifier: impl Into<String>) -> Self {
		Self { authenticated: true, claimed_identifier: Some(claimed_identifier.into()) }
	}

	/// Negative answer.
	pub fn unauthenticated() -> Self {
		Self { authenticated: false, claimed_identifier: None }
	}
}

/// Failures raised while obtaining the provider's answer.
#[derive(Debug, ThisError)]
pub enum VerificationError {
	/// Direct verification request could not be sent.
	#[error("Direct verification request failed.")]
	Transport(#[from] TransportError),
	/// Direct verification request could not be built.
	#[error("Direct verification request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// OP endpoint answered with a non-success status.
	#[error("OP endpoint answered direct verification with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// OP endpoint returned a body that is not key-value form.
	#[error("OP endpoint returned a malformed key-value response.")]
	MalformedResponse,
	/// Provider sent `openid.mode=error`.
	#[error("Provider reported an error: {message}.")]
	Provider {
		/// Value of `openid.error`.
		message: String,
	},
	/// `openid.mode` is missing or unknown.
	#[error("Unexpected OpenID mode: {mode:?}.")]
	UnexpectedMode {
		/// Received mode, if any.
		mode: Option<String>,
	},
	/// A required field is absent.
	#[error("Positive assertion is missing `{field}`.")]
	MissingField {
		/// Missing field name.
		field: &'static str,
	},
	/// A field that must be signed is not listed in `openid.signed`.
	#[error("Positive assertion does not sign `{field}`.")]
	UnsignedField {
		/// Unsigned field name.
		field: &'static str,
	},
	/// `openid.return_to` does not match the configured callback or realm.
	#[error("Assertion return_to does not match the callback.")]
	ReturnToMismatch,
	/// `openid.response_nonce` cannot be parsed or lies in the future.
	#[error("Assertion nonce is invalid.")]
	NonceInvalid,
	/// `openid.response_nonce` is older than the freshness window.
	#[error("Assertion nonce has expired.")]
	NonceExpired,
}

/// Built-in relying party performing OpenID 2.0 direct verification.
pub struct DirectVerification<C>
where
	C: ?Sized + ProviderHttpClient,
{
	http_client: Arc<C>,
	op_endpoint: Url,
	nonce_max_age: Duration,
}
impl<C> DirectVerification<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a verifier that confirms assertions with `op_endpoint`.
	pub fn new(http_client: impl Into<Arc<C>>, op_endpoint: Url) -> Self {
		Self { http_client: http_client.into(), op_endpoint, nonce_max_age: DEFAULT_NONCE_MAX_AGE }
	}

	/// Overrides the nonce freshness window.
	pub fn with_nonce_max_age(mut self, max_age: Duration) -> Self {
		self.nonce_max_age = max_age;

		self
	}

	async fn verify(
		&self,
		request: VerificationRequest<'_>,
	) -> Result<AssertionResult, VerificationError> {
		let query = request.query;

		match query.get("openid.mode") {
			Some("id_res") => (),
			Some("cancel" | "setup_needed") => return Ok(AssertionResult::unauthenticated()),
			Some("error") =>
				return Err(VerificationError::Provider {
					message: query.get("openid.error").unwrap_or("unknown error").into(),
				}),
			other => return Err(VerificationError::UnexpectedMode { mode: other.map(Into::into) }),
		}

		check_return_to(&request)?;
		check_signed_fields(query)?;
		check_nonce(query, self.nonce_max_age, OffsetDateTime::now_utc())?;

		if !self.check_authentication(query).await? {
			return Ok(AssertionResult::unauthenticated());
		}

		Ok(match query.get("openid.claimed_id") {
			Some(claimed_id) => AssertionResult::authenticated(claimed_id),
			None => AssertionResult { authenticated: true, claimed_identifier: None },
		})
	}

	async fn check_authentication(&self, query: &CallbackQuery) -> Result<bool, VerificationError> {
		let body = {
			let mut form = form_urlencoded::Serializer::new(String::new());

			for (key, value) in query.openid_fields().filter(|(key, _)| *key != "openid.mode") {
				form.append_pair(key, value);
			}

			form.append_pair("openid.mode", "check_authentication");
			form.finish()
		};
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.op_endpoint.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "text/plain")
			.body(body.into_bytes())?;
		let response = http::execute(self.http_client.as_ref(), request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(VerificationError::Status { status: status.as_u16() });
		}

		let fields = parse_key_value(response.body())?;

		Ok(fields.get("is_valid").map(String::as_str) == Some("true"))
	}
}
impl<C> RelyingParty for DirectVerification<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn verify_assertion<'a>(&'a self, request: VerificationRequest<'a>) -> VerifyFuture<'a> {
		Box::pin(self.verify(request))
	}
}
impl<C> Debug for DirectVerification<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DirectVerification")
			.field("op_endpoint", &self.op_endpoint.as_str())
			.field("nonce_max_age", &self.nonce_max_age)
			.finish()
	}
}

fn check_return_to(request: &VerificationRequest) -> Result<(), VerificationError> {
	let asserted = request
		.query
		.get("openid.return_to")
		.ok_or(VerificationError::MissingField { field: "openid.return_to" })?;
	let asserted = Url::parse(asserted).map_err(|_| VerificationError::ReturnToMismatch)?;
	let expected = request.return_to;

	if asserted.scheme() != expected.scheme()
		|| asserted.host_str() != expected.host_str()
		|| asserted.port_or_known_default() != expected.port_or_known_default()
		|| asserted.path() != expected.path()
		|| !realm_covers(request.realm, &asserted)
	{
		return Err(VerificationError::ReturnToMismatch);
	}

	// Parameters baked into return_to must survive the round-trip unchanged.
	for (key, value) in asserted.query_pairs() {
		if request.query.get(&key) != Some(&*value) {
			return Err(VerificationError::ReturnToMismatch);
		}
	}

	Ok(())
}

/// Applies the OpenID 2.0 §9.2.1 realm match, including `*.` wildcard hosts.
fn realm_covers(realm: &str, return_to: &Url) -> bool {
	let wildcard = realm.contains("://*.");
	let Ok(realm) = Url::parse(&realm.replacen("://*.", "://", 1)) else {
		return false;
	};
	let (Some(realm_host), Some(host)) = (realm.host_str(), return_to.host_str()) else {
		return false;
	};
	let host_matches = host == realm_host
		|| (wildcard && host.ends_with(&format!(".{realm_host}")));
	let realm_path = realm.path().trim_end_matches('/');
	let path_matches = return_to.path() == realm_path
		|| return_to.path().starts_with(&format!("{realm_path}/"))
		|| realm_path.is_empty();

	realm.scheme() == return_to.scheme()
		&& realm.port_or_known_default() == return_to.port_or_known_default()
		&& host_matches
		&& path_matches
}

fn check_signed_fields(query: &CallbackQuery) -> Result<(), VerificationError> {
	for field in ["openid.sig", "openid.signed", "openid.assoc_handle", "openid.response_nonce"] {
		if query.get(field).is_none() {
			return Err(VerificationError::MissingField { field });
		}
	}

	let signed = query.get("openid.signed").unwrap_or_default();
	let signed = signed.split(',').map(str::trim).collect::<Vec<_>>();
	let mut required = vec![
		("op_endpoint", "openid.op_endpoint"),
		("return_to", "openid.return_to"),
		("response_nonce", "openid.response_nonce"),
		("assoc_handle", "openid.assoc_handle"),
	];

	if query.get("openid.claimed_id").is_some() {
		required.push(("claimed_id", "openid.claimed_id"));
	}
	if query.get("openid.identity").is_some() {
		required.push(("identity", "openid.identity"));
	}

	for (name, field) in required {
		if !signed.contains(&name) {
			return Err(VerificationError::UnsignedField { field });
		}
	}

	Ok(())
}

fn check_nonce(
	query: &CallbackQuery,
	max_age: Duration,
	now: OffsetDateTime,
) -> Result<(), VerificationError> {
	let nonce = query
		.get("openid.response_nonce")
		.ok_or(VerificationError::MissingField { field: "openid.response_nonce" })?;
	let stamp = nonce.get(..NONCE_TIMESTAMP_LEN).ok_or(VerificationError::NonceInvalid)?;
	let issued_at =
		OffsetDateTime::parse(stamp, &Rfc3339).map_err(|_| VerificationError::NonceInvalid)?;

	if issued_at - now > max_age {
		return Err(VerificationError::NonceInvalid);
	}
	if now - issued_at > max_age {
		return Err(VerificationError::NonceExpired);
	}

	Ok(())
}

/// Parses OpenID key-value form (`key:value\n` lines).
fn parse_key_value(body: &[u8]) -> Result<BTreeMap<String, String>, VerificationError> {
	let body = std::str::from_utf8(body).map_err(|_| VerificationError::MalformedResponse)?;
	let mut fields = BTreeMap::new();

	for line in body.lines().filter(|line| !line.trim().is_empty()) {
		let (key, value) = line.split_once(':').ok_or(VerificationError::MalformedResponse)?;

		fields.insert(key.trim().to_owned(), value.trim().to_owned());
	}

	Ok(fields)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	const RETURN_TO: &str = "https://app.example.com/api/auth/callback/steam";

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	fn query(pairs: &[(&str, &str)]) -> CallbackQuery {
		pairs.iter().copied().collect()
	}

	fn request<'a>(
		callback_url: &'a Url,
		query: &'a CallbackQuery,
		return_to: &'a Url,
	) -> VerificationRequest<'a> {
		VerificationRequest { callback_url, query, return_to, realm: "https://app.example.com" }
	}

	#[test]
	fn key_value_form_is_parsed_line_by_line() {
		let fields = parse_key_value(b"ns:http://specs.openid.net/auth/2.0\nis_valid:true\n")
			.expect("Key-value body should parse.");

		assert_eq!(fields.get("is_valid").map(String::as_str), Some("true"));
		assert_eq!(fields.get("ns").map(String::as_str), Some("http://specs.openid.net/auth/2.0"));
		assert!(matches!(
			parse_key_value(b"<html>nope</html>"),
			Err(VerificationError::MalformedResponse)
		));
	}

	#[test]
	fn nonce_must_be_recent() {
		let now = datetime!(2024-05-01 12:00 UTC);
		let fresh = query(&[("openid.response_nonce", "2024-05-01T11:58:00Zabc")]);
		let stale = query(&[("openid.response_nonce", "2024-05-01T11:50:00Zabc")]);
		let future = query(&[("openid.response_nonce", "2024-05-01T12:30:00Zabc")]);
		let garbage = query(&[("openid.response_nonce", "yesterday")]);

		assert!(check_nonce(&fresh, DEFAULT_NONCE_MAX_AGE, now).is_ok());
		assert!(matches!(
			check_nonce(&stale, DEFAULT_NONCE_MAX_AGE, now),
			Err(VerificationError::NonceExpired)
		));
		assert!(matches!(
			check_nonce(&future, DEFAULT_NONCE_MAX_AGE, now),
			Err(VerificationError::NonceInvalid)
		));
		assert!(matches!(
			check_nonce(&garbage, DEFAULT_NONCE_MAX_AGE, now),
			Err(VerificationError::NonceInvalid)
		));
	}

	#[test]
	fn signed_list_must_cover_identity_fields() {
		let base = [
			("openid.sig", "sig"),
			("openid.assoc_handle", "1"),
			("openid.response_nonce", "n"),
			("openid.claimed_id", "c"),
			("openid.identity", "i"),
		];
		let mut complete = base.to_vec();

		complete.push((
			"openid.signed",
			"signed,op_endpoint,claimed_id,identity,return_to,response_nonce,assoc_handle",
		));

		assert!(check_signed_fields(&query(&complete)).is_ok());

		let mut partial = base.to_vec();

		partial.push(("openid.signed", "op_endpoint,return_to,response_nonce,assoc_handle"));

		assert!(matches!(
			check_signed_fields(&query(&partial)),
			Err(VerificationError::UnsignedField { field: "openid.claimed_id" })
		));
		assert!(matches!(
			check_signed_fields(&query(&base)),
			Err(VerificationError::MissingField { field: "openid.signed" })
		));
	}

	#[test]
	fn return_to_must_match_callback_and_realm() {
		let return_to = url(RETURN_TO);
		let callback = url(&format!("{RETURN_TO}?openid.mode=id_res"));
		let good = query(&[("openid.return_to", RETURN_TO)]);
		let other_path = query(&[("openid.return_to", "https://app.example.com/elsewhere")]);
		let other_host =
			query(&[("openid.return_to", "https://evil.example/api/auth/callback/steam")]);
		let empty = CallbackQuery::default();

		assert!(check_return_to(&request(&callback, &good, &return_to)).is_ok());
		assert!(matches!(
			check_return_to(&request(&callback, &other_path, &return_to)),
			Err(VerificationError::ReturnToMismatch)
		));
		assert!(matches!(
			check_return_to(&request(&callback, &other_host, &return_to)),
			Err(VerificationError::ReturnToMismatch)
		));
		assert!(matches!(
			check_return_to(&request(&callback, &empty, &return_to)),
			Err(VerificationError::MissingField { field: "openid.return_to" })
		));
	}

	#[test]
	fn relayed_callback_path_is_accepted() {
		let return_to = url("https://app.example.com/api/auth/verify");
		let relayed = url("https://app.example.com/api/auth/callback/steam?code=123");
		let asserted = query(&[
			("openid.return_to", "https://app.example.com/api/auth/verify"),
			("code", "123"),
		]);

		assert!(check_return_to(&request(&relayed, &asserted, &return_to)).is_ok());
	}

	#[test]
	fn return_to_parameters_must_round_trip() {
		let return_to = url(RETURN_TO);
		let callback = url(RETURN_TO);
		let with_state = format!("{RETURN_TO}?state=abc");
		let kept = query(&[("openid.return_to", with_state.as_str()), ("state", "abc")]);
		let dropped = query(&[("openid.return_to", with_state.as_str())]);

		assert!(check_return_to(&request(&callback, &kept, &return_to)).is_ok());
		assert!(matches!(
			check_return_to(&request(&callback, &dropped, &return_to)),
			Err(VerificationError::ReturnToMismatch)
		));
	}

	#[test]
	fn realm_matching_follows_openid_rules() {
		let return_to = url("https://app.example.com/auth/callback");

		assert!(realm_covers("https://app.example.com", &return_to));
		assert!(realm_covers("https://app.example.com/auth/", &return_to));
		assert!(realm_covers("https://*.example.com", &return_to));
		assert!(realm_covers("https://*.example.com", &url("https://example.com/auth")));
		assert!(!realm_covers("https://*.example.com", &url("https://badexample.com/auth")));
		assert!(!realm_covers("http://app.example.com", &return_to));
		assert!(!realm_covers("https://app.example.com/other", &return_to));
		assert!(!realm_covers("https://example.com", &return_to));
	}
}
