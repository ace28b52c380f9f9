//! Callback assertion verification with fast-path rejection.
//!
//! [`AssertionVerifier::verify`] runs three stages and stops at the first failure:
//!
//! 1. Field checks that need no network: `openid.op_endpoint`, `openid.ns`, `openid.claimed_id`,
//!    and `openid.identity` must carry Steam's values. Forged or foreign callbacks end here and
//!    the relying party is never called.
//! 2. The [`RelyingParty`] primitive confirms the assertion with the provider. Its errors are
//!    logged, counted, and turned into [`Rejection::VerificationFailed`].
//! 3. The confirmed claimed identifier must match the canonical Steam pattern.

mod metrics;

pub use metrics::VerificationMetrics;

// self
use crate::{
	_prelude::*,
	auth::SteamId,
	obs,
	openid::{
		self, CallbackQuery, CallbackRequest, IDENTITY_PREFIX, OPENID_NS, RelyingParty,
		VerificationRequest,
	},
};

/// Why a callback was not accepted.
///
/// Rejections are ordinary outcomes, never crashes; they are logged but must not be shown to
/// end users.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Rejection {
	/// The callback request exposes no usable URL.
	#[error("Callback request carries no usable URL.")]
	MalformedCallback,
	/// A protocol field does not carry the expected provider value.
	#[error("Callback field `{field}` does not match the expected provider value.")]
	FieldMismatch {
		/// Offending field name.
		field: &'static str,
	},
	/// The provider did not vouch for the assertion.
	#[error("Provider did not confirm the assertion.")]
	NotAuthenticated,
	/// The confirmed claimed identifier is not a canonical Steam identifier.
	#[error("Claimed identifier is not a Steam community identifier.")]
	IdentifierMismatch,
	/// The relying-party primitive failed (network, protocol, or provider error).
	#[error("Assertion verification failed.")]
	VerificationFailed,
}
impl Rejection {
	/// Returns `true` when the rejection happened before contacting the provider.
	pub fn is_fast_path(&self) -> bool {
		matches!(self, Self::MalformedCallback | Self::FieldMismatch { .. })
	}
}

/// Verifies Steam OpenID callbacks and extracts the canonical [`SteamId`].
#[derive(Clone)]
pub struct AssertionVerifier {
	relying_party: Arc<dyn RelyingParty>,
	login_url: Url,
	return_to: Url,
	realm: String,
	metrics: Arc<VerificationMetrics>,
}
impl AssertionVerifier {
	/// Creates a verifier expecting assertions from `login_url` for callbacks to `return_to`.
	pub fn new(relying_party: Arc<dyn RelyingParty>, login_url: Url, return_to: Url) -> Self {
		let realm = openid::realm_of(&return_to);

		Self { relying_party, login_url, return_to, realm, metrics: Default::default() }
	}

	/// Shares an existing metrics recorder.
	pub fn with_metrics(mut self, metrics: Arc<VerificationMetrics>) -> Self {
		self.metrics = metrics;

		self
	}

	/// Counters describing past verification attempts.
	pub fn metrics(&self) -> &Arc<VerificationMetrics> {
		&self.metrics
	}

	/// Realm expected in assertions.
	pub fn realm(&self) -> &str {
		&self.realm
	}

	/// Verifies `request`, returning the Steam ID it proves or why it was refused.
	pub async fn verify<R>(&self, request: &R) -> Result<SteamId, Rejection>
	where
		R: ?Sized + CallbackRequest,
	{
		self.metrics.record_attempt();

		let result = self.run(request).await;

		match &result {
			Ok(_) => self.metrics.record_verified(),
			Err(reason) => {
				if reason.is_fast_path() {
					self.metrics.record_fast_path_rejection();
				} else {
					self.metrics.record_rejection();
				}

				obs::log_rejection(reason);
			},
		}

		result
	}

	/// Checks the four provider constants without touching the network.
	pub fn check_fields(&self, query: &CallbackQuery) -> Result<(), Rejection> {
		if query.get("openid.op_endpoint") != Some(self.login_url.as_str()) {
			return Err(Rejection::FieldMismatch { field: "openid.op_endpoint" });
		}
		if query.get("openid.ns") != Some(OPENID_NS) {
			return Err(Rejection::FieldMismatch { field: "openid.ns" });
		}
		if !query.get("openid.claimed_id").is_some_and(|value| value.starts_with(IDENTITY_PREFIX)) {
			return Err(Rejection::FieldMismatch { field: "openid.claimed_id" });
		}
		if !query.get("openid.identity").is_some_and(|value| value.starts_with(IDENTITY_PREFIX)) {
			return Err(Rejection::FieldMismatch { field: "openid.identity" });
		}

		Ok(())
	}

	async fn run<R>(&self, request: &R) -> Result<SteamId, Rejection>
	where
		R: ?Sized + CallbackRequest,
	{
		let callback_url = request.callback_url().ok_or(Rejection::MalformedCallback)?;
		let query = CallbackQuery::from_url(&callback_url);

		self.check_fields(&query)?;

		let verification = VerificationRequest {
			callback_url: &callback_url,
			query: &query,
			return_to: &self.return_to,
			realm: &self.realm,
		};
		let assertion = match self.relying_party.verify_assertion(verification).await {
			Ok(assertion) => assertion,
			Err(err) => {
				obs::log_verification_error(&err);
				self.metrics.record_primitive_failure();

				return Err(Rejection::VerificationFailed);
			},
		};

		if !assertion.authenticated {
			return Err(Rejection::NotAuthenticated);
		}

		let claimed_identifier = assertion.claimed_identifier.ok_or(Rejection::NotAuthenticated)?;

		openid::extract_steam_id(&claimed_identifier).ok_or(Rejection::IdentifierMismatch)
	}
}
impl Debug for AssertionVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssertionVerifier")
			.field("login_url", &self.login_url.as_str())
			.field("return_to", &self.return_to.as_str())
			.field("realm", &self.realm)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::openid::{AssertionResult, STEAM_LOGIN_URL, VerifyFuture};

	struct Unreachable;
	impl RelyingParty for Unreachable {
		fn verify_assertion<'a>(&'a self, _request: VerificationRequest<'a>) -> VerifyFuture<'a> {
			panic!("Fast-path rejections must not reach the relying party.")
		}
	}

	fn verifier() -> AssertionVerifier {
		AssertionVerifier::new(
			Arc::new(Unreachable),
			Url::parse(STEAM_LOGIN_URL).expect("Login URL should parse."),
			Url::parse("https://app.example.com/cb").expect("Callback URL should parse."),
		)
	}

	fn valid_query() -> Vec<(&'static str, &'static str)> {
		vec![
			("openid.op_endpoint", STEAM_LOGIN_URL),
			("openid.ns", OPENID_NS),
			("openid.claimed_id", "https://steamcommunity.com/openid/id/76561198000000000"),
			("openid.identity", "https://steamcommunity.com/openid/id/76561198000000000"),
		]
	}

	#[test]
	fn field_checks_name_the_first_mismatch() {
		let verifier = verifier();
		let query: CallbackQuery = valid_query().into_iter().collect();

		assert_eq!(verifier.check_fields(&query), Ok(()));

		for (index, field) in
			["openid.op_endpoint", "openid.ns", "openid.claimed_id", "openid.identity"]
				.into_iter()
				.enumerate()
		{
			let mut pairs = valid_query();

			pairs[index].1 = "https://evil.example/openid/id/1";

			let query: CallbackQuery = pairs.into_iter().collect();

			assert_eq!(verifier.check_fields(&query), Err(Rejection::FieldMismatch { field }));

			let mut pairs = valid_query();

			pairs.remove(index);

			let query: CallbackQuery = pairs.into_iter().collect();

			assert_eq!(verifier.check_fields(&query), Err(Rejection::FieldMismatch { field }));
		}
	}

	#[tokio::test]
	async fn malformed_callbacks_are_rejected_without_network() {
		let verifier = verifier();

		assert_eq!(verifier.verify("").await, Err(Rejection::MalformedCallback));
		assert_eq!(
			verifier.verify("https://app.example.com/cb").await,
			Err(Rejection::FieldMismatch { field: "openid.op_endpoint" })
		);
		assert_eq!(verifier.metrics().attempts(), 2);
		assert_eq!(verifier.metrics().fast_path_rejections(), 2);
		assert_eq!(verifier.metrics().verified(), 0);
	}

	#[test]
	fn rejection_stage_is_reported() {
		assert!(Rejection::MalformedCallback.is_fast_path());
		assert!(Rejection::FieldMismatch { field: "openid.ns" }.is_fast_path());
		assert!(!Rejection::VerificationFailed.is_fast_path());
		assert!(!Rejection::IdentifierMismatch.is_fast_path());
		assert_eq!(
			AssertionResult::unauthenticated(),
			AssertionResult { authenticated: false, claimed_identifier: None }
		);
	}
}
