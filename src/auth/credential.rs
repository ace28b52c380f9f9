//! Ephemeral bearer credentials minted after a successful assertion check.
//!
//! [`CredentialIssuer`] runs in one of two modes:
//!
//! - **Opaque** (default): the access token is a random string with no binding to the Steam ID.
//!   It is only meaningful as an in-process hand-off between the token and userinfo steps of
//!   one sign-in cycle.
//! - **Signed**: the access token carries the Steam ID and a validity window, authenticated with
//!   HMAC-SHA256. Use this whenever the token leaves the process, and check it with
//!   [`CredentialIssuer::verify`].

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{SteamId, TokenSecret},
	error::ConfigError,
};

type HmacSha256 = Hmac<Sha256>;

/// Token type label attached to every issued credential.
pub const BEARER: &str = "Bearer";

const OPAQUE_TOKEN_LEN: usize = 32;
const SIGNED_NONCE_LEN: usize = 16;

/// Longest lifetime accepted for signed credentials.
pub const MAX_CREDENTIAL_TTL: Duration = Duration::days(366);

/// Credential returned by the token-exchange capability.
///
/// Serializes as `{ "access_token": .., "steamId": .., "token_type": "Bearer" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Bearer token; redacted in `Debug`/`Display`.
	pub access_token: TokenSecret,
	/// Verified subject identifier.
	#[serde(rename = "steamId")]
	pub steam_id: SteamId,
	/// Token type label, always [`BEARER`].
	pub token_type: String,
}

/// Errors raised while checking a signed access token.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The issuer has no signing key, so tokens cannot be checked.
	#[error("Credential issuer is not configured for signed tokens.")]
	Unsigned,
	/// Token is not in the `payload.signature` form.
	#[error("Access token is malformed.")]
	Malformed,
	/// Signature does not match the payload.
	#[error("Access token signature is invalid.")]
	BadSignature,
	/// Token was issued for another subject.
	#[error("Access token was issued for a different Steam ID.")]
	SubjectMismatch,
	/// Validity window has elapsed.
	#[error("Access token has expired.")]
	Expired,
}

/// Claims recovered from a verified signed token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedClaims {
	/// Subject the token was issued for.
	pub steam_id: SteamId,
	/// Issue instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}

/// Mints [`Credential`] values for verified Steam IDs.
#[derive(Clone, Default)]
pub struct CredentialIssuer {
	signer: Option<Signer>,
}
impl CredentialIssuer {
	/// Issuer that produces random opaque tokens.
	pub fn opaque() -> Self {
		Self::default()
	}

	/// Issuer that produces HMAC-SHA256 signed tokens valid for `ttl`.
	///
	/// `ttl` must be positive and no longer than [`MAX_CREDENTIAL_TTL`].
	pub fn signed(key: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, ConfigError> {
		let key = key.as_ref();

		if key.is_empty() {
			return Err(ConfigError::InvalidSigningKey);
		}
		if !ttl.is_positive() || ttl > MAX_CREDENTIAL_TTL {
			return Err(ConfigError::InvalidCredentialTtl { ttl });
		}

		let mac = HmacSha256::new_from_slice(key).map_err(|_| ConfigError::InvalidSigningKey)?;

		Ok(Self { signer: Some(Signer { mac, ttl }) })
	}

	/// Returns `true` when tokens are signed.
	pub fn is_signed(&self) -> bool {
		self.signer.is_some()
	}

	/// Issues a credential for `steam_id` using the current clock.
	pub fn issue(&self, steam_id: SteamId) -> Credential {
		self.issue_at(steam_id, OffsetDateTime::now_utc())
	}

	/// Issues a credential for `steam_id` as of `now`.
	pub fn issue_at(&self, steam_id: SteamId, now: OffsetDateTime) -> Credential {
		let token = match &self.signer {
			Some(signer) => signer.sign(&steam_id, now),
			None => random_string(OPAQUE_TOKEN_LEN),
		};

		Credential { access_token: TokenSecret::new(token), steam_id, token_type: BEARER.into() }
	}

	/// Checks a signed access token against `steam_id` using the current clock.
	pub fn verify(&self, token: &str, steam_id: &SteamId) -> Result<SignedClaims, CredentialError> {
		self.verify_at(token, steam_id, OffsetDateTime::now_utc())
	}

	/// Checks a signed access token against `steam_id` as of `now`.
	pub fn verify_at(
		&self,
		token: &str,
		steam_id: &SteamId,
		now: OffsetDateTime,
	) -> Result<SignedClaims, CredentialError> {
		let signer = self.signer.as_ref().ok_or(CredentialError::Unsigned)?;
		let claims = signer.open(token)?;

		if &claims.steam_id != steam_id {
			return Err(CredentialError::SubjectMismatch);
		}
		if now >= claims.expires_at {
			return Err(CredentialError::Expired);
		}

		Ok(claims)
	}
}
impl Debug for CredentialIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialIssuer")
			.field("signed", &self.is_signed())
			.field("ttl", &self.signer.as_ref().map(|signer| signer.ttl))
			.finish()
	}
}

#[derive(Clone)]
struct Signer {
	mac: HmacSha256,
	ttl: Duration,
}
impl Signer {
	fn sign(&self, steam_id: &SteamId, now: OffsetDateTime) -> String {
		let payload = format!(
			"{steam_id}:{}:{}:{}",
			now.unix_timestamp(),
			now.saturating_add(self.ttl).unix_timestamp(),
			random_string(SIGNED_NONCE_LEN)
		);
		let mut mac = self.mac.clone();

		mac.update(payload.as_bytes());

		let signature = mac.finalize().into_bytes();

		format!("{}.{}", URL_SAFE_NO_PAD.encode(payload), URL_SAFE_NO_PAD.encode(signature))
	}

	fn open(&self, token: &str) -> Result<SignedClaims, CredentialError> {
		let (payload, signature) = token.split_once('.').ok_or(CredentialError::Malformed)?;
		let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| CredentialError::Malformed)?;
		let signature =
			URL_SAFE_NO_PAD.decode(signature).map_err(|_| CredentialError::Malformed)?;
		let mut mac = self.mac.clone();

		mac.update(&payload);
		mac.verify_slice(&signature).map_err(|_| CredentialError::BadSignature)?;

		let payload = String::from_utf8(payload).map_err(|_| CredentialError::Malformed)?;
		let mut parts = payload.splitn(4, ':');
		let (Some(subject), Some(issued_at), Some(expires_at), Some(_nonce)) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(CredentialError::Malformed);
		};

		Ok(SignedClaims {
			steam_id: SteamId::new(subject).map_err(|_| CredentialError::Malformed)?,
			issued_at: parse_timestamp(issued_at)?,
			expires_at: parse_timestamp(expires_at)?,
		})
	}
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, CredentialError> {
	raw.parse::<i64>()
		.ok()
		.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
		.ok_or(CredentialError::Malformed)
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn steam_id(value: &str) -> SteamId {
		SteamId::new(value).expect("Steam ID fixture should be valid.")
	}

	#[test]
	fn opaque_credentials_are_fresh_bearer_tokens() {
		let issuer = CredentialIssuer::opaque();
		let first = issuer.issue(steam_id("76561198000000000"));
		let second = issuer.issue(steam_id("76561198000000000"));

		assert_eq!(first.token_type, BEARER);
		assert_eq!(first.access_token.expose().len(), OPAQUE_TOKEN_LEN);
		assert_ne!(first.access_token, second.access_token);
		assert_eq!(
			issuer.verify(first.access_token.expose(), &first.steam_id),
			Err(CredentialError::Unsigned)
		);
	}

	#[test]
	fn credential_serializes_with_host_field_names() {
		let credential = Credential {
			access_token: TokenSecret::new("token"),
			steam_id: steam_id("76561198000000000"),
			token_type: BEARER.into(),
		};
		let json = serde_json::to_value(&credential).expect("Credential should serialize.");

		assert_eq!(
			json,
			serde_json::json!({
				"access_token": "token",
				"steamId": "76561198000000000",
				"token_type": "Bearer",
			})
		);
		assert!(!format!("{credential:?}").contains("\"token\""));
	}

	#[test]
	fn signed_credentials_round_trip_within_window() {
		let issuer = CredentialIssuer::signed(b"signing-key", Duration::minutes(5))
			.expect("Signing issuer should build.");
		let now = datetime!(2024-05-01 12:00 UTC);
		let credential = issuer.issue_at(steam_id("76561198000000000"), now);
		let claims = issuer
			.verify_at(credential.access_token.expose(), &credential.steam_id, now)
			.expect("Fresh signed token should verify.");

		assert_eq!(claims.issued_at, now);
		assert_eq!(claims.expires_at, now + Duration::minutes(5));
		assert_eq!(
			issuer.verify_at(
				credential.access_token.expose(),
				&credential.steam_id,
				now + Duration::minutes(5),
			),
			Err(CredentialError::Expired)
		);
		assert_eq!(
			issuer.verify_at(credential.access_token.expose(), &steam_id("1"), now),
			Err(CredentialError::SubjectMismatch)
		);
	}

	#[test]
	fn signed_credentials_reject_tampering_and_foreign_keys() {
		let issuer = CredentialIssuer::signed(b"signing-key", Duration::minutes(5))
			.expect("Signing issuer should build.");
		let other = CredentialIssuer::signed(b"other-key", Duration::minutes(5))
			.expect("Second signing issuer should build.");
		let now = datetime!(2024-05-01 12:00 UTC);
		let credential = issuer.issue_at(steam_id("76561198000000000"), now);
		let token = credential.access_token.expose();
		let (_, signature) = token.split_once('.').expect("Signed token should contain a dot.");
		let forged_payload = URL_SAFE_NO_PAD.encode(format!("1:{0}:{1}:nonce", 0, i64::MAX / 2));
		let forged = format!("{forged_payload}.{signature}");

		assert_eq!(
			other.verify_at(token, &credential.steam_id, now),
			Err(CredentialError::BadSignature)
		);
		assert_eq!(
			issuer.verify_at(&forged, &steam_id("1"), now),
			Err(CredentialError::BadSignature)
		);
		assert_eq!(
			issuer.verify_at("no-dot", &credential.steam_id, now),
			Err(CredentialError::Malformed)
		);
	}

	#[test]
	fn signing_requires_key_and_positive_window() {
		assert!(matches!(
			CredentialIssuer::signed(b"", Duration::minutes(1)),
			Err(ConfigError::InvalidSigningKey)
		));
		assert!(matches!(
			CredentialIssuer::signed(b"key", Duration::ZERO),
			Err(ConfigError::InvalidCredentialTtl { .. })
		));
	}

	#[test]
	fn oversized_lifetime_is_rejected_up_front() {
		assert!(matches!(
			CredentialIssuer::signed(b"key", Duration::MAX),
			Err(ConfigError::InvalidCredentialTtl { ttl }) if ttl == Duration::MAX
		));
		assert!(CredentialIssuer::signed(b"key", MAX_CREDENTIAL_TTL).is_ok());
		assert!(matches!(
			CredentialIssuer::signed(b"key", MAX_CREDENTIAL_TTL + Duration::SECOND),
			Err(ConfigError::InvalidCredentialTtl { .. })
		));
	}

	#[test]
	fn signing_near_the_end_of_time_saturates() {
		let issuer = CredentialIssuer::signed(b"key", MAX_CREDENTIAL_TTL)
			.expect("Maximum lifetime should be accepted.");
		let now = datetime!(9999-12-31 00:00 UTC);
		let credential = issuer.issue_at(steam_id("76561198000000000"), now);
		let claims = issuer
			.verify_at(
				credential.access_token.expose(),
				&steam_id("76561198000000000"),
				now - Duration::SECOND,
			)
			.expect("Saturated token should still open.");

		assert_eq!(claims.issued_at, now);
		assert!(claims.expires_at > now);
	}
}
