//! OpenID 2.0 relying-party logic for Steam sign-in.
//!
//! `authorization` builds the `checkid_setup` redirect, `callback` abstracts over inbound request
//! types, `relying_party` hosts the protocol-level verification primitive (positive assertion
//! checks + direct verification), and `verifier` wraps that primitive with the cheap field
//! checks and the canonical Steam ID extraction.

pub mod authorization;
pub mod callback;
pub mod relying_party;
pub mod verifier;

pub use authorization::*;
pub use callback::*;
pub use relying_party::*;
pub use verifier::*;

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::auth::SteamId;

/// OpenID 2.0 namespace URI.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
/// Identifier-select sentinel sent as `openid.identity` and `openid.claimed_id`.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";
/// Mode requesting an interactive authentication at the provider.
pub const MODE_CHECKID_SETUP: &str = "checkid_setup";
/// Steam's OP endpoint.
pub const STEAM_LOGIN_URL: &str = "https://steamcommunity.com/openid/login";
/// Prefix every Steam claimed identifier starts with.
pub const IDENTITY_PREFIX: &str = "https://steamcommunity.com/openid/id/";

static CLAIMED_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^https?://steamcommunity\.com/openid/id/([0-9]+)$")
		.expect("Claimed identifier pattern must compile.")
});

/// Extracts the canonical Steam ID from a claimed identifier.
///
/// Returns `None` unless the whole string matches
/// `^https?://steamcommunity.com/openid/id/<digits>$` and the digits fit a `u64`.
pub fn extract_steam_id(claimed_identifier: &str) -> Option<SteamId> {
	let captures = CLAIMED_ID_PATTERN.captures(claimed_identifier)?;

	SteamId::new(captures.get(1)?.as_str()).ok()
}
