//! Player summary records returned by `ISteamUser/GetPlayerSummaries`.

// self
use crate::{_prelude::*, auth::SteamId};

/// Profile visibility as reported by Steam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum CommunityVisibilityState {
	/// Only basic fields are visible to the caller.
	Private,
	/// Full profile is visible.
	Public,
	/// Any value Steam may add later; kept verbatim.
	Other(u8),
}
impl CommunityVisibilityState {
	/// Returns `true` when the full profile is visible.
	pub fn is_public(self) -> bool {
		matches!(self, Self::Public)
	}
}
impl From<u8> for CommunityVisibilityState {
	fn from(value: u8) -> Self {
		match value {
			1 => Self::Private,
			3 => Self::Public,
			other => Self::Other(other),
		}
	}
}
impl From<CommunityVisibilityState> for u8 {
	fn from(value: CommunityVisibilityState) -> Self {
		match value {
			CommunityVisibilityState::Private => 1,
			CommunityVisibilityState::Public => 3,
			CommunityVisibilityState::Other(other) => other,
		}
	}
}

/// Online status of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PersonaState {
	/// Offline, or the profile is private.
	#[default]
	Offline,
	/// Online.
	Online,
	/// Busy.
	Busy,
	/// Away.
	Away,
	/// Snooze.
	Snooze,
	/// Looking to trade.
	LookingToTrade,
	/// Looking to play.
	LookingToPlay,
	/// Any value Steam may add later; kept verbatim.
	Other(u8),
}
impl From<u8> for PersonaState {
	fn from(value: u8) -> Self {
		match value {
			0 => Self::Offline,
			1 => Self::Online,
			2 => Self::Busy,
			3 => Self::Away,
			4 => Self::Snooze,
			5 => Self::LookingToTrade,
			6 => Self::LookingToPlay,
			other => Self::Other(other),
		}
	}
}
impl From<PersonaState> for u8 {
	fn from(value: PersonaState) -> Self {
		match value {
			PersonaState::Offline => 0,
			PersonaState::Online => 1,
			PersonaState::Busy => 2,
			PersonaState::Away => 3,
			PersonaState::Snooze => 4,
			PersonaState::LookingToTrade => 5,
			PersonaState::LookingToPlay => 6,
			PersonaState::Other(other) => other,
		}
	}
}

/// Public profile of a Steam account.
///
/// Field names follow the Web API wire format. Only `steamid` is required; private and
/// freshly created accounts omit most of the rest. Fields this type does not model
/// (`realname`, `loccountrycode`, `gameid`, ...) are kept in [`SteamProfile::extra`] so the
/// record serializes back unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteamProfile {
	/// 64-bit Steam ID.
	#[serde(rename = "steamid")]
	pub steam_id: SteamId,
	/// Profile visibility.
	#[serde(rename = "communityvisibilitystate", default, skip_serializing_if = "Option::is_none")]
	pub community_visibility_state: Option<CommunityVisibilityState>,
	/// `1` when the user has set up a community profile.
	#[serde(rename = "profilestate", default, skip_serializing_if = "Option::is_none")]
	pub profile_state: Option<u8>,
	/// Display name.
	#[serde(rename = "personaname", default, skip_serializing_if = "Option::is_none")]
	pub persona_name: Option<String>,
	/// Community profile URL.
	#[serde(rename = "profileurl", default, skip_serializing_if = "Option::is_none")]
	pub profile_url: Option<String>,
	/// 32x32 avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// 64x64 avatar URL.
	#[serde(rename = "avatarmedium", default, skip_serializing_if = "Option::is_none")]
	pub avatar_medium: Option<String>,
	/// 184x184 avatar URL.
	#[serde(rename = "avatarfull", default, skip_serializing_if = "Option::is_none")]
	pub avatar_full: Option<String>,
	/// Avatar content hash.
	#[serde(rename = "avatarhash", default, skip_serializing_if = "Option::is_none")]
	pub avatar_hash: Option<String>,
	/// Last time the user was online.
	#[serde(
		rename = "lastlogoff",
		default,
		with = "time::serde::timestamp::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub last_logoff: Option<OffsetDateTime>,
	/// Current online status.
	#[serde(rename = "personastate", default, skip_serializing_if = "Option::is_none")]
	pub persona_state: Option<PersonaState>,
	/// Primary group ID.
	#[serde(rename = "primaryclanid", default, skip_serializing_if = "Option::is_none")]
	pub primary_clan_id: Option<String>,
	/// Account creation time.
	#[serde(
		rename = "timecreated",
		default,
		with = "time::serde::timestamp::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub time_created: Option<OffsetDateTime>,
	/// Persona state flags bitset.
	#[serde(rename = "personastateflags", default, skip_serializing_if = "Option::is_none")]
	pub persona_state_flags: Option<u32>,
	/// Whether the profile accepts comments.
	#[serde(rename = "commentpermission", default, skip_serializing_if = "Option::is_none")]
	pub comment_permission: Option<u8>,
	/// Every field not modeled above.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// `GetPlayerSummaries` response envelope.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PlayerSummaries {
	pub(crate) response: PlayerList,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PlayerList {
	#[serde(default)]
	pub(crate) players: Vec<SteamProfile>,
}
