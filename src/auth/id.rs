//! Strongly typed identifiers enforced across the sign-in domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:ident) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (provider, Steam ID).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (provider, Steam ID).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (provider, Steam ID).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier is not an unsigned 64-bit decimal number.
	#[error("{kind} identifier must be a 64-bit decimal number.")]
	NotNumeric {
		/// Kind of identifier (provider, Steam ID).
		kind: &'static str,
	},
}

def_id! { ProviderId, "Identifier for a provider descriptor (e.g. `steam`).", "Provider", validate_view }
impl ProviderId {
	/// Identifier hosts use for the Steam provider.
	pub fn steam() -> Self {
		Self("steam".into())
	}
}
def_id! {
	SteamId,
	"Canonical 64-bit Steam account identifier extracted from a verified claimed identifier.",
	"SteamId",
	validate_steam_id
}
impl SteamId {
	/// Returns the identifier as an unsigned integer.
	pub fn as_u64(&self) -> u64 {
		// Validation guarantees the value parses.
		self.0.parse().unwrap_or_default()
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn validate_steam_id(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	validate_view(kind, view)?;

	if !view.bytes().all(|b| b.is_ascii_digit()) || view.parse::<u64>().is_err() {
		return Err(IdentifierError::NotNumeric { kind });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ProviderId::new(" steam").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderId::new("steam ").is_err(), "Trailing whitespace must be rejected.");

		let provider = ProviderId::new("steam").expect("Provider fixture should be valid.");

		assert_eq!(provider, ProviderId::steam());
		assert!(ProviderId::new("").is_err());
		assert!(ProviderId::new(&"a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn steam_ids_must_be_ascii_u64() {
		let id = SteamId::new("76561198000000000").expect("Steam ID fixture should be valid.");

		assert_eq!(id.as_u64(), 76_561_198_000_000_000);
		assert_eq!(format!("{id:?}"), "SteamId(76561198000000000)");
		assert_eq!(SteamId::new("7656a"), Err(IdentifierError::NotNumeric { kind: "SteamId" }));
		assert!(SteamId::new("+123").is_err());
		assert!(SteamId::new("١٢٣").is_err(), "Non-ASCII digits must be rejected.");
		assert!(SteamId::new("18446744073709551616").is_err(), "Values above u64::MAX overflow.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: SteamId = serde_json::from_str("\"76561198000000000\"")
			.expect("Steam ID should deserialize successfully.");

		assert_eq!(id.as_ref(), "76561198000000000");
		assert!(serde_json::from_str::<SteamId>("\"not-a-number\"").is_err());
		assert_eq!(
			serde_json::to_string(&id).expect("Steam ID should serialize."),
			"\"76561198000000000\""
		);
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SteamId, u8> = HashMap::from_iter([(
			SteamId::new("42").expect("Steam ID used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("42"), Some(&7));
	}
}
