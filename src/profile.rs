//! Steam Web API player summaries.
//!
//! `model` holds the typed [`SteamProfile`] record and `fetcher` performs the single
//! `GetPlayerSummaries` lookup for a verified [`SteamId`](crate::auth::SteamId).

pub mod fetcher;
pub mod model;

pub use fetcher::*;
pub use model::*;
