//! Player profile lookup for an issued credential.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	flows::SteamProvider,
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::SteamProfile,
};

impl<C> SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Fetches the profile of the account `credential` was issued for.
	///
	/// A failure here leaves the credential valid; callers decide whether a missing profile
	/// ends the sign-in.
	pub async fn fetch_userinfo(&self, credential: &Credential) -> Result<Option<SteamProfile>> {
		const KIND: FlowKind = FlowKind::Userinfo;

		let span = FlowSpan::new(KIND, "fetch_userinfo");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result: Result<Option<SteamProfile>> = span
			.instrument(async move { Ok(self.fetcher.fetch(&credential.steam_id).await?) })
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
