//! Callback verification followed by credential issuance.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	flows::SteamProvider,
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	openid::CallbackRequest,
};

impl<C> SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Verifies the provider callback and issues a credential for the proven Steam ID.
	///
	/// Any rejection becomes [`Error::AuthenticationFailed`]; its message never says why.
	pub async fn exchange_callback<R>(&self, callback: &R) -> Result<Credential>
	where
		R: ?Sized + CallbackRequest,
	{
		const KIND: FlowKind = FlowKind::TokenExchange;

		let span = FlowSpan::new(KIND, "exchange_callback");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result: Result<Credential> = span
			.instrument(async move {
				let steam_id = self.verifier.verify(callback).await?;

				Ok(self.issuer.issue(steam_id))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
