//! Sign-in redirect construction.

// self
use crate::{
	flows::SteamProvider,
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	openid::AuthorizationRequest,
};

impl<C> SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds the `checkid_setup` redirect for the configured callback URL.
	///
	/// Construction is pure and cannot fail; the descriptor already validated every URL.
	pub fn authorization_request(&self) -> AuthorizationRequest {
		const KIND: FlowKind = FlowKind::Authorization;

		let _span = FlowSpan::new(KIND, "authorization_request").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let request = self.descriptor.authorization_request();

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		request
	}
}
