//! Capability contract consumed by host authentication orchestrators.
//!
//! A sign-in cycle drives the four capabilities in order: [`ProviderAdapter::authorization`]
//! produces the redirect, [`ProviderAdapter::token`] turns the callback into a [`Credential`],
//! [`ProviderAdapter::userinfo`] loads the raw profile, and [`ProviderAdapter::profile`] maps it
//! to the session-facing shape.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	openid::{AuthorizationRequest, CallbackRequest},
	profile::SteamProfile,
	provider::ProviderDescriptor,
};

/// Future returned by [`ProviderAdapter::token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Credential>> + 'a + Send>>;
/// Future returned by [`ProviderAdapter::userinfo`].
pub type UserinfoFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<SteamProfile>>> + 'a + Send>>;

/// Provider capabilities exposed to the host.
///
/// Implementors are required to be `Send + Sync`; the futures they return must be `Send` so
/// hosts can drive them from multi-threaded runtimes.
pub trait ProviderAdapter: Send + Sync {
	/// Static identity and configuration of the provider.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Builds the redirect that starts a sign-in.
	fn authorization(&self) -> AuthorizationRequest;

	/// Verifies the provider callback and issues a credential.
	///
	/// Every verification failure surfaces as [`Error::AuthenticationFailed`].
	fn token<'a>(&'a self, callback: &'a dyn CallbackRequest) -> TokenFuture<'a>;

	/// Loads the profile of the account `credential` was issued for.
	///
	/// `Ok(None)` means the provider returned no player.
	fn userinfo<'a>(&'a self, credential: &'a Credential) -> UserinfoFuture<'a>;

	/// Maps the raw profile into the record stored in the host session.
	///
	/// The default keeps the record unchanged.
	fn profile(&self, raw: SteamProfile) -> SteamProfile {
		raw
	}
}
