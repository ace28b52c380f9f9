//! Sign-in capabilities orchestrated by [`SteamProvider`].
//!
//! Each capability lives in its own module: `authorization` builds the redirect,
//! `token_exchange` verifies the callback and issues a credential, and `userinfo` loads the
//! player profile. [`SteamProvider`] only sequences those steps and translates their errors;
//! the protocol work happens in [`openid`](crate::openid), [`auth`](crate::auth), and
//! [`profile`](crate::profile).

mod authorization;
mod token_exchange;
mod userinfo;

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialIssuer},
	http::ProviderHttpClient,
	openid::{
		AssertionVerifier, AuthorizationRequest, CallbackRequest, DirectVerification, RelyingParty,
		VerificationMetrics,
	},
	profile::ProfileFetcher,
	provider::{ProviderAdapter, ProviderDescriptor, TokenFuture, UserinfoFuture},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestSteamProvider = SteamProvider<ReqwestHttpClient>;

/// Steam sign-in provider bound to a single descriptor.
///
/// The provider owns the HTTP client, the assertion verifier, the credential issuer, and the
/// profile fetcher so each capability can focus on sequencing. Cloning is cheap and shares the
/// transport and metrics.
pub struct SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Provider descriptor that defines endpoints and identity fields.
	pub descriptor: ProviderDescriptor,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	verifier: AssertionVerifier,
	issuer: Arc<CredentialIssuer>,
	fetcher: ProfileFetcher<C>,
}
impl<C> SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a provider that reuses the caller-provided transport.
	///
	/// Assertions are confirmed with OpenID direct verification against the descriptor's login
	/// endpoint and credentials are opaque.
	pub fn with_http_client(descriptor: ProviderDescriptor, http_client: impl Into<Arc<C>>) -> Self {
		let http_client = http_client.into();
		let relying_party = DirectVerification::<C>::new(
			http_client.clone(),
			descriptor.endpoints.login.clone(),
		)
		.with_nonce_max_age(descriptor.nonce_max_age);
		let verifier = AssertionVerifier::new(
			Arc::new(relying_party),
			descriptor.endpoints.login.clone(),
			descriptor.callback_url.clone(),
		);
		let fetcher = ProfileFetcher::new(
			http_client.clone(),
			descriptor.endpoints.profile.clone(),
			descriptor.api_key.clone(),
		);

		Self {
			descriptor,
			http_client,
			verifier,
			issuer: Arc::new(CredentialIssuer::opaque()),
			fetcher,
		}
	}

	/// Replaces the relying-party primitive while keeping the verification metrics.
	pub fn with_relying_party(mut self, relying_party: Arc<dyn RelyingParty>) -> Self {
		let metrics = self.verifier.metrics().clone();

		self.verifier = AssertionVerifier::new(
			relying_party,
			self.descriptor.endpoints.login.clone(),
			self.descriptor.callback_url.clone(),
		)
		.with_metrics(metrics);

		self
	}

	/// Replaces the credential issuer (e.g. with [`CredentialIssuer::signed`]).
	pub fn with_credential_issuer(mut self, issuer: CredentialIssuer) -> Self {
		self.issuer = Arc::new(issuer);

		self
	}

	/// Issuer used by the token exchange; hosts call it to check signed credentials.
	pub fn credential_issuer(&self) -> &CredentialIssuer {
		&self.issuer
	}

	/// Counters describing past callback verifications.
	pub fn verification_metrics(&self) -> &Arc<VerificationMetrics> {
		self.verifier.metrics()
	}
}
#[cfg(feature = "reqwest")]
impl SteamProvider<ReqwestHttpClient> {
	/// Creates a new provider for the descriptor.
	///
	/// The provider provisions its own reqwest-backed transport so callers do not need to pass
	/// HTTP handles explicitly.
	pub fn new(descriptor: ProviderDescriptor) -> Self {
		Self::with_http_client(descriptor, ReqwestHttpClient::default())
	}
}
impl<C> Clone for SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			descriptor: self.descriptor.clone(),
			http_client: self.http_client.clone(),
			verifier: self.verifier.clone(),
			issuer: self.issuer.clone(),
			fetcher: self.fetcher.clone(),
		}
	}
}
impl<C> Debug for SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SteamProvider")
			.field("descriptor", &self.descriptor)
			.field("verifier", &self.verifier)
			.field("signed_credentials", &self.issuer.is_signed())
			.finish()
	}
}
impl<C> ProviderAdapter for SteamProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn authorization(&self) -> AuthorizationRequest {
		self.authorization_request()
	}

	fn token<'a>(&'a self, callback: &'a dyn CallbackRequest) -> TokenFuture<'a> {
		Box::pin(self.exchange_callback(callback))
	}

	fn userinfo<'a>(&'a self, credential: &'a Credential) -> UserinfoFuture<'a> {
		Box::pin(self.fetch_userinfo(credential))
	}
}
