//! Provider descriptor data structures shared by every capability.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
	openid::AuthorizationRequest,
};

/// Sign-in button colors exposed to hosts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStyle {
	/// Background color.
	pub bg: String,
	/// Text color.
	pub text: String,
}
impl Default for ProviderStyle {
	fn default() -> Self {
		Self { bg: "#000".into(), text: "#fff".into() }
	}
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// OpenID OP endpoint users are redirected to and assertions are checked against.
	pub login: Url,
	/// Player summaries endpoint.
	pub profile: Url,
}

/// Immutable provider descriptor consumed by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Display name.
	pub name: String,
	/// Sign-in button colors.
	pub style: ProviderStyle,
	/// Callback URL Steam redirects back to (`openid.return_to`).
	pub callback_url: Url,
	/// Origin of [`ProviderDescriptor::callback_url`] (`openid.realm`).
	pub realm: String,
	/// Steam Web API key.
	pub api_key: TokenSecret,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Maximum accepted age of `openid.response_nonce`.
	pub nonce_max_age: Duration,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Builds the `checkid_setup` redirect for this descriptor.
	pub fn authorization_request(&self) -> AuthorizationRequest {
		AuthorizationRequest::new(self.endpoints.login.clone(), self.callback_url.clone())
	}
}
