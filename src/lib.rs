//! Steam OpenID 2.0 sign-in for Rust: verify provider assertions, mint short-lived
//! credentials, and fetch player profiles behind one provider adapter.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod openid;
pub mod profile;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::SteamId,
		flows::SteamProvider,
		http::ReqwestHttpClient,
		openid::{self, OPENID_NS},
		provider::ProviderDescriptor,
	};

	/// Provider type alias used by reqwest-backed integration tests.
	pub type ReqwestTestProvider = SteamProvider<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`SteamProvider`] backed by the insecure reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_provider(descriptor: ProviderDescriptor) -> ReqwestTestProvider {
		SteamProvider::with_http_client(descriptor, test_reqwest_http_client())
	}

	/// Builds the callback URL a provider would redirect to after a positive assertion for
	/// `steam_id`, using a fresh response nonce.
	pub fn positive_assertion_url(descriptor: &ProviderDescriptor, steam_id: &str) -> Url {
		let claimed_id = format!("{}{steam_id}", openid::IDENTITY_PREFIX);
		let nonce = format!(
			"{}abc123",
			OffsetDateTime::now_utc()
				.replace_nanosecond(0)
				.expect("Zero nanoseconds should always be valid.")
				.format(&time::format_description::well_known::Rfc3339)
				.expect("Current time should format as RFC 3339."),
		);
		let mut url = descriptor.callback_url.clone();

		url.query_pairs_mut()
			.append_pair("openid.ns", OPENID_NS)
			.append_pair("openid.mode", "id_res")
			.append_pair("openid.op_endpoint", descriptor.endpoints.login.as_str())
			.append_pair("openid.claimed_id", &claimed_id)
			.append_pair("openid.identity", &claimed_id)
			.append_pair("openid.return_to", descriptor.callback_url.as_str())
			.append_pair("openid.response_nonce", &nonce)
			.append_pair("openid.assoc_handle", "1234567890")
			.append_pair(
				"openid.signed",
				"signed,op_endpoint,claimed_id,identity,return_to,response_nonce,assoc_handle",
			)
			.append_pair("openid.sig", "c2lnbmF0dXJl");

		url
	}

	/// Parses a fixture Steam identifier.
	pub fn steam_id(value: &str) -> SteamId {
		SteamId::new(value).expect("Steam ID fixture should be valid.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
