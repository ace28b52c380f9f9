//! Player summary lookup.

// crates.io
use oauth2::http::{Method, Request, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::{SteamId, TokenSecret},
	error::ProfileFetchError,
	http::{self, ProviderHttpClient},
	obs,
	profile::{PlayerSummaries, SteamProfile},
};

/// Steam Web API endpoint returning player summaries.
pub const STEAM_PLAYER_SUMMARIES_URL: &str =
	"https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";

/// Fetches the public profile of a verified Steam account.
///
/// One GET per call; no retry and no caching.
pub struct ProfileFetcher<C>
where
	C: ?Sized + ProviderHttpClient,
{
	http_client: Arc<C>,
	endpoint: Url,
	api_key: TokenSecret,
}
impl<C> ProfileFetcher<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a fetcher calling `endpoint` with `api_key`.
	pub fn new(http_client: impl Into<Arc<C>>, endpoint: Url, api_key: TokenSecret) -> Self {
		Self { http_client: http_client.into(), endpoint, api_key }
	}

	/// Endpoint queried by [`ProfileFetcher::fetch`].
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Returns the profile for `steam_id`, or `None` when Steam lists no player.
	pub async fn fetch(&self, steam_id: &SteamId) -> Result<Option<SteamProfile>, ProfileFetchError> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(self.request_url(steam_id).as_str())
			.header(ACCEPT, "application/json")
			.body(Vec::new())?;
		let response = http::execute(self.http_client.as_ref(), request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(ProfileFetchError::Status { status: status.as_u16() });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let summaries: PlayerSummaries = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProfileFetchError::Parse { source })?;
		let profile = summaries.response.players.into_iter().next();

		if profile.is_none() {
			obs::log_missing_profile(steam_id);
		}

		Ok(profile)
	}

	fn request_url(&self, steam_id: &SteamId) -> Url {
		let mut url = self.endpoint.clone();

		url.query_pairs_mut()
			.append_pair("key", self.api_key.expose())
			.append_pair("steamids", steam_id);

		url
	}
}
impl<C> Clone for ProfileFetcher<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			endpoint: self.endpoint.clone(),
			api_key: self.api_key.clone(),
		}
	}
}
impl<C> Debug for ProfileFetcher<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileFetcher")
			.field("endpoint", &self.endpoint.as_str())
			.field("api_key", &self.api_key)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, http::ReqwestHttpClient};

	fn fetcher() -> ProfileFetcher<ReqwestHttpClient> {
		ProfileFetcher::new(
			test_reqwest_http_client(),
			Url::parse(STEAM_PLAYER_SUMMARIES_URL).expect("Profile endpoint should parse."),
			TokenSecret::new("secret-key"),
		)
	}

	#[test]
	fn request_url_carries_key_and_steam_id() {
		let url = fetcher().request_url(&steam_id("76561197960435530"));
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(url.path(), "/ISteamUser/GetPlayerSummaries/v0002/");
		assert_eq!(pairs.get("key"), Some(&"secret-key".into()));
		assert_eq!(pairs.get("steamids"), Some(&"76561197960435530".into()));
	}

	#[test]
	fn debug_output_redacts_api_key() {
		let rendered = format!("{:?}", fetcher());

		assert!(!rendered.contains("secret-key"));
	}
}
