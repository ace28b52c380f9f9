//! Inbound callback abstraction.
//!
//! Hosts receive the provider redirect through whatever request type their framework uses. The
//! verifier only needs the request URL, so [`CallbackRequest`] is implemented for plain URLs,
//! strings, and `http::Request`, and hosts can implement it for anything else.

// std
use std::borrow::Cow;
// self
use crate::_prelude::*;

/// Base used to resolve origin-relative request targets such as `/api/auth/callback?..`.
const PLACEHOLDER_BASE: &str = "https://example.com";

/// Query parameters taken from a callback URL.
///
/// Repeated keys keep the last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackQuery(BTreeMap<String, String>);
impl CallbackQuery {
	/// Collects the query parameters of `url`.
	pub fn from_url(url: &Url) -> Self {
		url.query_pairs().into_owned().collect()
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Iterates over every `openid.*` field.
	pub fn openid_fields(&self) -> impl Iterator<Item = (&str, &str)> {
		self.iter().filter(|(key, _)| key.starts_with("openid."))
	}

	/// Iterates over all fields in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when the query carries no fields.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for CallbackQuery
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}

/// Anything that exposes the URL the provider redirected the user to.
pub trait CallbackRequest: Send + Sync {
	/// Raw request target; either absolute or origin-relative. `None` when unavailable.
	fn request_url(&self) -> Option<Cow<'_, str>>;

	/// Request URL resolved to an absolute [`Url`].
	fn callback_url(&self) -> Option<Url> {
		let raw = self.request_url()?;

		if raw.trim().is_empty() {
			return None;
		}

		let base = Url::parse(PLACEHOLDER_BASE).ok()?;

		Url::options().base_url(Some(&base)).parse(&raw).ok()
	}

	/// Query parameters of the request URL.
	fn query(&self) -> Option<CallbackQuery> {
		self.callback_url().map(|url| CallbackQuery::from_url(&url))
	}
}
impl CallbackRequest for Url {
	fn request_url(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(self.as_str()))
	}

	fn callback_url(&self) -> Option<Url> {
		Some(self.clone())
	}
}
impl CallbackRequest for str {
	fn request_url(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(self))
	}
}
impl CallbackRequest for String {
	fn request_url(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(self.as_str()))
	}
}
impl<B> CallbackRequest for oauth2::http::Request<B>
where
	B: Send + Sync,
{
	fn request_url(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Owned(self.uri().to_string()))
	}
}
impl<T> CallbackRequest for &T
where
	T: ?Sized + CallbackRequest,
{
	fn request_url(&self) -> Option<Cow<'_, str>> {
		(**self).request_url()
	}

	fn callback_url(&self) -> Option<Url> {
		(**self).callback_url()
	}
}
