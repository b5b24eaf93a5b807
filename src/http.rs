//! Transport primitives: the shared reqwest handle, response metadata captured for error
//! reporting, and [`AuthorizedRequest`], the provider's output.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Method, RequestBuilder,
	header::{HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Every call made through this crate also sets a per-request timeout taken from
/// [`AuthConfig::request_timeout`](crate::config::AuthConfig::request_timeout), so a client
/// supplied through [`ReqwestHttpClient::with_client`] does not need one of its own.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose connect phase is bounded by `timeout`.
	pub fn with_connect_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().connect_timeout(timeout).build()?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Metadata from an HTTP response kept for error reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures status and retry hint from a response.
	pub fn from_response(response: &reqwest::Response) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}
}

/// Request factory carrying the base URL, bearer credential, and timeout.
///
/// Returned by [`TokenProvider::authenticated_request`](crate::provider::TokenProvider::authenticated_request).
/// The bearer is fixed at construction; ask the provider for a new one per logical call.
#[derive(Clone, Debug)]
pub struct AuthorizedRequest {
	http_client: ReqwestHttpClient,
	base_url: Url,
	bearer: Secret,
	timeout: StdDuration,
}
impl AuthorizedRequest {
	/// Bundles a bearer with the target API.
	pub fn new(
		http_client: ReqwestHttpClient,
		base_url: Url,
		bearer: Secret,
		timeout: StdDuration,
	) -> Self {
		Self { http_client, base_url, bearer, timeout }
	}

	/// Base URL every relative path is joined onto.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Bearer credential applied to every request.
	pub fn bearer(&self) -> &Secret {
		&self.bearer
	}

	/// Timeout applied to every request.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// Value of the `Authorization` header.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.bearer.expose())
	}

	/// Resolves `path` against the base URL. Leading slashes are ignored so paths stay
	/// beneath the base path.
	pub fn url(&self, path: &str) -> Result<Url> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidUrl { field: "request path", source }.into())
	}

	/// Starts a request with the bearer and timeout applied.
	pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
		let url = self.url(path)?;

		Ok(self
			.http_client
			.request(method, url)
			.bearer_auth(self.bearer.expose())
			.timeout(self.timeout))
	}

	/// Starts a `GET` request.
	pub fn get(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::GET, path)
	}

	/// Starts a `POST` request.
	pub fn post(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::POST, path)
	}

	/// Starts a `PUT` request.
	pub fn put(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::PUT, path)
	}

	/// Starts a `PATCH` request.
	pub fn patch(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::PATCH, path)
	}

	/// Starts a `DELETE` request.
	pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::DELETE, path)
	}
}

pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).ok()?));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
