//! OAuth 2.0 `account_credentials` exchange.
//!
//! The grant is a client-credentials variant: HTTP Basic client authentication plus
//! `grant_type=account_credentials&account_id=...` in the form body. The response body is
//! returned verbatim (wrapped in [`StoredToken`]) so the store can persist exactly what the
//! server sent.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, StoredToken, TokenFormatError},
	http::{ReqwestHttpClient, ResponseMetadata},
};

/// Grant type sent to the token endpoint.
pub const ACCOUNT_CREDENTIALS_GRANT: &str = "account_credentials";

const BODY_PREVIEW_LIMIT: usize = 256;

/// Failures of the refresh round-trip. None of them leave a partial write behind.
#[derive(Debug, ThisError)]
pub enum TokenRefreshError {
	/// Underlying HTTP client reported a network failure or timeout.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport failure.
		#[source]
		source: ReqwestError,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body_preview}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint answered 2xx with a body that is not a usable token response.
	#[error("Token endpoint returned a malformed token response.")]
	MalformedBody {
		/// HTTP status code.
		status: u16,
		/// Parsing failure.
		#[source]
		source: TokenFormatError,
	},
}
impl TokenRefreshError {
	/// HTTP status associated with the failure, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Network { source } => source.status().map(|code| code.as_u16()),
			Self::Status { status, .. } | Self::MalformedBody { status, .. } => Some(*status),
		}
	}

	/// Returns `true` when the failure was a timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Network { source } if source.is_timeout())
	}
}

/// `Authorization` header value for HTTP Basic client authentication.
pub fn basic_authorization(credentials: &Credentials) -> String {
	let pair = format!("{}:{}", credentials.api_key, credentials.api_secret.expose());

	format!("Basic {}", STANDARD.encode(pair))
}

/// Requests a fresh token from `token_url` using the `account_credentials` grant.
pub async fn request_account_token(
	http_client: &ReqwestHttpClient,
	token_url: &Url,
	credentials: &Credentials,
	timeout: StdDuration,
) -> Result<StoredToken, TokenRefreshError> {
	let form = [
		("grant_type", ACCOUNT_CREDENTIALS_GRANT),
		("account_id", credentials.account_id.as_str()),
	];
	let response = http_client
		.post(token_url.clone())
		.header(AUTHORIZATION, basic_authorization(credentials))
		.form(&form)
		.timeout(timeout)
		.send()
		.await
		.map_err(|source| TokenRefreshError::Network { source })?;
	let meta = ResponseMetadata::from_response(&response);
	let status = response.status();
	let body = response.text().await.map_err(|source| TokenRefreshError::Network { source })?;

	if !status.is_success() {
		return Err(TokenRefreshError::Status {
			status: status.as_u16(),
			body_preview: truncate_preview(body),
			retry_after: meta.retry_after,
		});
	}

	StoredToken::from_json(body)
		.map_err(|source| TokenRefreshError::MalformedBody { status: status.as_u16(), source })
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}
