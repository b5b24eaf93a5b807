//! Crate-level error types shared by the provider, strategies, and stores.

// self
use crate::{_prelude::*, auth::TokenFormatError, oauth::TokenRefreshError, store::StoreError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem (unsupported method, malformed secret, bad URL).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No cached OAuth token exists yet.
	#[error("No cached token exists at {location}.")]
	MissingToken {
		/// Human-readable store location (file path or backend label).
		location: String,
	},
	/// The refresh round-trip against the token endpoint failed.
	#[error(transparent)]
	TokenRefresh(#[from] TokenRefreshError),
	/// The cached token payload carries no usable `access_token`.
	#[error("Invalid token format: {0}")]
	InvalidTokenFormat(#[from] TokenFormatError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Authentication method string is neither `jwt` nor `oauth2`.
	#[error("Unsupported authentication method `{method}`.")]
	UnsupportedAuthMethod {
		/// Method string as configured.
		method: String,
	},
	/// API secret cannot be used as a signing key.
	#[error("API secret is empty or malformed.")]
	MalformedSecret,
	/// Signing primitive rejected the claims or key.
	#[error("Unable to sign token claims.")]
	Signing {
		/// Underlying JWT failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// A configured URL (or a path joined onto one) cannot be parsed.
	#[error("Configured {field} is not a valid URL.")]
	InvalidUrl {
		/// Name of the offending field.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required configuration value is absent or empty.
	#[error("Configuration value `{key}` is required.")]
	MissingValue {
		/// Configuration key.
		key: String,
	},
	/// A configuration value could not be interpreted.
	#[error("Configuration value `{key}` is invalid: {reason}.")]
	InvalidValue {
		/// Configuration key.
		key: String,
		/// Why the value was rejected.
		reason: String,
	},
	/// Signed-token lifetime must be positive.
	#[error("Token lifetime must be positive.")]
	NonPositiveLifetime,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
