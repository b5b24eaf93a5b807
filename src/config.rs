//! Configuration surface.
//!
//! [`AuthSettings`] is the raw, serde-friendly shape (environment variables, a config file,
//! or any other deserializer). [`AuthSettings::into_parts`] validates it into the immutable
//! [`AuthConfig`] + [`Credentials`] pair injected into the provider at construction.

// std
use std::env;
// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

/// Environment variable prefix used by [`AuthSettings::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "API";
/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.zoom.us/v2/";
/// Default OAuth token endpoint.
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://zoom.us/oauth/token";
/// Default token cache location.
pub const DEFAULT_TOKEN_JSON: &str = "api_token.json";
/// Default probe path, relative to the base URL.
pub const DEFAULT_PROBE_PATH: &str = "users";
/// Longest accepted signed-token lifetime or trust window, in seconds (ten years).
pub const MAX_DURATION_SECS: u64 = 60 * 60 * 24 * 365 * 10;

const DEFAULT_TOKEN_LIFE_SECS: u64 = 60 * 60 * 24 * 7;
const DEFAULT_MAX_API_CALLS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Authentication strategy selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuthMethod {
	/// Per-request HS256 token signed with the API secret.
	#[default]
	Jwt,
	/// Cached OAuth 2.0 `account_credentials` token.
	OAuth2,
}
impl AuthMethod {
	/// Returns the configuration label for the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthMethod::Jwt => "jwt",
			AuthMethod::OAuth2 => "oauth2",
		}
	}
}
impl Display for AuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AuthMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			v if v.eq_ignore_ascii_case("jwt") => Ok(Self::Jwt),
			v if v.eq_ignore_ascii_case("oauth2") => Ok(Self::OAuth2),
			other => Err(ConfigError::UnsupportedAuthMethod { method: other.to_owned() }),
		}
	}
}
impl TryFrom<String> for AuthMethod {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<AuthMethod> for String {
	fn from(value: AuthMethod) -> Self {
		value.as_str().to_owned()
	}
}

/// How the OAuth strategy decides that a cached token is still usable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
	/// Probe the API before every use of the cached token.
	#[default]
	AlwaysProbe,
	/// Skip the probe while a previous probe or refresh succeeded less than this long ago.
	///
	/// The window is clamped to the token's advertised `expires_in` (minus a safety margin)
	/// after a refresh.
	TrustConfirmedFor(Duration),
}

/// Immutable, validated configuration consumed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
	/// Active authentication strategy.
	pub method: AuthMethod,
	/// Lifetime stamped into signed tokens.
	pub token_lifetime: Duration,
	/// Location of the OAuth token cache file.
	pub token_storage_path: PathBuf,
	/// OAuth token endpoint.
	pub oauth_token_url: Url,
	/// Base URL of the remote API; always ends with `/`.
	pub api_base_url: Url,
	/// Path (relative to the base URL) probed to validate cached tokens.
	pub probe_path: String,
	/// Timeout applied to every outbound call (probe, refresh, downstream requests).
	pub request_timeout: StdDuration,
	/// Cached-token validation policy.
	pub validation: ValidationMode,
	/// Upper bound of API calls per logical request; carried for callers, unused here.
	pub max_api_calls_per_request: u32,
}
impl AuthConfig {
	/// Creates a configuration with default lifetime, probe path, timeout, and validation.
	pub fn new(
		method: AuthMethod,
		api_base_url: Url,
		oauth_token_url: Url,
		token_storage_path: impl Into<PathBuf>,
	) -> Self {
		Self {
			method,
			token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFE_SECS as i64),
			token_storage_path: token_storage_path.into(),
			oauth_token_url,
			api_base_url: normalize_base_url(api_base_url),
			probe_path: DEFAULT_PROBE_PATH.into(),
			request_timeout: StdDuration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
			validation: ValidationMode::default(),
			max_api_calls_per_request: DEFAULT_MAX_API_CALLS,
		}
	}

	/// Overrides the signed-token lifetime.
	pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
		self.token_lifetime = lifetime;

		self
	}

	/// Overrides the probe path.
	pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
		self.probe_path = path.into();

		self
	}

	/// Overrides the outbound request timeout.
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the validation policy.
	pub fn with_validation(mut self, validation: ValidationMode) -> Self {
		self.validation = match validation {
			ValidationMode::TrustConfirmedFor(ttl) if !ttl.is_positive() =>
				ValidationMode::AlwaysProbe,
			other => other,
		};

		self
	}

	/// Overrides the per-request API call budget.
	pub fn with_max_api_calls_per_request(mut self, max: u32) -> Self {
		self.max_api_calls_per_request = max;

		self
	}

	/// Rejects a non-positive signed-token lifetime and durations beyond
	/// [`MAX_DURATION_SECS`].
	pub fn ensure_valid(&self) -> Result<(), ConfigError> {
		if !self.token_lifetime.is_positive() {
			return Err(ConfigError::NonPositiveLifetime);
		}

		check_duration_bound("token_lifetime", self.token_lifetime)?;

		if let ValidationMode::TrustConfirmedFor(ttl) = self.validation {
			check_duration_bound("trust_confirmed_for", ttl)?;
		}

		Ok(())
	}
}

/// Raw settings as they appear in the environment or a config file.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
	/// API key / OAuth client id.
	pub api_key: String,
	/// API secret / OAuth client secret.
	pub api_secret: String,
	/// Account identifier for the `account_credentials` grant.
	pub account_id: String,
	/// API base URL.
	pub base_url: String,
	/// OAuth token endpoint.
	pub oauth_token_url: String,
	/// Signed-token lifetime in seconds.
	pub token_life: u64,
	/// `jwt` or `oauth2`.
	pub authentication_method: String,
	/// Upper bound of API calls per logical request.
	pub max_api_calls_per_request: u32,
	/// Token cache file path.
	pub token_json: PathBuf,
	/// Outbound request timeout in seconds.
	pub request_timeout: u64,
	/// Probe path relative to the base URL.
	pub probe_path: String,
	/// Seconds a confirmed token is trusted without re-probing; absent means always probe.
	pub trust_confirmed_for: Option<u64>,
}
impl AuthSettings {
	/// Loads settings from `API_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
	}

	/// Loads settings from `<prefix>_*` environment variables.
	pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
		Self::from_lookup(prefix, |key| env::var(key).ok())
	}

	/// Loads settings through an arbitrary `key -> value` lookup; absent keys keep defaults.
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |suffix: &str| {
			let key = format!("{prefix}_{suffix}");

			lookup(&key).map(|value| (key, value))
		};
		let mut settings = Self::default();

		if let Some((_, v)) = get("API_KEY") {
			settings.api_key = v;
		}
		if let Some((_, v)) = get("API_SECRET") {
			settings.api_secret = v;
		}
		if let Some((_, v)) = get("ACCOUNT_ID") {
			settings.account_id = v;
		}
		if let Some((_, v)) = get("BASE_URL") {
			settings.base_url = v;
		}
		if let Some((_, v)) = get("OAUTH_TOKEN_URL") {
			settings.oauth_token_url = v;
		}
		if let Some((k, v)) = get("TOKEN_LIFE") {
			settings.token_life = parse_number(&k, &v)?;
		}
		if let Some((_, v)) = get("AUTH_METHOD") {
			settings.authentication_method = v;
		}
		if let Some((k, v)) = get("MAX_API_CALLS_PER_REQUEST") {
			settings.max_api_calls_per_request = parse_number(&k, &v)?;
		}
		if let Some((_, v)) = get("TOKEN_JSON") {
			settings.token_json = v.into();
		}
		if let Some((k, v)) = get("REQUEST_TIMEOUT") {
			settings.request_timeout = parse_number(&k, &v)?;
		}
		if let Some((_, v)) = get("PROBE_PATH") {
			settings.probe_path = v;
		}
		if let Some((k, v)) = get("TRUST_CONFIRMED_FOR") {
			settings.trust_confirmed_for = Some(parse_number(&k, &v)?);
		}

		Ok(settings)
	}

	/// Validates the settings into an [`AuthConfig`] and [`Credentials`].
	pub fn into_parts(self) -> Result<(AuthConfig, Credentials), ConfigError> {
		let method: AuthMethod = self.authentication_method.parse()?;

		require("api_key", &self.api_key)?;
		require("api_secret", &self.api_secret)?;

		if method == AuthMethod::OAuth2 {
			require("account_id", &self.account_id)?;
		}

		let api_base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "base_url", source })?;
		let oauth_token_url = Url::parse(&self.oauth_token_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "oauth_token_url", source })?;
		let token_life = bounded_seconds("token_life", self.token_life)?;

		if self.request_timeout == 0 {
			return Err(ConfigError::InvalidValue {
				key: "request_timeout".into(),
				reason: "timeout must be at least one second".into(),
			});
		}

		let validation = match self.trust_confirmed_for {
			Some(secs) if secs > 0 =>
				ValidationMode::TrustConfirmedFor(bounded_seconds("trust_confirmed_for", secs)?),
			_ => ValidationMode::AlwaysProbe,
		};
		let config = AuthConfig::new(method, api_base_url, oauth_token_url, self.token_json)
			.with_token_lifetime(token_life)
			.with_probe_path(self.probe_path)
			.with_request_timeout(StdDuration::from_secs(self.request_timeout))
			.with_validation(validation)
			.with_max_api_calls_per_request(self.max_api_calls_per_request);

		config.ensure_valid()?;

		let credentials = Credentials::new(self.api_key, self.api_secret, self.account_id);

		Ok((config, credentials))
	}
}
impl Default for AuthSettings {
	fn default() -> Self {
		Self {
			api_key: String::new(),
			api_secret: String::new(),
			account_id: String::new(),
			base_url: DEFAULT_BASE_URL.into(),
			oauth_token_url: DEFAULT_OAUTH_TOKEN_URL.into(),
			token_life: DEFAULT_TOKEN_LIFE_SECS,
			authentication_method: AuthMethod::default().as_str().into(),
			max_api_calls_per_request: DEFAULT_MAX_API_CALLS,
			token_json: DEFAULT_TOKEN_JSON.into(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
			probe_path: DEFAULT_PROBE_PATH.into(),
			trust_confirmed_for: None,
		}
	}
}
impl Debug for AuthSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthSettings")
			.field("api_key", &self.api_key)
			.field("api_secret_set", &!self.api_secret.is_empty())
			.field("account_id", &self.account_id)
			.field("base_url", &self.base_url)
			.field("oauth_token_url", &self.oauth_token_url)
			.field("token_life", &self.token_life)
			.field("authentication_method", &self.authentication_method)
			.field("max_api_calls_per_request", &self.max_api_calls_per_request)
			.field("token_json", &self.token_json)
			.field("request_timeout", &self.request_timeout)
			.field("probe_path", &self.probe_path)
			.field("trust_confirmed_for", &self.trust_confirmed_for)
			.finish()
	}
}

fn normalize_base_url(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

fn require(key: &str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::MissingValue { key: key.into() });
	}

	Ok(())
}

fn bounded_seconds(key: &str, secs: u64) -> Result<Duration, ConfigError> {
	if secs > MAX_DURATION_SECS {
		return Err(out_of_range(key));
	}

	Ok(Duration::seconds(secs as i64))
}

fn check_duration_bound(key: &str, duration: Duration) -> Result<(), ConfigError> {
	if duration > Duration::seconds(MAX_DURATION_SECS as i64) {
		return Err(out_of_range(key));
	}

	Ok(())
}

fn out_of_range(key: &str) -> ConfigError {
	ConfigError::InvalidValue {
		key: key.into(),
		reason: format!("duration must not exceed {MAX_DURATION_SECS} seconds"),
	}
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	value
		.trim()
		.parse()
		.map_err(|e: T::Err| ConfigError::InvalidValue { key: key.into(), reason: e.to_string() })
}
