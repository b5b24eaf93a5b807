//! Token provider: strategy dispatch and the authorized-request entry point.
//!
//! [`TokenProvider`] owns the injected configuration, credentials, HTTP client, token store,
//! and validator. Strategy-specific logic lives in the `signed` and `account` submodules as
//! additional `impl` blocks.

mod account;
mod signed;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	config::{AuthConfig, AuthMethod, AuthSettings},
	http::{AuthorizedRequest, ReqwestHttpClient},
	store::{FileStore, TokenStore},
	validator::{ProbeValidator, TokenValidator},
};

/// Produces bearer credentials for outbound API calls.
///
/// Exactly one strategy is active per provider, chosen by [`AuthConfig::method`]. The OAuth
/// strategy serializes validate/refresh/write behind a per-provider async mutex, so
/// concurrent callers sharing one provider trigger at most one refresh. Clones share that
/// guard and the confirmed-valid window.
#[derive(Clone)]
pub struct TokenProvider {
	/// Validated configuration.
	pub config: AuthConfig,
	/// API credentials.
	pub credentials: Credentials,
	/// HTTP client used for probes, refreshes, and authorized requests.
	pub http_client: ReqwestHttpClient,
	/// Cache for the OAuth token.
	pub store: Arc<dyn TokenStore>,
	/// Decides whether a cached OAuth token is still accepted.
	pub validator: Arc<dyn TokenValidator>,
	refresh_guard: Arc<AsyncMutex<()>>,
	confirmed_until: Arc<Mutex<Option<OffsetDateTime>>>,
}
impl TokenProvider {
	/// Creates a provider with a [`FileStore`] at the configured path and a live
	/// [`ProbeValidator`].
	pub fn new(config: AuthConfig, credentials: Credentials) -> Result<Self> {
		config.ensure_valid()?;

		let http_client = ReqwestHttpClient::with_connect_timeout(config.request_timeout)?;
		let store: Arc<dyn TokenStore> = Arc::new(FileStore::new(&config.token_storage_path));
		let validator: Arc<dyn TokenValidator> =
			Arc::new(ProbeValidator::from_config(http_client.clone(), &config)?);

		Ok(Self::with_parts(config, credentials, http_client, store, validator))
	}

	/// Creates a provider from `API_*` environment variables.
	pub fn from_env() -> Result<Self> {
		let (config, credentials) = AuthSettings::from_env()?.into_parts()?;

		Self::new(config, credentials)
	}

	/// Creates a provider from caller-supplied collaborators.
	pub fn with_parts(
		config: AuthConfig,
		credentials: Credentials,
		http_client: ReqwestHttpClient,
		store: Arc<dyn TokenStore>,
		validator: Arc<dyn TokenValidator>,
	) -> Self {
		Self {
			config,
			credentials,
			http_client,
			store,
			validator,
			refresh_guard: Arc::new(AsyncMutex::new(())),
			confirmed_until: Default::default(),
		}
	}

	/// Replaces the token store.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = store;
		self.confirmed_until = Default::default();

		self
	}

	/// Replaces the token validator.
	pub fn with_validator(mut self, validator: Arc<dyn TokenValidator>) -> Self {
		self.validator = validator;
		self.confirmed_until = Default::default();

		self
	}

	/// Returns a request factory with the base URL and a valid bearer applied.
	///
	/// The signed-token strategy never touches the network here. The OAuth strategy may
	/// probe and refresh before returning.
	pub async fn authenticated_request(&self) -> Result<AuthorizedRequest> {
		let bearer = self.bearer_token().await?;

		Ok(AuthorizedRequest::new(
			self.http_client.clone(),
			self.config.api_base_url.clone(),
			bearer,
			self.config.request_timeout,
		))
	}

	/// Returns just the bearer credential for the active strategy.
	pub async fn bearer_token(&self) -> Result<Secret> {
		match self.config.method {
			AuthMethod::Jwt => self.signed_token(),
			AuthMethod::OAuth2 => self.account_token().await,
		}
	}

	/// Forgets any confirmed-valid window so the next OAuth call probes again.
	///
	/// Call this after a downstream request was rejected with `401`.
	pub fn invalidate(&self) {
		*self.confirmed_until.lock() = None;
	}
}
impl Debug for TokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("method", &self.config.method)
			.field("api_base_url", &self.config.api_base_url.as_str())
			.field("store", &self.store.location())
			.field("api_key", &self.credentials.api_key)
			.finish()
	}
}
