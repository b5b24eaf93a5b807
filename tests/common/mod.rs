//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	env, fs,
	path::{Path, PathBuf},
	process,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use httpmock::MockServer;
use time::OffsetDateTime;
// self
use api_token_broker::{
	auth::{Credentials, Secret, StoredToken},
	config::{AuthConfig, AuthMethod},
	store::{StoreFuture, TokenStore},
	url::Url,
	validator::{TokenValidator, Validation, ValidationFuture},
};

pub const API_KEY: &str = "client-key";
pub const API_SECRET: &str = "client-secret";
pub const ACCOUNT_ID: &str = "account-42";

pub fn credentials() -> Credentials {
	Credentials::new(API_KEY, API_SECRET, ACCOUNT_ID)
}

/// OAuth config pointing both the API (`/v2/`) and token endpoint (`/oauth/token`) at `server`.
pub fn oauth_config(server: &MockServer, token_path: &Path) -> AuthConfig {
	AuthConfig::new(
		AuthMethod::OAuth2,
		Url::parse(&server.url("/v2/")).expect("Mock API base URL should parse."),
		Url::parse(&server.url("/oauth/token")).expect("Mock token URL should parse."),
		token_path,
	)
	.with_request_timeout(StdDuration::from_secs(5))
}

/// Unique scratch directory under the system temp dir; removed on drop.
pub struct Scratch(PathBuf);
impl Scratch {
	pub fn new(label: &str) -> Self {
		let unique = format!(
			"api_token_broker_{label}_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		Self(env::temp_dir().join(unique))
	}

	/// Token file path inside a not-yet-existing subdirectory.
	pub fn token_path(&self) -> PathBuf {
		self.0.join("cache").join("token.json")
	}

	/// Writes `contents` to the token path, creating parents.
	pub fn seed(&self, contents: &str) -> PathBuf {
		let path = self.token_path();

		fs::create_dir_all(path.parent().expect("Token path should have a parent."))
			.expect("Scratch directory should be created.");
		fs::write(&path, contents).expect("Seed token file should be written.");

		path
	}
}
impl Drop for Scratch {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.0);
	}
}

/// Validator returning a fixed verdict and counting calls.
#[derive(Debug)]
pub struct FixedValidator {
	verdict: Validation,
	calls: AtomicUsize,
}
impl FixedValidator {
	pub fn new(verdict: Validation) -> Arc<Self> {
		Arc::new(Self { verdict, calls: AtomicUsize::new(0) })
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenValidator for FixedValidator {
	fn validate<'a>(&'a self, _token: &'a Secret) -> ValidationFuture<'a> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let verdict = self.verdict.clone();

		Box::pin(async move { verdict })
	}
}

/// Store wrapper counting writes.
pub struct CountingStore<S> {
	inner: S,
	writes: AtomicUsize,
}
impl<S> CountingStore<S>
where
	S: TokenStore,
{
	pub fn new(inner: S) -> Arc<Self> {
		Arc::new(Self { inner, writes: AtomicUsize::new(0) })
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}
}
impl<S> TokenStore for CountingStore<S>
where
	S: TokenStore,
{
	fn read(&self) -> StoreFuture<'_, Option<StoredToken>> {
		self.inner.read()
	}

	fn write(&self, token: StoredToken) -> StoreFuture<'_, ()> {
		self.writes.fetch_add(1, Ordering::SeqCst);

		self.inner.write(token)
	}

	fn location(&self) -> String {
		self.inner.location()
	}
}
