//! Cached-token validation.
//!
//! Validation is empirical: a token is valid when the remote API accepts it. The
//! [`TokenValidator`] seam lets tests (or callers with a cheaper signal) replace the live
//! [`ProbeValidator`].

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::AuthConfig,
	error::ConfigError,
	http::ReqwestHttpClient,
};

/// Boxed future returned by [`TokenValidator::validate`].
pub type ValidationFuture<'a> = Pin<Box<dyn Future<Output = Validation> + 'a + Send>>;

/// Outcome of checking a cached token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
	/// The server accepts the token.
	Valid,
	/// The token must be refreshed.
	Invalid(InvalidReason),
}
impl Validation {
	/// Returns `true` for [`Validation::Valid`].
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid)
	}
}

/// Why a cached token was judged unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidReason {
	/// No token has been stored yet.
	Missing,
	/// The store could not be read.
	Unreadable {
		/// Backend failure message.
		message: String,
	},
	/// The stored payload is not valid JSON.
	Malformed {
		/// Parser failure message.
		message: String,
	},
	/// The probe endpoint answered with a non-success status.
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// The probe could not reach the API (network failure or timeout).
	Unreachable {
		/// Transport failure message.
		message: String,
	},
}
impl InvalidReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Missing => "missing",
			Self::Unreadable { .. } => "unreadable",
			Self::Malformed { .. } => "malformed",
			Self::Rejected { .. } => "rejected",
			Self::Unreachable { .. } => "unreachable",
		}
	}
}
impl Display for InvalidReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Missing => f.write_str("no cached token"),
			Self::Unreadable { message } => write!(f, "token store unreadable: {message}"),
			Self::Malformed { message } => write!(f, "cached token is malformed: {message}"),
			Self::Rejected { status } => write!(f, "probe rejected the token with HTTP {status}"),
			Self::Unreachable { message } => write!(f, "probe failed: {message}"),
		}
	}
}

/// Capability that decides whether the server still accepts a token.
pub trait TokenValidator
where
	Self: Send + Sync,
{
	/// Checks `token` against the server (or a stand-in).
	fn validate<'a>(&'a self, token: &'a Secret) -> ValidationFuture<'a>;
}

/// Validates tokens by issuing an authenticated `GET` against a lightweight endpoint.
#[derive(Clone, Debug)]
pub struct ProbeValidator {
	http_client: ReqwestHttpClient,
	probe_url: Url,
	timeout: StdDuration,
}
impl ProbeValidator {
	/// Probes `probe_url` with the given timeout.
	pub fn new(http_client: ReqwestHttpClient, probe_url: Url, timeout: StdDuration) -> Self {
		Self { http_client, probe_url, timeout }
	}

	/// Probes `api_base_url` + `probe_path` from the configuration.
	pub fn from_config(
		http_client: ReqwestHttpClient,
		config: &AuthConfig,
	) -> Result<Self, ConfigError> {
		let probe_url = config
			.api_base_url
			.join(config.probe_path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidUrl { field: "probe_path", source })?;

		Ok(Self::new(http_client, probe_url, config.request_timeout))
	}

	/// Endpoint hit by each probe.
	pub fn probe_url(&self) -> &Url {
		&self.probe_url
	}
}
impl TokenValidator for ProbeValidator {
	fn validate<'a>(&'a self, token: &'a Secret) -> ValidationFuture<'a> {
		Box::pin(async move {
			let result = self
				.http_client
				.get(self.probe_url.clone())
				.bearer_auth(token.expose())
				.timeout(self.timeout)
				.send()
				.await;

			match result {
				Ok(response) if response.status().is_success() => Validation::Valid,
				Ok(response) =>
					Validation::Invalid(InvalidReason::Rejected { status: response.status().as_u16() }),
				Err(e) => Validation::Invalid(InvalidReason::Unreachable { message: e.to_string() }),
			}
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::config::AuthMethod;

	fn config(base: &str) -> AuthConfig {
		AuthConfig::new(
			AuthMethod::OAuth2,
			Url::parse(base).expect("Base URL fixture should parse."),
			Url::parse("https://example.com/oauth/token").expect("Token URL fixture should parse."),
			"token.json",
		)
		.with_request_timeout(StdDuration::from_secs(5))
	}

	#[test]
	fn probe_url_joins_probe_path() {
		let validator = ProbeValidator::from_config(
			ReqwestHttpClient::default(),
			&config("https://api.example.com/v2").with_probe_path("/users/me"),
		)
		.expect("Probe URL should resolve.");

		assert_eq!(validator.probe_url().as_str(), "https://api.example.com/v2/users/me");
	}

	#[test]
	fn reason_labels_are_stable() {
		assert_eq!(InvalidReason::Missing.as_str(), "missing");
		assert_eq!(InvalidReason::Rejected { status: 401 }.as_str(), "rejected");
		assert_eq!(
			InvalidReason::Rejected { status: 401 }.to_string(),
			"probe rejected the token with HTTP 401"
		);
	}

	#[tokio::test]
	async fn probe_maps_status_to_validation() {
		let server = MockServer::start_async().await;
		let accepted = server
			.mock_async(|when, then| {
				when.method(GET).path("/v2/users").header("authorization", "Bearer good");
				then.status(200).body("{\"users\":[]}");
			})
			.await;
		let rejected = server
			.mock_async(|when, then| {
				when.method(GET).path("/v2/users").header("authorization", "Bearer stale");
				then.status(401).body("{\"code\":124,\"message\":\"Invalid access token.\"}");
			})
			.await;
		let validator =
			ProbeValidator::from_config(ReqwestHttpClient::default(), &config(&server.url("/v2/")))
				.expect("Probe URL should resolve.");

		assert_eq!(validator.validate(&Secret::new("good")).await, Validation::Valid);
		assert_eq!(
			validator.validate(&Secret::new("stale")).await,
			Validation::Invalid(InvalidReason::Rejected { status: 401 })
		);

		accepted.assert_async().await;
		rejected.assert_async().await;
	}

	#[tokio::test]
	async fn slow_probe_times_out_as_unreachable() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET).path("/v2/users");
				then.status(200).delay(StdDuration::from_secs(3));
			})
			.await;

		let validator = ProbeValidator::from_config(
			ReqwestHttpClient::default(),
			&config(&server.url("/v2/")).with_request_timeout(StdDuration::from_secs(1)),
		)
		.expect("Probe URL should resolve.");
		let outcome = validator.validate(&Secret::new("slow")).await;

		assert!(matches!(outcome, Validation::Invalid(InvalidReason::Unreachable { .. })));
	}

	#[tokio::test]
	async fn unreachable_probe_is_invalid() {
		let validator = ProbeValidator::new(
			ReqwestHttpClient::default(),
			Url::parse("http://127.0.0.1:9/users").expect("Probe URL fixture should parse."),
			StdDuration::from_secs(2),
		);
		let outcome = validator.validate(&Secret::new("any")).await;

		assert!(matches!(outcome, Validation::Invalid(InvalidReason::Unreachable { .. })));
	}
}
