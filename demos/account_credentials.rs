//! Demonstrates the OAuth `account_credentials` strategy against a mock server: the first call
//! refreshes and caches the token on disk, the second probes and reuses it.

// std
use std::{env, fs, process};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use api_token_broker::{
	auth::Credentials,
	config::{AuthConfig, AuthMethod},
	provider::TokenProvider,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.form_urlencoded_tuple("grant_type", "account_credentials");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let probe_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/users").header("authorization", "Bearer demo-access");
			then.status(200).body("{\"users\":[]}");
		})
		.await;
	let token_path = env::temp_dir().join(format!("api_token_broker_demo_{}.json", process::id()));
	let config = AuthConfig::new(
		AuthMethod::OAuth2,
		Url::parse(&server.url("/v2/"))?,
		Url::parse(&server.url("/oauth/token"))?,
		&token_path,
	);
	let provider =
		TokenProvider::new(config, Credentials::new("demo-key", "demo-secret", "demo-account"))?;
	let first = provider.authenticated_request().await?;

	println!("Refreshed bearer: {}.", first.bearer().expose());
	println!("Cached at {}: {}", token_path.display(), fs::read_to_string(&token_path)?);

	let second = provider.authenticated_request().await?;

	println!("Reused bearer: {}.", second.authorization_header());

	token_mock.assert_calls_async(1).await;
	probe_mock.assert_calls_async(1).await;

	fs::remove_file(&token_path)?;

	Ok(())
}
