//! Demonstrates the signed-token strategy configured from `DEMO_*` variables.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
// self
use api_token_broker::{auth::Secret, config::AuthSettings, jwt, provider::TokenProvider};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let vars = HashMap::from([
		("DEMO_API_KEY", "demo-key"),
		("DEMO_API_SECRET", "demo-secret"),
		("DEMO_TOKEN_LIFE", "900"),
	]);
	let (config, credentials) =
		AuthSettings::from_lookup("DEMO", |key| vars.get(key).map(|v| (*v).to_owned()))?
			.into_parts()?;
	let provider = TokenProvider::new(config, credentials)?;
	let request = provider.authenticated_request().await?;
	let claims = jwt::decode_claims(request.bearer().expose(), &Secret::new("demo-secret"))?;

	println!("Signed for {} until {}.", claims.iss, claims.exp);
	println!("Calls go to {}.", request.url("users/me")?);

	Ok(())
}
