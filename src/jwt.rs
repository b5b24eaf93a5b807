//! Signed-token strategy primitives.
//!
//! Tokens are HS256 JWTs with the API key as issuer and an expiry `lifetime` seconds ahead.
//! A random `jti` keeps two tokens minted within the same second distinct. Nothing here
//! touches the network or storage.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	error::ConfigError,
};

/// Claims carried by a signed token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTokenClaims {
	/// Issuer; the API key.
	pub iss: String,
	/// Expiry as a Unix timestamp.
	pub exp: i64,
	/// Issued-at as a Unix timestamp.
	pub iat: i64,
	/// Random token identifier.
	pub jti: String,
}
impl SignedTokenClaims {
	/// Builds claims for `issuer` valid for `lifetime` from `now`.
	///
	/// Fails when the expiry falls outside the representable date range.
	pub fn new(
		issuer: impl Into<String>,
		now: OffsetDateTime,
		lifetime: Duration,
	) -> Result<Self, ConfigError> {
		let expires_at = now.checked_add(lifetime).ok_or_else(|| ConfigError::InvalidValue {
			key: "token_lifetime".into(),
			reason: "expiry is out of range".into(),
		})?;
		let jti = format!("{:032x}", rand::rng().random::<u128>());

		Ok(Self {
			iss: issuer.into(),
			exp: expires_at.unix_timestamp(),
			iat: now.unix_timestamp(),
			jti,
		})
	}

	/// Expiry as an instant.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.exp).ok()
	}
}

/// Mints a signed token for `credentials`, expiring `lifetime` after `now`.
pub fn sign(
	credentials: &Credentials,
	lifetime: Duration,
	now: OffsetDateTime,
) -> Result<Secret, ConfigError> {
	if credentials.api_secret.is_blank() {
		return Err(ConfigError::MalformedSecret);
	}
	if !lifetime.is_positive() {
		return Err(ConfigError::NonPositiveLifetime);
	}

	let claims = SignedTokenClaims::new(credentials.api_key.clone(), now, lifetime)?;
	let key = EncodingKey::from_secret(credentials.api_secret.expose().as_bytes());
	let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
		.map_err(|source| ConfigError::Signing { source })?;

	Ok(Secret::new(token))
}

/// Verifies `token` against `api_secret` and returns its claims.
///
/// Expired tokens are rejected.
pub fn decode_claims(token: &str, api_secret: &Secret) -> Result<SignedTokenClaims, ConfigError> {
	if api_secret.is_blank() {
		return Err(ConfigError::MalformedSecret);
	}

	let key = DecodingKey::from_secret(api_secret.expose().as_bytes());
	let mut validation = Validation::new(Algorithm::HS256);

	validation.set_required_spec_claims(&["exp", "iss"]);

	let data = jsonwebtoken::decode::<SignedTokenClaims>(token, &key, &validation)
		.map_err(|source| ConfigError::Signing { source })?;

	Ok(data.claims)
}
