//! API credentials shared by both authentication strategies.

// self
use crate::{_prelude::*, auth::Secret};

/// Key, secret, and account identifier issued by the remote API.
///
/// The signed-token strategy uses `api_key` as the issuer and `api_secret` as the HMAC key.
/// The OAuth strategy sends `api_key:api_secret` as HTTP Basic credentials together with
/// `account_id` in the grant form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Public API key (JWT issuer, OAuth client id).
	pub api_key: String,
	/// API secret; redacted in `Debug` output.
	pub api_secret: Secret,
	/// Account identifier sent with the `account_credentials` grant.
	pub account_id: String,
}
impl Credentials {
	/// Bundles the three credential values.
	pub fn new(
		api_key: impl Into<String>,
		api_secret: impl Into<Secret>,
		account_id: impl Into<String>,
	) -> Self {
		Self { api_key: api_key.into(), api_secret: api_secret.into(), account_id: account_id.into() }
	}
}
