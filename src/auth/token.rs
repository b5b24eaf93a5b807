//! Cached OAuth token payload.
//!
//! The token endpoint's JSON body is stored verbatim; this crate only requires a non-empty
//! string `access_token` field and reads `expires_in` when the server supplies one. Oversized
//! `expires_in` values are capped at [`MAX_DURATION_SECS`].

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::Secret, config::MAX_DURATION_SECS};

/// Reasons a token payload cannot yield a bearer credential.
#[derive(Debug, ThisError)]
pub enum TokenFormatError {
	/// Payload is not valid JSON.
	#[error("Token payload is not valid JSON.")]
	Malformed {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// Payload parsed but has no non-empty string `access_token`.
	#[error("Token payload has no usable access_token field.")]
	MissingAccessToken,
}

/// Token response as persisted by a [`TokenStore`](crate::store::TokenStore).
#[derive(Clone, PartialEq, Eq)]
pub struct StoredToken {
	access_token: Secret,
	expires_in: Option<Duration>,
	raw: String,
}
impl StoredToken {
	/// Parses a raw token response, keeping the original text for persistence.
	pub fn from_json(raw: impl Into<String>) -> Result<Self, TokenFormatError> {
		let raw = raw.into();
		let value: Value =
			serde_json::from_str(&raw).map_err(|source| TokenFormatError::Malformed { source })?;
		let access_token = value
			.get("access_token")
			.and_then(Value::as_str)
			.filter(|token| !token.trim().is_empty())
			.ok_or(TokenFormatError::MissingAccessToken)?;
		let expires_in = value
			.get("expires_in")
			.and_then(Value::as_i64)
			.filter(|secs| *secs > 0)
			.map(|secs| Duration::seconds(secs.min(MAX_DURATION_SECS as i64)));

		Ok(Self { access_token: Secret::new(access_token), expires_in, raw })
	}

	/// Bearer credential carried by the payload.
	pub fn access_token(&self) -> &Secret {
		&self.access_token
	}

	/// Relative lifetime advertised by the server, if any.
	pub fn expires_in(&self) -> Option<Duration> {
		self.expires_in
	}

	/// Payload exactly as received from the token endpoint.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Consumes the token, returning the verbatim payload.
	pub fn into_raw(self) -> String {
		self.raw
	}
}
impl Debug for StoredToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoredToken")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("raw_len", &self.raw.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keeps_payload_verbatim() {
		let raw = "{\"access_token\":\"abc123\",\"token_type\":\"bearer\",\"expires_in\":3599,\"scope\":\"user:read\"}";
		let token = StoredToken::from_json(raw).expect("Well-formed payload should parse.");

		assert_eq!(token.access_token().expose(), "abc123");
		assert_eq!(token.expires_in(), Some(Duration::seconds(3599)));
		assert_eq!(token.raw(), raw);
	}

	#[test]
	fn rejects_payload_without_access_token() {
		for raw in ["{\"foo\":\"bar\"}", "{\"access_token\":\"\"}", "{\"access_token\":42}", "[]"] {
			let err = StoredToken::from_json(raw)
				.expect_err("Payload without a usable access_token should be rejected.");

			assert!(matches!(err, TokenFormatError::MissingAccessToken), "{raw}");
		}
	}

	#[test]
	fn distinguishes_unparseable_payloads() {
		let err = StoredToken::from_json("access_token=abc")
			.expect_err("Non-JSON payload should be rejected.");

		assert!(matches!(err, TokenFormatError::Malformed { .. }));
	}

	#[test]
	fn ignores_non_positive_expiry() {
		let token = StoredToken::from_json("{\"access_token\":\"t\",\"expires_in\":0}")
			.expect("Payload should parse.");

		assert_eq!(token.expires_in(), None);
	}

	#[test]
	fn caps_oversized_expiry() {
		let token = StoredToken::from_json(
			"{\"access_token\":\"t\",\"expires_in\":9223372036854775807}",
		)
		.expect("Payload should parse.");

		assert_eq!(token.expires_in(), Some(Duration::seconds(MAX_DURATION_SECS as i64)));
		assert!(token.raw().contains("9223372036854775807"));
	}

	#[test]
	fn debug_output_redacts_token() {
		let token = StoredToken::from_json("{\"access_token\":\"very-secret-token\"}")
			.expect("Payload should parse.");

		assert!(!format!("{token:?}").contains("very-secret-token"));
	}
}
