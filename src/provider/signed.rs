//! Signed-token strategy: a fresh HS256 token per call, never cached.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	jwt,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, FlowStage},
	provider::TokenProvider,
};

impl TokenProvider {
	/// Mints a signed token for the configured credentials and lifetime.
	pub fn signed_token(&self) -> Result<Secret> {
		const KIND: FlowKind = FlowKind::SignedToken;

		let span = FlowSpan::new(KIND, FlowStage::Sign);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.in_scope(|| {
				jwt::sign(&self.credentials, self.config.token_lifetime, OffsetDateTime::now_utc())
			})
			.map_err(Error::from);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
