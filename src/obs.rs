//! Optional observability helpers for token flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `api_token_broker.flow` with the `flow`
//!   (strategy), `stage` (updated as the call progresses), and `reason` (why a cached token was
//!   discarded) fields, plus an `info` event whenever a cached token is discarded.
//! - Enable `metrics` to increment the `api_token_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `api_token_broker_refresh_total` counter labeled by invalidation `reason`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Token flows observed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Per-request signed token.
	SignedToken,
	/// Cached OAuth token (validate, refresh, read).
	OAuth2,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::SignedToken => "signed_token",
			FlowKind::OAuth2 => "oauth2",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Steps a provider call moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Minting a signed token.
	Sign,
	/// Checking the cached token.
	Validate,
	/// Exchanging credentials for a new token and persisting it.
	Refresh,
	/// Reading the bearer back from the store.
	Read,
}
impl FlowStage {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Sign => "sign",
			FlowStage::Validate => "validate",
			FlowStage::Refresh => "refresh",
			FlowStage::Read => "read",
		}
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a provider helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
