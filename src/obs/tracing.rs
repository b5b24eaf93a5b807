// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowStage},
	validator::InvalidReason,
};

/// Future type returned by [`FlowSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future type returned by [`FlowSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span covering one provider call.
///
/// The `stage` field follows the call as it moves between reading, validating, and refreshing
/// the token; `reason` is filled in once a cached token is discarded.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind`, starting at `stage`.
	pub fn new(kind: FlowKind, stage: FlowStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"api_token_broker.flow",
				flow = kind.as_str(),
				stage = stage.as_str(),
				reason = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Moves the span to `stage` and logs the transition at `debug`.
	pub fn stage(&self, stage: FlowStage) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("stage", stage.as_str());

			tracing::debug!(parent: &self.span, stage = stage.as_str(), "Token flow stage entered.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;
		}
	}

	/// Tags the span with the reason the cached token was discarded.
	pub fn invalidated(&self, reason: &InvalidReason) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("reason", reason.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = reason;
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T, F>(&self, f: F) -> T
	where
		F: FnOnce() -> T,
	{
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signed_flow_runs_in_scope() {
		let span = FlowSpan::new(FlowKind::SignedToken, FlowStage::Sign);

		assert_eq!(span.in_scope(|| "minted"), "minted");
	}

	#[tokio::test]
	async fn account_flow_moves_through_stages() {
		let span = FlowSpan::new(FlowKind::OAuth2, FlowStage::Validate);
		let value = span
			.instrument(async {
				span.invalidated(&InvalidReason::Rejected { status: 401 });
				span.stage(FlowStage::Refresh);
				span.stage(FlowStage::Read);

				7
			})
			.await;

		assert_eq!(value, 7);
	}
}
