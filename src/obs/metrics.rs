// self
use crate::{
	obs::{FlowKind, FlowOutcome},
	validator::InvalidReason,
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"api_token_broker_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records that a cached token was discarded and a refresh is about to run.
pub fn record_refresh(reason: &InvalidReason) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("api_token_broker_refresh_total", "reason" => reason.as_str()).increment(1);
	}

	#[cfg(feature = "tracing")]
	{
		tracing::info!(reason = reason.as_str(), detail = %reason, "Refreshing cached token.");
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = reason;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_features() {
		record_flow_outcome(FlowKind::OAuth2, FlowOutcome::Failure);
		record_refresh(&InvalidReason::Rejected { status: 401 });
	}
}
