//! Full-sweep session refresh across every app variant.
//!
//! The broker exposes [`Broker::refresh_all`] so schedulers can renew every
//! variant's session token in one pass. Variants are processed in declaration
//! order, each failure stays isolated to its own variant, and the outcome of
//! the whole sweep comes back as a [`RefreshReport`] rather than an error.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::AppVariant,
};

impl Broker {
	/// Logs in and persists a fresh session token for every app variant.
	///
	/// One variant failing never aborts the sweep; its error is captured in the
	/// report and the remaining variants still run. A token is only persisted
	/// for variants whose login succeeded.
	pub async fn refresh_all(&self) -> RefreshReport {
		const KIND: FlowKind = FlowKind::RefreshAll;

		let span = FlowSpan::new(KIND, "refresh_all");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let report = span
			.instrument(async move {
				let mut outcomes = Vec::with_capacity(AppVariant::ALL.len());

				for variant in AppVariant::ALL {
					let outcome = self.refresh_one(variant).await;

					if let Err(err) = &outcome {
						obs::warn_event(
							format!("session refresh failed for the `{variant}` variant"),
							err,
						);
					}

					outcomes.push((variant, outcome));
				}

				RefreshReport { outcomes }
			})
			.await;

		if report.fully_refreshed() {
			self.refresh_metrics.record_success();

			obs::record_flow_outcome(KIND, FlowOutcome::Success);
		} else {
			self.refresh_metrics.record_failure();

			obs::record_flow_outcome(KIND, FlowOutcome::Failure);
		}

		report
	}

	async fn refresh_one(&self, variant: AppVariant) -> Result<()> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "refresh_one");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.login.login(variant).await?;

				self.store.save(variant, token).await?;

				Ok(())
			})
			.await;

		match &result {
			Ok(()) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

/// Per-variant outcomes collected by a single refresh sweep.
#[derive(Debug)]
pub struct RefreshReport {
	outcomes: Vec<(AppVariant, Result<()>)>,
}
impl RefreshReport {
	/// Returns `true` when the given variant refreshed and persisted successfully.
	pub fn succeeded(&self, variant: AppVariant) -> bool {
		self.outcomes.iter().any(|(v, outcome)| *v == variant && outcome.is_ok())
	}

	/// Returns `true` when every variant in the sweep succeeded.
	pub fn fully_refreshed(&self) -> bool {
		self.outcomes.iter().all(|(_, outcome)| outcome.is_ok())
	}

	/// Returns the failure recorded for the given variant, if any.
	pub fn failure(&self, variant: AppVariant) -> Option<&Error> {
		self.outcomes
			.iter()
			.find(|(v, _)| *v == variant)
			.and_then(|(_, outcome)| outcome.as_ref().err())
	}

	/// Consumes the report and extracts the failure recorded for the given variant.
	pub fn into_failure(self, variant: AppVariant) -> Option<Error> {
		self.outcomes
			.into_iter()
			.find(|(v, _)| *v == variant)
			.and_then(|(_, outcome)| outcome.err())
	}

	/// Collapses the report into a single result, surfacing the first failure.
	pub fn into_result(self) -> Result<()> {
		self.outcomes.into_iter().try_for_each(|(_, outcome)| outcome)
	}
}
