//! Token read path with the process-lifetime auto-login fallback.
//!
//! [`Broker::token`] serves a session token for one app variant from the
//! selected store. On the first miss of the process it performs a single
//! automatic [`Broker::refresh_all`] sweep and re-reads the store once. The
//! guard is never re-armed; later misses report the token as unavailable and
//! leave recovery to the scheduled refresh trigger.

// self
use crate::{
	_prelude::*,
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::{AppVariant, SessionToken},
};

impl Broker {
	/// Returns the stored session token for the given variant.
	///
	/// On a store miss, the first call of the process claims the auto-login
	/// guard and refreshes every variant before retrying the read. Once the
	/// guard is spent, a miss resolves to [`Error::NotAvailable`] immediately,
	/// carrying the variant's refresh failure as its source when one was
	/// recorded during the automatic sweep.
	pub async fn token(&self, variant: AppVariant) -> Result<SessionToken> {
		const KIND: FlowKind = FlowKind::TokenRead;

		let span = FlowSpan::new(KIND, "token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if let Some(token) = self.store.fetch(variant).await? {
					return Ok(token);
				}
				if !self.claim_auto_login() {
					return Err(Error::NotAvailable { variant, source: None });
				}

				let report = self.refresh_all().await;

				match self.store.fetch(variant).await? {
					Some(token) => Ok(token),
					None => Err(Error::NotAvailable {
						variant,
						source: report.into_failure(variant).map(Box::new),
					}),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
