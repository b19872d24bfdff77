//! Scheduled refresh entry point for cron-style deployments.
//!
//! [`run_scheduled_refresh`] wraps [`Broker::refresh_all`] in the bearer-secret
//! check and the fixed status/body contract expected by the cron caller, so
//! HTTP adapters only translate a [`TriggerOutcome`] into their own response
//! type.

// crates.io
use serde_json::{Value, json};
// self
use crate::{_prelude::*, flows::Broker, obs};

/// Runs a full refresh sweep on behalf of a scheduler.
///
/// `authorization` is the raw `Authorization` header value presented by the
/// caller, if any. An unauthorized caller never reaches the upstream service.
pub async fn run_scheduled_refresh(
	broker: &Broker,
	auth: &TriggerAuth,
	authorization: Option<&str>,
) -> TriggerOutcome {
	if !auth.permits(authorization) {
		return TriggerOutcome::Unauthorized;
	}

	match broker.refresh_all().await.into_result() {
		Ok(()) => TriggerOutcome::Refreshed,
		Err(err) => {
			obs::warn_event("scheduled refresh failed", &err);

			TriggerOutcome::Failed
		},
	}
}

/// Bearer-secret gate for the scheduled refresh entry point.
#[derive(Clone, Default)]
pub struct TriggerAuth {
	secret: Option<String>,
}
impl TriggerAuth {
	/// Creates a gate around an optional shared secret.
	///
	/// Without a secret the gate permits every caller, which is only meant for
	/// local development.
	pub fn new(secret: Option<String>) -> Self {
		Self { secret }
	}

	/// Checks a raw `Authorization` header value against the shared secret.
	pub fn permits(&self, authorization: Option<&str>) -> bool {
		let Some(secret) = &self.secret else {
			return true;
		};

		authorization
			.and_then(|value| value.strip_prefix("Bearer "))
			.is_some_and(|presented| presented == secret)
	}
}
impl Debug for TriggerAuth {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TriggerAuth").field("secret_set", &self.secret.is_some()).finish()
	}
}

/// Result of a scheduled refresh, mapped onto the fixed HTTP contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
	/// Every variant refreshed; the caller should answer HTTP 200.
	Refreshed,
	/// The bearer secret was missing or wrong; the caller should answer HTTP 401.
	Unauthorized,
	/// At least one variant failed to refresh; the caller should answer HTTP 500.
	Failed,
}
impl TriggerOutcome {
	/// Returns the HTTP status code the outcome maps to.
	pub const fn status_code(&self) -> u16 {
		match self {
			Self::Refreshed => 200,
			Self::Unauthorized => 401,
			Self::Failed => 500,
		}
	}

	/// Returns the JSON body the outcome maps to.
	///
	/// Bodies are fixed strings; upstream error detail stays in the logs and is
	/// never echoed back to the scheduler.
	pub fn body(&self) -> Value {
		match self {
			Self::Refreshed => json!({ "success": true, "message": "Auth tokens refreshed" }),
			Self::Unauthorized => json!({ "error": "Unauthorized" }),
			Self::Failed => json!({ "error": "Failed to refresh auth tokens" }),
		}
	}
}
