//! Opaque session token model returned by the upstream session service.

// self
use crate::{_prelude::*, session::ticket::SessionTicket};

/// Opaque session payload issued by the upstream session service.
///
/// Only the ticket is interpreted by this crate. Every other response field is
/// retained verbatim in [`SessionToken::details`] so a persisted token serializes back
/// to JSON equivalent to what upstream returned, regardless of fields this crate has
/// never heard of.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
	/// Session ticket used as the authorization credential for upstream calls.
	pub ticket: SessionTicket,
	/// Remaining upstream response fields, preserved without interpretation.
	#[serde(flatten)]
	pub details: serde_json::Map<String, serde_json::Value>,
}
impl SessionToken {
	/// Builds a token from a bare ticket with no extra upstream fields.
	pub fn from_ticket(ticket: impl Into<String>) -> Self {
		Self { ticket: SessionTicket::new(ticket), details: serde_json::Map::new() }
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionToken")
			.field("ticket", &"<redacted>")
			.field("details", &self.details.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn serde_round_trips_unknown_fields() {
		let payload = "{\"ticket\":\"ticket-abc\",\"sessionId\":\"sid-1\",\"expiration\":\"2026-01-01T00:00:00Z\"}";
		let token: SessionToken =
			serde_json::from_str(payload).expect("Upstream payload should deserialize.");

		assert_eq!(token.ticket.expose(), "ticket-abc");
		assert_eq!(token.details.len(), 2);

		let round_trip =
			serde_json::to_value(&token).expect("Token should serialize back to JSON.");
		let original: serde_json::Value =
			serde_json::from_str(payload).expect("Fixture payload should be valid JSON.");

		assert_eq!(round_trip, original, "Serialization must preserve every upstream field.");
	}

	#[test]
	fn missing_ticket_is_rejected() {
		let outcome = serde_json::from_str::<SessionToken>("{\"sessionId\":\"sid-1\"}");

		assert!(outcome.is_err(), "A payload without a ticket is not a usable token.");
	}

	#[test]
	fn debug_redacts_the_ticket() {
		let token = SessionToken::from_ticket("ticket-abc");
		let rendered = format!("{token:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("ticket-abc"));
	}
}
