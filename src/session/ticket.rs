//! Secure session ticket wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted session ticket wrapper keeping the upstream credential out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTicket(String);
impl SessionTicket {
	/// Wraps a new ticket string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner ticket value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SessionTicket {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionTicket").field(&"<redacted>").finish()
	}
}
impl Display for SessionTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn ticket_formatters_redact() {
		let ticket = SessionTicket::new("ew0-super-secret");

		assert_eq!(format!("{ticket:?}"), "SessionTicket(\"<redacted>\")");
		assert_eq!(format!("{ticket}"), "<redacted>");
	}

	#[test]
	fn ticket_serializes_as_plain_string() {
		let ticket = SessionTicket::new("ew0-super-secret");
		let payload =
			serde_json::to_string(&ticket).expect("Ticket should serialize to a JSON string.");

		assert_eq!(payload, "\"ew0-super-secret\"");
	}
}
