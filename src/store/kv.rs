//! Durable [`TokenStore`] speaking the Upstash-style Redis REST protocol.
//!
//! Every operation is one `POST` of a single command array to the service base URL
//! with bearer authentication: `["SET", key, value, "EX", "7200"]`, `["GET", key]`, or
//! `["PING"]`. Token values travel as serialized JSON strings, matching what hosted
//! key-value offerings built on this protocol store natively.

// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	config::KvSettings,
	session::{AppVariant, SessionToken},
	store::{StoreError, StoreFuture, TokenStore},
};

/// Advisory seconds-to-live stamped on durable writes.
///
/// Matches the upstream session refresh cadence; expiry is a hygiene measure, not a
/// validity check, and nothing in this crate ever inspects it.
const TOKEN_TTL_SECS: u64 = 7200;

/// Durable store over a Redis-compatible REST service.
#[derive(Clone, Debug)]
pub struct RestKvStore {
	client: ReqwestClient,
	settings: KvSettings,
}
impl RestKvStore {
	/// Creates a store over the provided client and connection settings.
	pub fn new(client: ReqwestClient, settings: KvSettings) -> Self {
		Self { client, settings }
	}

	/// Issues a `PING` probe; store selection uses this to validate connectivity once.
	pub async fn ping(&self) -> Result<(), StoreError> {
		let reply = self.command(&["PING"]).await?;

		match reply.as_str() {
			Some("PONG") => Ok(()),
			_ => Err(StoreError::Backend { message: format!("unexpected PING reply: {reply}") }),
		}
	}

	async fn command(&self, parts: &[&str]) -> Result<serde_json::Value, StoreError> {
		let body = serde_json::to_vec(parts)
			.map_err(|err| StoreError::Serialization { message: err.to_string() })?;
		let response = self
			.client
			.post(self.settings.url().clone())
			.bearer_auth(self.settings.bearer_token())
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(backend_error)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(backend_error)?;

		if !status.is_success() {
			return Err(StoreError::Backend {
				message: format!("command rejected with HTTP {}", status.as_u16()),
			});
		}

		let reply: CommandReply = serde_json::from_slice(&bytes)
			.map_err(|err| StoreError::Serialization { message: err.to_string() })?;

		match reply {
			CommandReply::Result { result } => Ok(result),
			CommandReply::Error { error } => Err(StoreError::Backend { message: error }),
		}
	}
}
impl TokenStore for RestKvStore {
	fn save(&self, variant: AppVariant, token: SessionToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let value = serde_json::to_string(&token)
				.map_err(|err| StoreError::Serialization { message: err.to_string() })?;
			let ttl = TOKEN_TTL_SECS.to_string();
			let reply =
				self.command(&["SET", variant.storage_key(), &value, "EX", &ttl]).await?;

			match reply.as_str() {
				Some("OK") => Ok(()),
				_ =>
					Err(StoreError::Backend { message: format!("unexpected SET reply: {reply}") }),
			}
		})
	}

	fn fetch(&self, variant: AppVariant) -> StoreFuture<'_, Option<SessionToken>> {
		Box::pin(async move {
			let reply = self.command(&["GET", variant.storage_key()]).await?;

			match reply {
				serde_json::Value::Null => Ok(None),
				serde_json::Value::String(raw) => {
					let token = serde_json::from_str(&raw).map_err(|err| {
						StoreError::Serialization { message: err.to_string() }
					})?;

					Ok(Some(token))
				},
				other => Err(StoreError::Backend {
					message: format!("unexpected GET reply: {other}"),
				}),
			}
		})
	}
}

/// Single-command reply shape: `{"result": ...}` on success, `{"error": ...}` otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum CommandReply {
	Result {
		result: serde_json::Value,
	},
	Error {
		error: String,
	},
}

fn backend_error(err: reqwest::Error) -> StoreError {
	StoreError::Backend { message: err.to_string() }
}
