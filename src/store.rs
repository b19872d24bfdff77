//! Storage contracts and the tiered store implementations behind session tokens.
//!
//! Three tiers exist: the durable REST key-value backend, read-only environment
//! overrides, and process-local memory. [`select_store`] probes the durable tier once
//! at initialization and fixes the choice for the process lifetime; an unavailable
//! backend degrades to [`FallbackStore`] instead of failing startup.

pub mod env;
pub mod fallback;
pub mod kv;
pub mod memory;

pub use env::EnvStore;
pub use fallback::FallbackStore;
pub use kv::RestKvStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	error::ConfigError,
	obs,
	session::{AppVariant, SessionToken},
};

/// Persistence contract future for session token stores.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by session token stores.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the token cached for the variant.
	fn save(&self, variant: AppVariant, token: SessionToken) -> StoreFuture<'_, ()>;

	/// Fetches the token cached for the variant; absence is `Ok(None)`, never an error.
	fn fetch(&self, variant: AppVariant) -> StoreFuture<'_, Option<SessionToken>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Store tier does not accept writes.
	#[error("Store tier is read-only.")]
	ReadOnly,
}

/// Selects the store tier serving the broker for the process lifetime.
///
/// The durable backend wins when it is configured and answers a `PING` probe.
/// Everything else degrades to environment overrides backed by process memory, which
/// keeps single-invocation deployments working at the cost of durability.
pub async fn select_store(config: &BrokerConfig) -> Result<Arc<dyn TokenStore>, ConfigError> {
	if let Some(settings) = &config.kv {
		let store = RestKvStore::new(config.http_client()?, settings.clone());

		match store.ping().await {
			Ok(()) => {
				obs::info_event("durable key-value store selected");

				return Ok(Arc::new(store));
			},
			Err(err) => obs::warn_event(
				"durable key-value store unavailable; falling back to process-local storage",
				&err,
			),
		}
	}

	Ok(Arc::new(FallbackStore::from_env()))
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = StoreError::Backend { message: "backend unreachable".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));
		assert!(broker_error.to_string().contains("backend unreachable"));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload = serde_json::to_string(&StoreError::ReadOnly)
			.expect("StoreError should serialize to JSON.");

		assert_eq!(payload, "\"ReadOnly\"");

		let round_trip: StoreError = serde_json::from_str(&payload)
			.expect("Serialized store error should deserialize from JSON.");

		assert_eq!(round_trip, StoreError::ReadOnly);
	}
}
