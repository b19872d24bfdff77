//! Thread-safe in-memory [`TokenStore`] tier.

// self
use crate::{
	_prelude::*,
	session::{AppVariant, SessionToken},
	store::{StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<AppVariant, SessionToken>>>;

/// Volatile tier that keeps tokens in-process.
///
/// Acceptable degradation for single-invocation deployments; every process starts
/// cold and loses its cache on exit.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl TokenStore for MemoryStore {
	fn save(&self, variant: AppVariant, token: SessionToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(variant, token);

			Ok(())
		})
	}

	fn fetch(&self, variant: AppVariant) -> StoreFuture<'_, Option<SessionToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&variant).cloned()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn save_then_fetch_round_trips() {
		let store = MemoryStore::default();
		let token = SessionToken::from_ticket("memory-ticket");

		store.save(AppVariant::V2, token.clone()).await.expect("Memory save should succeed.");

		let fetched = store
			.fetch(AppVariant::V2)
			.await
			.expect("Memory fetch should succeed.")
			.expect("Saved token should be present.");

		assert_eq!(fetched, token);
	}

	#[tokio::test]
	async fn variants_are_isolated() {
		let store = MemoryStore::default();

		store
			.save(AppVariant::V2, SessionToken::from_ticket("v2-ticket"))
			.await
			.expect("Memory save should succeed.");

		let missing =
			store.fetch(AppVariant::V3).await.expect("Memory fetch should succeed.");

		assert!(missing.is_none(), "A v2 token must never satisfy a v3 read.");
	}

	#[tokio::test]
	async fn save_replaces_the_previous_token() {
		let store = MemoryStore::default();

		store
			.save(AppVariant::V3, SessionToken::from_ticket("old-ticket"))
			.await
			.expect("First save should succeed.");
		store
			.save(AppVariant::V3, SessionToken::from_ticket("new-ticket"))
			.await
			.expect("Second save should succeed.");

		let fetched = store
			.fetch(AppVariant::V3)
			.await
			.expect("Memory fetch should succeed.")
			.expect("Replaced token should be present.");

		assert_eq!(fetched.ticket.expose(), "new-ticket");
	}
}
