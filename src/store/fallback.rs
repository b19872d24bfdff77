//! Composite [`TokenStore`] layering environment overrides over process memory.

// self
use crate::{
	_prelude::*,
	session::{AppVariant, SessionToken},
	store::{EnvStore, MemoryStore, StoreFuture, TokenStore},
};

/// Degraded-mode tier used when no durable backend is available.
///
/// Reads consult operator overrides first and fall through to process memory; writes
/// land in memory because overrides are read-only.
#[derive(Clone, Debug, Default)]
pub struct FallbackStore {
	overrides: EnvStore,
	memory: MemoryStore,
}
impl FallbackStore {
	/// Builds the tier from the process environment.
	pub fn from_env() -> Self {
		Self::with_overrides(EnvStore::from_env())
	}

	/// Builds the tier over explicit overrides; memory starts empty.
	pub fn with_overrides(overrides: EnvStore) -> Self {
		Self { overrides, memory: MemoryStore::default() }
	}
}
impl TokenStore for FallbackStore {
	fn save(&self, variant: AppVariant, token: SessionToken) -> StoreFuture<'_, ()> {
		self.memory.save(variant, token)
	}

	fn fetch(&self, variant: AppVariant) -> StoreFuture<'_, Option<SessionToken>> {
		Box::pin(async move {
			if let Some(token) = self.overrides.fetch(variant).await? {
				return Ok(Some(token));
			}

			self.memory.fetch(variant).await
		})
	}
}
