//! Read-only [`TokenStore`] tier backed by environment overrides.

// self
use crate::{
	_prelude::*,
	obs,
	session::{AppVariant, SessionToken},
	store::{StoreError, StoreFuture, TokenStore},
};

/// Read-only tier surfacing operator-provided token overrides.
///
/// Raw values are snapshotted from `UBI_TOKEN_V2`/`UBI_TOKEN_V3` at construction and
/// parsed on every read, so a malformed override is reported and treated as absent
/// instead of failing the read. Writes are rejected; overrides belong to the operator.
#[derive(Clone, Default)]
pub struct EnvStore(HashMap<AppVariant, String>);
impl EnvStore {
	/// Snapshots override values from the process environment.
	pub fn from_env() -> Self {
		Self::with_values(AppVariant::ALL.into_iter().filter_map(|variant| {
			std::env::var(variant.env_key()).ok().map(|raw| (variant, raw))
		}))
	}

	/// Builds the tier over explicit raw override values.
	pub fn with_values(values: impl IntoIterator<Item = (AppVariant, String)>) -> Self {
		Self(values.into_iter().collect())
	}

	fn parse(variant: AppVariant, raw: &str) -> Option<SessionToken> {
		match serde_json::from_str(raw) {
			Ok(token) => Some(token),
			Err(err) => {
				obs::warn_event(
					format!("`{}` override ignored; value is not a valid token", variant.env_key()),
					&err,
				);

				None
			},
		}
	}
}
impl Debug for EnvStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EnvStore").field("overrides", &self.0.keys().collect::<Vec<_>>()).finish()
	}
}
impl TokenStore for EnvStore {
	fn save(&self, _variant: AppVariant, _token: SessionToken) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::ReadOnly) })
	}

	fn fetch(&self, variant: AppVariant) -> StoreFuture<'_, Option<SessionToken>> {
		let parsed = self.0.get(&variant).and_then(|raw| Self::parse(variant, raw));

		Box::pin(async move { Ok(parsed) })
	}
}
