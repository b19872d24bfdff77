//! High-level broker facade coordinating logins, storage, and the auto-login guard.

pub mod refresh;
pub mod token;

pub use refresh::*;

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	error::ConfigError,
	login::{LoginClient, SessionLogin},
	store::{self, TokenStore},
};

/// Coordinates session logins and tiered token storage for every app variant.
///
/// The broker owns the process-lifetime auto-login guard, so exactly one instance
/// should exist per process; share it behind an [`Arc`]. Creating a second broker
/// creates a second guard, which re-arms the one-shot auto-login.
pub struct Broker {
	/// Token store tier selected at initialization.
	pub store: Arc<dyn TokenStore>,
	/// Login implementation used for upstream credential exchanges.
	pub login: Arc<dyn SessionLogin>,
	/// Shared metrics recorder for refresh sweep outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	auto_login: AtomicBool,
}
impl Broker {
	/// Creates a broker from configuration, probing the durable store once.
	pub async fn new(config: &BrokerConfig) -> Result<Self, ConfigError> {
		let store = store::select_store(config).await?;
		let login = Arc::new(LoginClient::new(config)?);

		Ok(Self::with_parts(store, login))
	}

	/// Creates a broker over explicit store and login implementations.
	pub fn with_parts(store: Arc<dyn TokenStore>, login: Arc<dyn SessionLogin>) -> Self {
		Self {
			store,
			login,
			refresh_metrics: Default::default(),
			auto_login: AtomicBool::new(false),
		}
	}

	/// Returns `true` once the process-lifetime auto-login has been spent.
	///
	/// The flag never resets; recovery from a failed auto-login belongs to the
	/// scheduled refresh trigger, not to later reads.
	pub fn auto_login_spent(&self) -> bool {
		self.auto_login.load(Ordering::SeqCst)
	}

	/// Attempts to claim the one-shot auto-login; only the first caller ever wins.
	pub(crate) fn claim_auto_login(&self) -> bool {
		self.auto_login.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker").field("auto_login_spent", &self.auto_login_spent()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{login::LoginFuture, session::AppVariant, store::MemoryStore};

	struct NeverLogin;
	impl SessionLogin for NeverLogin {
		fn login(&self, _variant: AppVariant) -> LoginFuture<'_> {
			Box::pin(async { panic!("The login client must not be reached by these tests.") })
		}
	}

	#[test]
	fn auto_login_claim_is_one_shot() {
		let broker =
			Broker::with_parts(Arc::new(MemoryStore::default()), Arc::new(NeverLogin));

		assert!(!broker.auto_login_spent());
		assert!(broker.claim_auto_login(), "The first claim should win.");
		assert!(!broker.claim_auto_login(), "Every later claim must lose.");
		assert!(broker.auto_login_spent());
	}
}
