//! Thread-safe in-memory [`TokenStore`] implementation for tests and embedding.

// self
use crate::{
	_prelude::*,
	auth::StoredToken,
	store::{StoreFuture, TokenStore},
};

/// Keeps the cached token in-process; cloning shares the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<StoredToken>>>);
impl MemoryStore {
	/// Creates a store pre-seeded with `token`.
	pub fn with_token(token: StoredToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Returns the cached token without going through the async contract.
	pub fn snapshot(&self) -> Option<StoredToken> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn read(&self) -> StoreFuture<'_, Option<StoredToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn write(&self, token: StoredToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}

	fn location(&self) -> String {
		"memory".into()
	}
}
