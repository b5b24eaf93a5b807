//! Token cache contract and built-in store implementations.
//!
//! A store holds exactly one token payload. Writes replace the previous payload as a whole;
//! a failed write must leave the prior payload readable.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{StoredToken, TokenFormatError},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for the cached OAuth token.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the cached token, or `None` if nothing has been stored yet.
	fn read(&self) -> StoreFuture<'_, Option<StoredToken>>;

	/// Atomically replaces the cached token.
	fn write(&self, token: StoredToken) -> StoreFuture<'_, ()>;

	/// Human-readable location used in error messages.
	fn location(&self) -> String;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Debug, ThisError)]
pub enum StoreError {
	/// Backend-level failure (I/O, permissions).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The persisted payload cannot yield a token.
	#[error("Stored token is unusable: {0}")]
	Format(#[from] TokenFormatError),
}
