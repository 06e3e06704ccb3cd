//! Key-value persistence contract for session credentials plus built-in stores.
//!
//! A [`SessionStore`] outlives the in-memory session: the access token, refresh token, and
//! serialized user record each live under their own [`StorageKey`], and every mutating session
//! operation writes through before returning.

pub mod file;
pub mod key;
pub mod memory;

pub use file::FileStore;
pub use key::*;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by session stores.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a StorageKey) -> StoreFuture<'a, Option<String>>;

	/// Writes (or overwrites) the value stored under `key`.
	fn set<'a>(&'a self, key: &'a StorageKey, value: String) -> StoreFuture<'a, ()>;

	/// Deletes `key`; deleting a missing key is not an error.
	fn remove<'a>(&'a self, key: &'a StorageKey) -> StoreFuture<'a, ()>;

	/// Writes several entries; backends may override this to persist them in one step.
	fn set_many<'a>(&'a self, entries: Vec<(StorageKey, String)>) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			for (key, value) in entries {
				self.set(&key, value).await?;
			}

			Ok(())
		})
	}

	/// Deletes several keys; backends may override this to persist once.
	fn remove_many<'a>(&'a self, keys: &'a [StorageKey]) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			for key in keys {
				self.remove(key).await?;
			}

			Ok(())
		})
	}
}

/// Error type produced by [`SessionStore`] implementations.
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
}
