//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, StorageKey, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<StorageKey, String>>>;

/// Thread-safe storage backend that keeps entries in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns a sorted copy of every entry, mainly for assertions.
	pub fn snapshot(&self) -> BTreeMap<String, String> {
		self.0.read().iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
	}

	/// Returns `true` if no entries are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn get_now(map: StoreMap, key: StorageKey) -> Option<String> {
		map.read().get(&key).cloned()
	}

	fn set_now(map: StoreMap, key: StorageKey, value: String) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}

	fn remove_now(map: StoreMap, key: StorageKey) -> Result<(), StoreError> {
		map.write().remove(&key);

		Ok(())
	}
}
impl SessionStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a StorageKey) -> StoreFuture<'a, Option<String>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn set<'a>(&'a self, key: &'a StorageKey, value: String) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::set_now(map, key, value) })
	}

	fn remove<'a>(&'a self, key: &'a StorageKey) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::remove_now(map, key) })
	}
}
