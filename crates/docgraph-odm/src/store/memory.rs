//! In-memory document store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::value::{DocumentId, STORAGE_ID_KEY, Structure};

/// Counters for store traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatistics {
	/// Number of `find_by_id` calls
	pub reads: u64,
	/// Number of `insert` and `replace` calls
	pub writes: u64,
}

/// In-memory document store backend
///
/// Collections are created on first write. Identifiers are UUID v4 strings.
#[derive(Debug, Default)]
pub struct InMemoryStore {
	collections: RwLock<HashMap<String, HashMap<DocumentId, Structure>>>,
	reads: AtomicU64,
	writes: AtomicU64,
}

impl InMemoryStore {
	/// Create an empty store
	///
	/// # Examples
	///
	/// ```
	/// use docgraph_odm::InMemoryStore;
	///
	/// let store = InMemoryStore::new();
	/// assert_eq!(store.len("people"), 0);
	/// assert_eq!(store.statistics().writes, 0);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of documents in a collection
	pub fn len(&self, collection: &str) -> usize {
		self.collections
			.read()
			.get(collection)
			.map(HashMap::len)
			.unwrap_or(0)
	}

	/// Whether a collection holds no documents
	pub fn is_empty(&self, collection: &str) -> bool {
		self.len(collection) == 0
	}

	/// Snapshot of the read/write counters
	pub fn statistics(&self) -> StoreStatistics {
		StoreStatistics {
			reads: self.reads.load(Ordering::Relaxed),
			writes: self.writes.load(Ordering::Relaxed),
		}
	}

	/// Reset the read/write counters
	pub fn reset_statistics(&self) {
		self.reads.store(0, Ordering::Relaxed);
		self.writes.store(0, Ordering::Relaxed);
	}

	/// Remove every document and reset the counters
	pub fn clear(&self) {
		self.collections.write().clear();
		self.reset_statistics();
	}
}

impl DocumentStore for InMemoryStore {
	fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Structure>> {
		self.reads.fetch_add(1, Ordering::Relaxed);
		let collections = self.collections.read();
		Ok(collections.get(collection).and_then(|docs| {
			docs.get(id).map(|body| {
				let mut body = body.clone();
				body.insert(STORAGE_ID_KEY.to_string(), id.to_json());
				body
			})
		}))
	}

	fn insert(&self, collection: &str, mut document: Structure) -> StoreResult<DocumentId> {
		self.writes.fetch_add(1, Ordering::Relaxed);
		let id = match document.remove(STORAGE_ID_KEY) {
			Some(serde_json::Value::String(id)) => DocumentId::from(id),
			Some(serde_json::Value::Null) | None => {
				DocumentId::from(uuid::Uuid::new_v4().to_string())
			}
			Some(other) => {
				return Err(StoreError::InvalidOperation(format!(
					"identifier must be a string, got {}",
					other
				)));
			}
		};

		let mut collections = self.collections.write();
		let docs = collections.entry(collection.to_string()).or_default();
		if docs.contains_key(&id) {
			return Err(StoreError::Execution(format!(
				"duplicate key '{}' in collection '{}'",
				id, collection
			)));
		}
		docs.insert(id.clone(), document);
		Ok(id)
	}

	fn replace(&self, collection: &str, id: &DocumentId, mut document: Structure) -> StoreResult<()> {
		self.writes.fetch_add(1, Ordering::Relaxed);
		document.remove(STORAGE_ID_KEY);
		self.collections
			.write()
			.entry(collection.to_string())
			.or_default()
			.insert(id.clone(), document);
		Ok(())
	}
}
