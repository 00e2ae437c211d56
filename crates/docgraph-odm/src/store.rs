//! Document store capability
//!
//! [`DocumentStore`] is the seam to the storage engine: identifier lookups and
//! single-document writes on raw [`Structure`]s. The typed helpers [`lookup`]
//! and [`persist`] sit on top of it and speak in terms of [`Document`]s.

mod memory;

pub use memory::{InMemoryStore, StoreStatistics};

use crate::document::Document;
use crate::error::{OdmError, OdmResult, StoreError, StoreResult};
use crate::value::{DocumentId, STORAGE_ID_KEY, Structure};

/// Trait for document-oriented stores
///
/// Calls are synchronous and treated as atomic. Implementations provide their
/// own consistency guarantees for single-document reads and writes.
///
/// # Example
///
/// ```
/// use docgraph_odm::{DocumentStore, InMemoryStore};
/// use docgraph_odm::value::Structure;
///
/// let store = InMemoryStore::new();
/// let id = store.insert("people", Structure::new()).unwrap();
/// assert!(store.find_by_id("people", &id).unwrap().is_some());
/// ```
pub trait DocumentStore {
	/// Finds the document with the given identifier
	///
	/// Returns `Ok(None)` when no such document exists.
	fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Structure>>;

	/// Inserts a new document and returns its identifier
	///
	/// The store assigns a fresh identifier unless the body already carries one
	/// under the storage identifier key.
	fn insert(&self, collection: &str, document: Structure) -> StoreResult<DocumentId>;

	/// Replaces the document with the given identifier, inserting it if missing
	fn replace(&self, collection: &str, id: &DocumentId, document: Structure) -> StoreResult<()>;
}

/// Load a document of type `D` by identifier
///
/// A missing document is reported as [`OdmError::NotFound`].
pub fn lookup<D: Document>(store: &dyn DocumentStore, id: &DocumentId) -> OdmResult<D> {
	tracing::trace!(collection = D::COLLECTION_NAME, %id, "Looking up referenced document");
	let structure = store
		.find_by_id(D::COLLECTION_NAME, id)?
		.ok_or_else(|| OdmError::NotFound {
			collection: D::COLLECTION_NAME,
			id: id.clone(),
		})?;
	D::from_structure(structure, false, store)
}

/// Save a document, assigning an identifier on first insert
///
/// The document is validated first and written in its storage rendering.
/// Exactly one store write is issued.
pub fn persist<D: Document>(store: &dyn DocumentStore, document: &mut D) -> OdmResult<()> {
	document.validate()?;
	let mut body = document.to_storage(store)?;
	let persistence = |source: StoreError| OdmError::Persistence {
		collection: D::COLLECTION_NAME,
		source,
	};

	match document.id().cloned() {
		Some(id) => {
			tracing::trace!(collection = D::COLLECTION_NAME, %id, "Replacing document");
			store
				.replace(D::COLLECTION_NAME, &id, body)
				.map_err(persistence)?;
		}
		None => {
			body.remove(STORAGE_ID_KEY);
			let id = store
				.insert(D::COLLECTION_NAME, body)
				.map_err(persistence)?;
			tracing::trace!(collection = D::COLLECTION_NAME, %id, "Inserted document");
			document.set_id(id);
		}
	}
	Ok(())
}
