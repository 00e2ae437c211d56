//! Core `Document` trait definition.

use serde_json::Value;

use crate::context::ConversionContext;
use crate::error::{OdmError, OdmResult};
use crate::store::DocumentStore;
use crate::value::{DocumentId, Structure, json_kind, normalize_identifier_key};

/// A document type stored in a collection of a document database.
///
/// Implementors convert their own fields to and from a [`Structure`]. Reference
/// fields inside `to_structure` receive the same [`ConversionContext`], which is
/// how depth travels down a nested rendering.
///
/// ## Example
///
/// ```
/// use docgraph_odm::{ConversionContext, Document, DocumentId, DocumentStore, OdmResult};
/// use docgraph_odm::value::{Structure, STORAGE_ID_KEY, take_identifier};
/// use serde_json::Value;
///
/// struct Person {
///     id: Option<DocumentId>,
///     name: String,
/// }
///
/// impl Document for Person {
///     const COLLECTION_NAME: &'static str = "people";
///
///     fn id(&self) -> Option<&DocumentId> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: DocumentId) {
///         self.id = Some(id);
///     }
///
///     fn to_structure(&self, _ctx: &ConversionContext<'_>) -> OdmResult<Structure> {
///         let mut out = Structure::new();
///         if let Some(id) = &self.id {
///             out.insert(STORAGE_ID_KEY.to_string(), id.to_json());
///         }
///         out.insert("name".to_string(), Value::String(self.name.clone()));
///         Ok(out)
///     }
///
///     fn from_structure(
///         mut structure: Structure,
///         _created: bool,
///         _store: &dyn DocumentStore,
///     ) -> OdmResult<Self> {
///         let id = take_identifier(&mut structure, Self::COLLECTION_NAME)?;
///         let name = structure
///             .get("name")
///             .and_then(Value::as_str)
///             .unwrap_or_default()
///             .to_string();
///         Ok(Person { id, name })
///     }
/// }
/// ```
pub trait Document: Sized {
	/// Collection the documents of this type are stored in.
	const COLLECTION_NAME: &'static str;

	/// Whether `to_structure` honors a good-json context.
	///
	/// Types that return `false` are expanded with a plain context and keep
	/// their storage identifier key.
	const SUPPORTS_GOOD_JSON: bool = true;

	/// Get the document's ID.
	///
	/// Returns `None` if the document hasn't been persisted yet.
	fn id(&self) -> Option<&DocumentId>;

	/// Set the document's ID.
	///
	/// This is typically called after insertion.
	fn set_id(&mut self, id: DocumentId);

	/// Validate this document before it is persisted.
	fn validate(&self) -> OdmResult<()> {
		Ok(())
	}

	/// Convert the document's own fields into a nested structure.
	///
	/// The identifier, if any, goes under [`STORAGE_ID_KEY`](crate::value::STORAGE_ID_KEY).
	fn to_structure(&self, ctx: &ConversionContext<'_>) -> OdmResult<Structure>;

	/// Build an in-memory document from a nested structure.
	///
	/// `created` is true when the structure carried no identifier, i.e. the
	/// document has never been persisted.
	fn from_structure(
		structure: Structure,
		created: bool,
		store: &dyn DocumentStore,
	) -> OdmResult<Self>;

	/// Render the document the way it is written to the store.
	fn to_storage(&self, store: &dyn DocumentStore) -> OdmResult<Structure> {
		self.to_structure(&ConversionContext::storage(store))
	}

	/// Render the document as good-json, expanding follow-reference fields.
	fn to_good_json(&self, store: &dyn DocumentStore) -> OdmResult<Value> {
		if !Self::SUPPORTS_GOOD_JSON {
			return Ok(Value::Object(self.to_storage(store)?));
		}
		let mut structure = self.to_structure(&ConversionContext::good_json(store))?;
		normalize_identifier_key(&mut structure);
		Ok(Value::Object(structure))
	}

	/// Build a document from a good-json value.
	fn from_good_json(value: Value, store: &dyn DocumentStore) -> OdmResult<Self> {
		match value {
			Value::Object(structure) => {
				let created = is_created(&structure);
				Self::from_structure(structure, created, store)
			}
			other => Err(OdmError::construction(
				Self::COLLECTION_NAME,
				format!("expected object, found {}", json_kind(&other)),
			)),
		}
	}
}

/// Whether a nested structure describes a document that was never persisted.
pub(crate) fn is_created(structure: &Structure) -> bool {
	!structure.contains_key(crate::value::PUBLIC_ID_KEY)
}
