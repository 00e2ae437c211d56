//! Identifiers, nested structures and reference slot values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{OdmError, OdmResult};

/// Nested, JSON-compatible mapping produced and consumed by document conversion
pub type Structure = serde_json::Map<String, Value>;

/// Identifier key used in the storage rendering of a document
pub const STORAGE_ID_KEY: &str = "_id";

/// Identifier key used in the public (good-json) rendering of a document
pub const PUBLIC_ID_KEY: &str = "id";

/// Opaque document identifier
///
/// # Examples
///
/// ```
/// use docgraph_odm::DocumentId;
///
/// let id = DocumentId::from("x1");
/// assert_eq!(id.as_str(), "x1");
/// assert_eq!(id.to_string(), "x1");
/// assert_eq!(DocumentId::new(String::from("x1")), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
	/// Create an identifier from any string-like value
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Get the identifier as a string slice
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Render the identifier as a JSON value
	pub fn to_json(&self) -> Value {
		Value::String(self.0.clone())
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for DocumentId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Runtime value of a reference slot
///
/// A slot either holds a materialized document or just the identifier of one
/// that has not been loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue<D> {
	/// Identifier of a document that is not loaded
	Identifier(DocumentId),
	/// Fully materialized document
	Document(Box<D>),
}

impl<D> ReferenceValue<D> {
	/// Wrap a materialized document
	pub fn document(doc: D) -> Self {
		ReferenceValue::Document(Box::new(doc))
	}

	/// Get the loaded document, if any
	pub fn as_document(&self) -> Option<&D> {
		match self {
			ReferenceValue::Document(doc) => Some(doc.as_ref()),
			ReferenceValue::Identifier(_) => None,
		}
	}

	/// Consume the value and return the loaded document, if any
	pub fn into_document(self) -> Option<D> {
		match self {
			ReferenceValue::Document(doc) => Some(*doc),
			ReferenceValue::Identifier(_) => None,
		}
	}

	/// Whether the slot holds a materialized document
	pub fn is_loaded(&self) -> bool {
		matches!(self, ReferenceValue::Document(_))
	}
}

impl<D: crate::document::Document> ReferenceValue<D> {
	/// Identifier of the referenced document
	///
	/// Returns `None` for a materialized document that was never saved.
	pub fn id(&self) -> Option<&DocumentId> {
		match self {
			ReferenceValue::Identifier(id) => Some(id),
			ReferenceValue::Document(doc) => doc.id(),
		}
	}
}

impl<D> From<DocumentId> for ReferenceValue<D> {
	fn from(id: DocumentId) -> Self {
		ReferenceValue::Identifier(id)
	}
}

/// Rename the storage identifier key to the public one
///
/// Leaves the structure untouched when it has no storage identifier.
///
/// # Examples
///
/// ```
/// use docgraph_odm::value::{normalize_identifier_key, Structure};
/// use serde_json::json;
///
/// let mut structure: Structure = serde_json::from_value(json!({"_id": "x1", "name": "A"})).unwrap();
/// normalize_identifier_key(&mut structure);
/// assert_eq!(structure.get("id"), Some(&json!("x1")));
/// assert!(!structure.contains_key("_id"));
/// ```
pub fn normalize_identifier_key(structure: &mut Structure) {
	if let Some(id) = structure.remove(STORAGE_ID_KEY) {
		structure.insert(PUBLIC_ID_KEY.to_string(), id);
	}
}

/// Remove and return the identifier carried by a structure
///
/// The public key wins over the storage key when both are present; the
/// other one is dropped. `null` counts as absent.
pub fn take_identifier(
	structure: &mut Structure,
	collection: &'static str,
) -> OdmResult<Option<DocumentId>> {
	let public = structure.remove(PUBLIC_ID_KEY);
	let storage = structure.remove(STORAGE_ID_KEY);
	match public.or(storage) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(id)) => Ok(Some(DocumentId::from(id))),
		Some(other) => Err(OdmError::construction(
			collection,
			format!("identifier must be a string, found {}", json_kind(&other)),
		)),
	}
}

/// Short name of a JSON value's kind, used in error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
