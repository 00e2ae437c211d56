//! Error types for document conversion and store access
//!
//! Two layers are kept apart: [`StoreError`] is what a [`DocumentStore`]
//! backend reports, [`OdmError`] is what reference fields and documents
//! report to their callers. Nothing in this crate retries; every error is
//! raised once and propagated.
//!
//! [`DocumentStore`]: crate::store::DocumentStore

use crate::value::DocumentId;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for document and field operations
pub type OdmResult<T> = std::result::Result<T, OdmError>;

/// Errors reported by a document store backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// Connection to the backend failed or was lost
	#[error("Connection error: {0}")]
	Connection(String),

	/// The backend rejected or failed to execute the operation
	#[error("Execution error: {0}")]
	Execution(String),

	/// A stored body could not be encoded or decoded
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The operation does not make sense for the given input
	#[error("Invalid operation: {0}")]
	InvalidOperation(String),
}

/// Errors raised while resolving, expanding, constructing or persisting documents
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum OdmError {
	/// An in-memory document without an identifier was used as a reference
	#[error("The referenced document needs an identifier (collection '{collection}')")]
	MissingIdentifier { collection: &'static str },

	/// An identifier did not resolve to a stored document
	#[error("Document '{id}' not found in collection '{collection}'")]
	NotFound {
		collection: &'static str,
		id: DocumentId,
	},

	/// A document could not be built from a nested structure
	#[error("Failed to construct '{collection}' document: {message}")]
	Construction {
		collection: &'static str,
		message: String,
	},

	/// Saving a document failed
	#[error("Failed to persist '{collection}' document: {source}")]
	Persistence {
		collection: &'static str,
		#[source]
		source: StoreError,
	},

	/// A store read failed for a reason other than a missing document
	#[error("Store error: {0}")]
	Store(#[from] StoreError),

	/// A reference slot received a value that is neither an identifier nor a document body
	#[error("Invalid reference value: expected identifier string or object, found {found}")]
	InvalidReference { found: &'static str },

	/// Field options could not be loaded
	#[error("Configuration error: {0}")]
	Config(String),
}

impl OdmError {
	/// Create a construction error for the given collection
	pub fn construction(collection: &'static str, message: impl Into<String>) -> Self {
		OdmError::Construction {
			collection,
			message: message.into(),
		}
	}

	/// Check if this error reports an unresolved identifier
	pub fn is_not_found(&self) -> bool {
		matches!(self, OdmError::NotFound { .. })
	}

	/// Check if this error reports a document used as a reference before it had an identifier
	pub fn is_missing_identifier(&self) -> bool {
		matches!(self, OdmError::MissingIdentifier { .. })
	}
}

impl From<toml::de::Error> for OdmError {
	fn from(err: toml::de::Error) -> Self {
		OdmError::Config(err.to_string())
	}
}
