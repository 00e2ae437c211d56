//! Plain reference field behavior
//!
//! A plain reference stores the identifier of the referenced document and
//! nothing else. [`FollowReferenceField`](super::FollowReferenceField)
//! delegates to a [`ReferenceBehavior`] whenever it does not expand.

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

use crate::document::Document;
use crate::error::{OdmError, OdmResult};
use crate::value::{DocumentId, ReferenceValue};

/// Inbound value for a reference slot, after nested structures were materialized
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound<D> {
	/// A bare identifier
	Identifier(DocumentId),
	/// A document built in memory
	Document(D),
}

/// Base conversion of a reference slot between its runtime value and storage
pub trait ReferenceBehavior<D: Document> {
	/// Convert a slot value to its storage primitive
	fn to_storage(&self, value: &ReferenceValue<D>) -> OdmResult<Value>;

	/// Convert an inbound value to the slot's runtime representation
	fn to_value(&self, inbound: Inbound<D>) -> OdmResult<ReferenceValue<D>>;
}

/// Plain reference field
///
/// # Examples
///
/// ```
/// use docgraph_odm::fields::{ReferenceBehavior, ReferenceField};
/// # use docgraph_odm::{ConversionContext, Document, DocumentId, DocumentStore, OdmResult};
/// # use docgraph_odm::value::Structure;
/// # struct Tag { id: Option<DocumentId> }
/// # impl Document for Tag {
/// #     const COLLECTION_NAME: &'static str = "tags";
/// #     fn id(&self) -> Option<&DocumentId> { self.id.as_ref() }
/// #     fn set_id(&mut self, id: DocumentId) { self.id = Some(id); }
/// #     fn to_structure(&self, _: &ConversionContext<'_>) -> OdmResult<Structure> { Ok(Structure::new()) }
/// #     fn from_structure(_: Structure, _: bool, _: &dyn DocumentStore) -> OdmResult<Self> { Ok(Tag { id: None }) }
/// # }
/// use docgraph_odm::ReferenceValue;
/// use serde_json::json;
///
/// let field = ReferenceField::<Tag>::new();
/// let value = ReferenceValue::Identifier(DocumentId::from("t1"));
/// assert_eq!(field.to_storage(&value).unwrap(), json!("t1"));
/// ```
pub struct ReferenceField<D> {
	_phantom: PhantomData<fn() -> D>,
}

impl<D> ReferenceField<D> {
	/// Create a plain reference field
	pub fn new() -> Self {
		Self {
			_phantom: PhantomData,
		}
	}
}

impl<D> Default for ReferenceField<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D> Clone for ReferenceField<D> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<D> Copy for ReferenceField<D> {}

impl<D> fmt::Debug for ReferenceField<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReferenceField")
			.field("target", &std::any::type_name::<D>())
			.finish()
	}
}

impl<D: Document> ReferenceBehavior<D> for ReferenceField<D> {
	fn to_storage(&self, value: &ReferenceValue<D>) -> OdmResult<Value> {
		value
			.id()
			.map(DocumentId::to_json)
			.ok_or(OdmError::MissingIdentifier {
				collection: D::COLLECTION_NAME,
			})
	}

	fn to_value(&self, inbound: Inbound<D>) -> OdmResult<ReferenceValue<D>> {
		Ok(match inbound {
			Inbound::Identifier(id) => ReferenceValue::Identifier(id),
			Inbound::Document(doc) => ReferenceValue::document(doc),
		})
	}
}
