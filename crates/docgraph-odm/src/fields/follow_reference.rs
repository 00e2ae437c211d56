//! Follow-reference field
//!
//! Behaves like a plain reference in storage, but renders the referenced
//! document inline (as if it were embedded) when converted to good-json.
//! Expansion is bounded by [`MaxDepth`], so self-referencing and cyclic
//! graphs terminate: once the ambient depth reaches the limit the reference
//! degrades to its identifier.

use serde_json::Value;
use std::fmt;

use super::reference::{Inbound, ReferenceBehavior, ReferenceField};
use crate::config::{FollowReferenceOptions, MaxDepth};
use crate::context::ConversionContext;
use crate::document::{Document, is_created};
use crate::error::{OdmError, OdmResult};
use crate::store::{DocumentStore, lookup, persist};
use crate::value::{ReferenceValue, json_kind, normalize_identifier_key};

/// What a reference field points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTarget {
	/// Another document type
	Document,
	/// The document type declaring the field
	SelfReference,
}

/// Reference field that expands the referenced document in good-json output
///
/// # Examples
///
/// ```
/// use docgraph_odm::{FollowReferenceField, FollowReferenceOptions, MaxDepth};
/// # use docgraph_odm::{ConversionContext, Document, DocumentId, DocumentStore, OdmResult};
/// # use docgraph_odm::value::Structure;
/// # struct Node { id: Option<DocumentId> }
/// # impl Document for Node {
/// #     const COLLECTION_NAME: &'static str = "nodes";
/// #     fn id(&self) -> Option<&DocumentId> { self.id.as_ref() }
/// #     fn set_id(&mut self, id: DocumentId) { self.id = Some(id); }
/// #     fn to_structure(&self, _: &ConversionContext<'_>) -> OdmResult<Structure> { Ok(Structure::new()) }
/// #     fn from_structure(_: Structure, _: bool, _: &dyn DocumentStore) -> OdmResult<Self> { Ok(Node { id: None }) }
/// # }
///
/// let parent = FollowReferenceField::<Node>::recursive(
///     FollowReferenceOptions::new().max_depth(MaxDepth::Limited(2)),
/// );
/// assert_eq!(parent.max_depth(), MaxDepth::Limited(2));
/// assert!(parent.id_check());
/// assert!(!parent.autosave());
/// ```
pub struct FollowReferenceField<D, B = ReferenceField<D>> {
	options: FollowReferenceOptions,
	target: ReferenceTarget,
	base: B,
	_phantom: std::marker::PhantomData<fn() -> D>,
}

impl<D: Document> FollowReferenceField<D> {
	/// Declare a field referencing another document type
	pub fn new(options: FollowReferenceOptions) -> Self {
		Self::with_base(options, ReferenceTarget::Document, ReferenceField::new())
	}

	/// Declare a field referencing the declaring document type
	///
	/// An unlimited depth on a self reference is accepted but logged as a
	/// warning, since a cycle will then recurse until the stack runs out.
	pub fn recursive(options: FollowReferenceOptions) -> Self {
		Self::with_base(options, ReferenceTarget::SelfReference, ReferenceField::new())
	}
}

impl<D, B> FollowReferenceField<D, B>
where
	D: Document,
	B: ReferenceBehavior<D>,
{
	/// Declare a field with a custom base reference behavior
	pub fn with_base(options: FollowReferenceOptions, target: ReferenceTarget, base: B) -> Self {
		if target == ReferenceTarget::SelfReference && options.max_depth.is_unlimited() {
			tracing::warn!(
				collection = D::COLLECTION_NAME,
				"[BE CAREFUL!] Unlimited self reference might cause an infinite loop! [BE CAREFUL!]"
			);
		}
		Self {
			options,
			target,
			base,
			_phantom: std::marker::PhantomData,
		}
	}

	/// Field options
	pub fn options(&self) -> &FollowReferenceOptions {
		&self.options
	}

	/// Whether in-memory targets need an identifier to be expanded
	pub fn id_check(&self) -> bool {
		self.options.id_check
	}

	/// Whether deserialized targets are saved immediately
	pub fn autosave(&self) -> bool {
		self.options.autosave
	}

	/// Expansion depth limit
	pub fn max_depth(&self) -> MaxDepth {
		self.options.max_depth
	}

	/// What the field points at
	pub fn target(&self) -> ReferenceTarget {
		self.target
	}

	/// Base behavior used when the field does not expand
	pub fn base(&self) -> &B {
		&self.base
	}

	/// Convert a slot value for output
	///
	/// Without an ambient depth, or once the depth limit is reached, this is
	/// the base conversion (the identifier). Otherwise the referenced document
	/// is resolved, loading it from the store when only its identifier is
	/// known, and rendered one level deeper.
	pub fn serialize(
		&self,
		value: &ReferenceValue<D>,
		ctx: &ConversionContext<'_>,
	) -> OdmResult<Value> {
		let depth = match ctx.depth() {
			Some(depth) if self.options.max_depth.allows(depth) => depth,
			depth => {
				if let Some(depth) = depth {
					tracing::debug!(
						collection = D::COLLECTION_NAME,
						depth,
						max_depth = i64::from(self.options.max_depth),
						"Depth limit reached, rendering reference as identifier"
					);
				}
				return self.base.to_storage(value);
			}
		};

		let loaded;
		let document = match value {
			ReferenceValue::Document(doc) => {
				if doc.id().is_none() && self.options.id_check {
					return Err(OdmError::MissingIdentifier {
						collection: D::COLLECTION_NAME,
					});
				}
				&**doc
			}
			ReferenceValue::Identifier(id) => {
				loaded = lookup::<D>(ctx.store(), id)?;
				&loaded
			}
		};

		tracing::debug!(
			collection = D::COLLECTION_NAME,
			depth,
			"Expanding referenced document"
		);

		if !D::SUPPORTS_GOOD_JSON {
			return Ok(Value::Object(document.to_structure(&ctx.plain())?));
		}
		let mut structure = document.to_structure(&ctx.child())?;
		normalize_identifier_key(&mut structure);
		Ok(Value::Object(structure))
	}

	/// Convert an optional slot value for output; an empty slot renders as `null`
	pub fn serialize_optional(
		&self,
		value: Option<&ReferenceValue<D>>,
		ctx: &ConversionContext<'_>,
	) -> OdmResult<Value> {
		match value {
			Some(value) => self.serialize(value, ctx),
			None => Ok(Value::Null),
		}
	}

	/// Convert an inbound value to the slot's runtime value
	///
	/// A string is taken as an identifier. An object is built into a new
	/// in-memory document, marked as created when it has no `id` key, and
	/// saved right away when autosave is on. Anything else is rejected
	/// without touching the store.
	pub fn deserialize(
		&self,
		inbound: Value,
		store: &dyn DocumentStore,
	) -> OdmResult<ReferenceValue<D>> {
		let inbound = match inbound {
			Value::String(id) => Inbound::Identifier(id.into()),
			Value::Object(structure) => {
				let created = is_created(&structure);
				let mut document = D::from_structure(structure, created, store)?;
				if self.options.autosave {
					persist(store, &mut document)?;
				}
				Inbound::Document(document)
			}
			other => {
				return Err(OdmError::InvalidReference {
					found: json_kind(&other),
				});
			}
		};
		self.base.to_value(inbound)
	}

	/// Convert an optional inbound value; `null` leaves the slot empty
	pub fn deserialize_optional(
		&self,
		inbound: Option<Value>,
		store: &dyn DocumentStore,
	) -> OdmResult<Option<ReferenceValue<D>>> {
		match inbound {
			None | Some(Value::Null) => Ok(None),
			Some(value) => self.deserialize(value, store).map(Some),
		}
	}
}

impl<D, B: Clone> Clone for FollowReferenceField<D, B> {
	fn clone(&self) -> Self {
		Self {
			options: self.options.clone(),
			target: self.target,
			base: self.base.clone(),
			_phantom: std::marker::PhantomData,
		}
	}
}

impl<D, B> fmt::Debug for FollowReferenceField<D, B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FollowReferenceField")
			.field("target", &self.target)
			.field("document", &std::any::type_name::<D>())
			.field("options", &self.options)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::InMemoryStore;
	use crate::value::{DocumentId, STORAGE_ID_KEY, Structure};
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, Clone, PartialEq)]
	struct Leaf {
		id: Option<DocumentId>,
	}

	impl Document for Leaf {
		const COLLECTION_NAME: &'static str = "leaves";

		fn id(&self) -> Option<&DocumentId> {
			self.id.as_ref()
		}

		fn set_id(&mut self, id: DocumentId) {
			self.id = Some(id);
		}

		fn to_structure(&self, ctx: &ConversionContext<'_>) -> OdmResult<Structure> {
			let mut out = Structure::new();
			if let Some(id) = &self.id {
				out.insert(STORAGE_ID_KEY.to_string(), id.to_json());
			}
			out.insert("depth".to_string(), json!(ctx.depth()));
			Ok(out)
		}

		fn from_structure(
			mut structure: Structure,
			_created: bool,
			_store: &dyn DocumentStore,
		) -> OdmResult<Self> {
			let id = crate::value::take_identifier(&mut structure, Self::COLLECTION_NAME)?;
			Ok(Leaf { id })
		}
	}

	fn leaf(id: &str) -> ReferenceValue<Leaf> {
		ReferenceValue::document(Leaf {
			id: Some(DocumentId::from(id)),
		})
	}

	#[rstest]
	fn test_defaults() {
		let field = FollowReferenceField::<Leaf>::new(FollowReferenceOptions::default());
		assert!(field.id_check());
		assert!(!field.autosave());
		assert_eq!(field.max_depth(), MaxDepth::Limited(3));
		assert_eq!(field.target(), ReferenceTarget::Document);
	}

	#[rstest]
	fn test_no_ambient_depth_uses_base() {
		let store = InMemoryStore::new();
		let field = FollowReferenceField::<Leaf>::new(FollowReferenceOptions::default());
		let rendered = field
			.serialize(&leaf("l1"), &ConversionContext::storage(&store))
			.unwrap();
		assert_eq!(rendered, json!("l1"));
	}

	#[rstest]
	fn test_expansion_passes_next_depth() {
		let store = InMemoryStore::new();
		let field = FollowReferenceField::<Leaf>::new(FollowReferenceOptions::default());
		let rendered = field
			.serialize(&leaf("l1"), &ConversionContext::at_depth(&store, 1))
			.unwrap();
		assert_eq!(rendered, json!({"id": "l1", "depth": 2}));
	}

	#[rstest]
	#[case(MaxDepth::Limited(1), 1, json!("l1"))]
	#[case(MaxDepth::Limited(2), 1, json!({"id": "l1", "depth": 2}))]
	#[case(MaxDepth::Unlimited, 100, json!({"id": "l1", "depth": 101}))]
	fn test_depth_limit(
		#[case] max_depth: MaxDepth,
		#[case] depth: usize,
		#[case] expected: Value,
	) {
		let store = InMemoryStore::new();
		let field = FollowReferenceField::<Leaf>::new(FollowReferenceOptions::new().max_depth(max_depth));
		let rendered = field
			.serialize(&leaf("l1"), &ConversionContext::at_depth(&store, depth))
			.unwrap();
		assert_eq!(rendered, expected);
	}

	#[rstest]
	fn test_base_renders_identifier() {
		let field = FollowReferenceField::<Leaf>::new(FollowReferenceOptions::default());
		assert_eq!(field.base().to_storage(&leaf("l1")).unwrap(), json!("l1"));
	}

	#[rstest]
	fn test_clone_keeps_options() {
		let field = FollowReferenceField::<Leaf>::recursive(FollowReferenceOptions::new().autosave(true));
		let cloned = field.clone();
		assert_eq!(cloned.options(), field.options());
		assert_eq!(cloned.target(), ReferenceTarget::SelfReference);
		assert!(format!("{:?}", cloned).contains("SelfReference"));
	}
}
