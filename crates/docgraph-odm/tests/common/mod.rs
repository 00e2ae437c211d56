//! Test document models shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::LazyLock;

use docgraph_odm::value::{STORAGE_ID_KEY, take_identifier};
use docgraph_odm::{
	ConversionContext, Document, DocumentId, DocumentStore, FollowReferenceField,
	FollowReferenceOptions, InMemoryStore, OdmError, OdmResult, ReferenceValue, StoreError,
	StoreResult, Structure,
};
use serde_json::{Value, json};

thread_local! {
	/// `Node.next` declaration; each test thread configures its own
	static NEXT: RefCell<FollowReferenceField<Node>> =
		RefCell::new(FollowReferenceField::recursive(FollowReferenceOptions::default()));
}

/// Redeclare `Node.next` for the current test thread
pub fn declare_next(options: FollowReferenceOptions) {
	NEXT.with(|field| *field.borrow_mut() = FollowReferenceField::recursive(options));
}

fn required_string(structure: &mut Structure, key: &str, collection: &'static str) -> OdmResult<String> {
	match structure.remove(key) {
		Some(Value::String(value)) => Ok(value),
		Some(_) => Err(OdmError::construction(collection, format!("'{}' must be a string", key))),
		None => Err(OdmError::construction(collection, format!("missing field '{}'", key))),
	}
}

/// Self-referencing document: a linked list / graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub id: Option<DocumentId>,
	pub name: String,
	pub next: Option<ReferenceValue<Node>>,
	pub created: bool,
}

impl Node {
	pub fn new(name: &str) -> Self {
		Self {
			id: None,
			name: name.to_string(),
			next: None,
			created: true,
		}
	}

	pub fn with_id(mut self, id: &str) -> Self {
		self.id = Some(DocumentId::from(id));
		self.created = false;
		self
	}

	pub fn pointing_to(mut self, next: ReferenceValue<Node>) -> Self {
		self.next = Some(next);
		self
	}
}

impl Document for Node {
	const COLLECTION_NAME: &'static str = "nodes";

	fn id(&self) -> Option<&DocumentId> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: DocumentId) {
		self.id = Some(id);
	}

	fn validate(&self) -> OdmResult<()> {
		if self.name.is_empty() {
			return Err(OdmError::construction(Self::COLLECTION_NAME, "name must not be empty"));
		}
		Ok(())
	}

	fn to_structure(&self, ctx: &ConversionContext<'_>) -> OdmResult<Structure> {
		let mut out = Structure::new();
		if let Some(id) = &self.id {
			out.insert(STORAGE_ID_KEY.to_string(), id.to_json());
		}
		out.insert("name".to_string(), json!(self.name));
		let next = NEXT.with(|field| field.borrow().serialize_optional(self.next.as_ref(), ctx))?;
		out.insert("next".to_string(), next);
		Ok(out)
	}

	fn from_structure(
		mut structure: Structure,
		created: bool,
		store: &dyn DocumentStore,
	) -> OdmResult<Self> {
		let id = take_identifier(&mut structure, Self::COLLECTION_NAME)?;
		let name = required_string(&mut structure, "name", Self::COLLECTION_NAME)?;
		let next =
			NEXT.with(|field| field.borrow().deserialize_optional(structure.remove("next"), store))?;
		Ok(Node {
			id,
			name,
			next,
			created,
		})
	}
}

/// Document type without good-json support
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
	pub id: Option<DocumentId>,
	pub label: String,
}

impl Document for Tag {
	const COLLECTION_NAME: &'static str = "tags";
	const SUPPORTS_GOOD_JSON: bool = false;

	fn id(&self) -> Option<&DocumentId> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: DocumentId) {
		self.id = Some(id);
	}

	fn to_structure(&self, _ctx: &ConversionContext<'_>) -> OdmResult<Structure> {
		let mut out = Structure::new();
		if let Some(id) = &self.id {
			out.insert(STORAGE_ID_KEY.to_string(), id.to_json());
		}
		out.insert("label".to_string(), json!(self.label));
		Ok(out)
	}

	fn from_structure(
		mut structure: Structure,
		_created: bool,
		_store: &dyn DocumentStore,
	) -> OdmResult<Self> {
		let id = take_identifier(&mut structure, Self::COLLECTION_NAME)?;
		let label = required_string(&mut structure, "label", Self::COLLECTION_NAME)?;
		Ok(Tag { id, label })
	}
}

static POST_TAG: LazyLock<FollowReferenceField<Tag>> =
	LazyLock::new(|| FollowReferenceField::new(FollowReferenceOptions::default()));

/// Document referencing a `Tag`; its storage form carries a `_cls` marker
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
	pub id: Option<DocumentId>,
	pub title: String,
	pub tag: ReferenceValue<Tag>,
}

impl Document for Post {
	const COLLECTION_NAME: &'static str = "posts";

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
		if !ctx.is_good_json() {
			out.insert("_cls".to_string(), json!("Post"));
		}
		out.insert("title".to_string(), json!(self.title));
		out.insert("tag".to_string(), POST_TAG.serialize(&self.tag, ctx)?);
		Ok(out)
	}

	fn from_structure(
		mut structure: Structure,
		_created: bool,
		store: &dyn DocumentStore,
	) -> OdmResult<Self> {
		let id = take_identifier(&mut structure, Self::COLLECTION_NAME)?;
		let title = required_string(&mut structure, "title", Self::COLLECTION_NAME)?;
		let tag = structure
			.remove("tag")
			.ok_or_else(|| OdmError::construction(Self::COLLECTION_NAME, "missing field 'tag'"))?;
		let tag = POST_TAG.deserialize(tag, store)?;
		Ok(Post { id, title, tag })
	}
}

/// Store whose backend connection is down: every call fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
	fn down() -> StoreError {
		StoreError::Connection("down".to_string())
	}
}

impl DocumentStore for FailingStore {
	fn find_by_id(&self, _collection: &str, _id: &DocumentId) -> StoreResult<Option<Structure>> {
		Err(Self::down())
	}

	fn insert(&self, _collection: &str, _body: Structure) -> StoreResult<DocumentId> {
		Err(Self::down())
	}

	fn replace(&self, _collection: &str, _id: &DocumentId, _body: Structure) -> StoreResult<()> {
		Err(Self::down())
	}
}

/// Store a node body directly, bypassing the document layer
pub fn seed_node(store: &InMemoryStore, id: &str, name: &str, next: Option<&str>) {
	let body = json!({"_id": id, "name": name, "next": next});
	store
		.insert(Node::COLLECTION_NAME, body.as_object().cloned().unwrap())
		.unwrap();
}

/// Store a chain `n0 -> n1 -> ... -> n{len-1}`
pub fn seed_chain(store: &InMemoryStore, len: usize) {
	for i in 0..len {
		let next = (i + 1 < len).then(|| format!("n{}", i + 1));
		seed_node(store, &format!("n{}", i), &format!("node {}", i), next.as_deref());
	}
}

/// Number of inline expansions along the `next` path, and the value found at its end
pub fn expansion_path(rendered: &Value) -> (usize, Value) {
	let mut depth = 0;
	let mut current = &rendered["next"];
	while current.is_object() {
		depth += 1;
		current = &current["next"];
	}
	(depth, current.clone())
}
