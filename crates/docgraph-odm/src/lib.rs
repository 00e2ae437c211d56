//! # docgraph ODM
//!
//! Depth-bounded follow-reference fields for document-graph models.
//!
//! A document may hold reference fields pointing at other documents. In
//! storage such a field is just the target's identifier; in good-json output
//! a [`FollowReferenceField`] renders the target inline, recursively, until
//! the configured [`MaxDepth`] is reached. Inbound good-json is turned back
//! into live documents, optionally saving newly built targets.
//!
//! ## Modules
//!
//! - [`document`]: the [`Document`] trait implemented by model types
//! - [`fields`]: plain and follow-reference fields
//! - [`context`]: the [`ConversionContext`] carrying depth down a rendering
//! - [`store`]: the [`DocumentStore`] capability and an in-memory backend
//! - [`config`]: field options and their TOML/JSON loaders
//! - [`value`]: identifiers, structures and slot values
//! - [`error`]: error types
//!
//! ## Depth
//!
//! Rendering a document with [`Document::to_good_json`] starts at depth 0.
//! Each expansion hands depth + 1 to the expanded document. With the default
//! limit of 3, a chain `A -> B -> C -> D -> A` renders B, C and D inline and
//! the final back-reference to A as its identifier. Rendering for storage
//! carries no depth at all, so every reference is stored as an identifier.

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod fields;
pub mod store;
pub mod value;

pub use config::{FollowReferenceOptions, MaxDepth};
pub use context::ConversionContext;
pub use document::Document;
pub use error::{OdmError, OdmResult, StoreError, StoreResult};
pub use fields::{FollowReferenceField, ReferenceField, ReferenceTarget};
pub use store::{DocumentStore, InMemoryStore, StoreStatistics};
pub use value::{DocumentId, ReferenceValue, Structure};
