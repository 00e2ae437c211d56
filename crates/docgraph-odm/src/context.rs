//! Traversal context for document conversion
//!
//! A [`ConversionContext`] is handed down every `to_structure` call. It carries
//! the store used to resolve identifiers and the ambient depth of the current
//! expansion path, so nested reference fields never need to keep state of
//! their own.

use std::fmt;

use crate::store::DocumentStore;

/// Context threaded through one document conversion call chain
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
	store: &'a dyn DocumentStore,
	/// Number of inline expansions already performed; `None` at the top of a storage rendering
	depth: Option<usize>,
	good_json: bool,
}

impl<'a> ConversionContext<'a> {
	/// Context for rendering a document for storage
	///
	/// The ambient depth is absent, so every reference renders as its identifier.
	///
	/// # Examples
	///
	/// ```
	/// use docgraph_odm::{ConversionContext, InMemoryStore};
	///
	/// let store = InMemoryStore::new();
	/// let ctx = ConversionContext::storage(&store);
	/// assert_eq!(ctx.depth(), None);
	/// assert!(!ctx.is_good_json());
	/// ```
	pub fn storage(store: &'a dyn DocumentStore) -> Self {
		Self {
			store,
			depth: None,
			good_json: false,
		}
	}

	/// Context for the top of a good-json rendering
	///
	/// # Examples
	///
	/// ```
	/// use docgraph_odm::{ConversionContext, InMemoryStore};
	///
	/// let store = InMemoryStore::new();
	/// let ctx = ConversionContext::good_json(&store);
	/// assert_eq!(ctx.depth(), Some(0));
	/// assert_eq!(ctx.child().depth(), Some(1));
	/// ```
	pub fn good_json(store: &'a dyn DocumentStore) -> Self {
		Self {
			store,
			depth: Some(0),
			good_json: true,
		}
	}

	/// Context starting at an arbitrary ambient depth
	pub fn at_depth(store: &'a dyn DocumentStore, depth: usize) -> Self {
		Self {
			store,
			depth: Some(depth),
			good_json: true,
		}
	}

	/// Context for one level deeper on the current path
	pub fn child(&self) -> Self {
		Self {
			store: self.store,
			depth: self.depth.map(|d| d + 1),
			good_json: self.good_json,
		}
	}

	/// Plain conversion on the same store
	///
	/// Drops the ambient depth and good-json output, so nested references of a
	/// target that only offers a plain conversion stay identifiers.
	pub fn plain(&self) -> Self {
		Self::storage(self.store)
	}

	/// Ambient depth of the current path
	pub fn depth(&self) -> Option<usize> {
		self.depth
	}

	/// Whether good-json output was requested
	///
	/// Reference fields decide expansion from the depth alone; document
	/// implementations read this to leave storage-only keys out of the
	/// public rendering.
	pub fn is_good_json(&self) -> bool {
		self.good_json
	}

	/// Store used to resolve identifiers
	pub fn store(&self) -> &'a dyn DocumentStore {
		self.store
	}
}

impl fmt::Debug for ConversionContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConversionContext")
			.field("depth", &self.depth)
			.field("good_json", &self.good_json)
			.finish_non_exhaustive()
	}
}
