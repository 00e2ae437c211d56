//! Reference fields
//!
//! - [`ReferenceField`]: plain reference, stores the target's identifier
//! - [`FollowReferenceField`]: expands the target inline in good-json output,
//!   bounded by a depth limit

pub mod follow_reference;
pub mod reference;

pub use follow_reference::{FollowReferenceField, ReferenceTarget};
pub use reference::{Inbound, ReferenceBehavior, ReferenceField};
