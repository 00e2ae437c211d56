//! Follow-reference field options
//!
//! Options are set once, when the owning document type declares the field.
//! They can be built in code or loaded from TOML/JSON settings:
//!
//! ```toml
//! id_check = true
//! autosave = false
//! max_depth = 3     # 0 or absent means 3, negative disables the limit
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{OdmError, OdmResult};

/// Depth limit used when none (or zero) is configured
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Maximum number of nested expansions along one serialization path
///
/// # Examples
///
/// ```
/// use docgraph_odm::MaxDepth;
///
/// assert_eq!(MaxDepth::from_setting(5), MaxDepth::Limited(5));
/// assert_eq!(MaxDepth::from_setting(0), MaxDepth::Limited(3));
/// assert_eq!(MaxDepth::from_setting(-1), MaxDepth::Unlimited);
///
/// assert!(MaxDepth::Limited(2).allows(1));
/// assert!(!MaxDepth::Limited(2).allows(2));
/// assert!(MaxDepth::Unlimited.allows(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MaxDepth {
	/// Expansion stops once the ambient depth reaches the limit
	Limited(usize),
	/// Expansion never stops because of depth
	Unlimited,
}

impl MaxDepth {
	/// Normalize an integer setting
	///
	/// Positive values are taken as is, zero falls back to
	/// [`DEFAULT_MAX_DEPTH`] and negative values disable the limit.
	pub fn from_setting(value: i64) -> Self {
		match value {
			0 => MaxDepth::Limited(DEFAULT_MAX_DEPTH),
			n if n < 0 => MaxDepth::Unlimited,
			n => MaxDepth::Limited(usize::try_from(n).unwrap_or(usize::MAX)),
		}
	}

	/// Whether one more expansion is allowed at the given ambient depth
	pub fn allows(&self, depth: usize) -> bool {
		match self {
			MaxDepth::Limited(limit) => depth < *limit,
			MaxDepth::Unlimited => true,
		}
	}

	/// Whether the limit is disabled
	pub fn is_unlimited(&self) -> bool {
		matches!(self, MaxDepth::Unlimited)
	}
}

impl Default for MaxDepth {
	fn default() -> Self {
		MaxDepth::Limited(DEFAULT_MAX_DEPTH)
	}
}

impl From<i64> for MaxDepth {
	fn from(value: i64) -> Self {
		MaxDepth::from_setting(value)
	}
}

impl From<MaxDepth> for i64 {
	fn from(value: MaxDepth) -> Self {
		match value {
			MaxDepth::Limited(limit) => i64::try_from(limit).unwrap_or(i64::MAX),
			MaxDepth::Unlimited => -1,
		}
	}
}

/// Options of a follow-reference field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowReferenceOptions {
	/// Require an identifier on in-memory documents before expanding them
	#[serde(default = "default_id_check")]
	pub id_check: bool,

	/// Persist documents built from nested structures during deserialization
	#[serde(default)]
	pub autosave: bool,

	/// Expansion depth limit
	#[serde(default)]
	pub max_depth: MaxDepth,
}

impl FollowReferenceOptions {
	/// Options with the defaults: id check on, autosave off, depth limit 3
	pub fn new() -> Self {
		Self::default()
	}

	/// Enable or disable the identifier check
	pub fn id_check(mut self, id_check: bool) -> Self {
		self.id_check = id_check;
		self
	}

	/// Enable or disable autosave
	pub fn autosave(mut self, autosave: bool) -> Self {
		self.autosave = autosave;
		self
	}

	/// Set the depth limit
	pub fn max_depth(mut self, max_depth: MaxDepth) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Load options from a TOML table
	///
	/// # Examples
	///
	/// ```
	/// use docgraph_odm::{FollowReferenceOptions, MaxDepth};
	///
	/// let options = FollowReferenceOptions::from_toml_str("autosave = true\nmax_depth = -1").unwrap();
	/// assert!(options.id_check);
	/// assert!(options.autosave);
	/// assert_eq!(options.max_depth, MaxDepth::Unlimited);
	/// ```
	pub fn from_toml_str(source: &str) -> OdmResult<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Load options from a JSON object
	pub fn from_json_value(value: serde_json::Value) -> OdmResult<Self> {
		serde_json::from_value(value).map_err(|e| OdmError::Config(e.to_string()))
	}
}

impl Default for FollowReferenceOptions {
	fn default() -> Self {
		Self {
			id_check: default_id_check(),
			autosave: false,
			max_depth: MaxDepth::default(),
		}
	}
}

fn default_id_check() -> bool {
	true
}
