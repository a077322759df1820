//! Core identifier types for the flowgraph workflow engine.
//!
//! Nodes are identified purely by name; a [`NodeName`] is the key under which
//! a task is registered and the value edges and path maps refer to.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique name of a node within a workflow graph.
///
/// `NodeName` is a thin newtype over `String` so that edges, path maps, and
/// errors all speak the same identifier type. String literals convert
/// directly wherever a name is expected:
///
/// ```
/// use flowgraph::types::NodeName;
///
/// let name: NodeName = "addition".into();
/// assert_eq!(name.as_str(), "addition");
/// assert_eq!(name.to_string(), "addition");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Creates a node name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Allows map lookups keyed by NodeName to take a plain &str.
impl Borrow<str> for NodeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
