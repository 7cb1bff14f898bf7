//! Category Node Structures
//!
//! This module defines the `CategoryNode` struct: a placement of a category
//! within the hierarchy tree. The category's business attributes live on
//! [`CategoryRecord`](crate::models::CategoryRecord); nodes carry only the
//! tree topology.
//!
//! A category key may hold several placements at once (cross-links between
//! subtrees). Exactly one placement per key is flagged main and is the one
//! hierarchy imports operate on; exactly one node per tree is the root.
//!
//! # Examples
//!
//! ```rust
//! use storeseed_core::models::CategoryNode;
//!
//! let root = CategoryNode::root(1, "demoshop");
//! let shoes = CategoryNode::main(2, "shoes", Some(root.id));
//!
//! assert!(root.is_root);
//! assert_eq!(shoes.parent_node_id, Some(1));
//! ```

use serde::{Deserialize, Serialize};

/// A placement of a category within the hierarchy tree
///
/// # Fields
///
/// - `id`: identity assigned by the store on insertion
/// - `category_key`: business key of the category this node places
/// - `parent_node_id`: parent placement; `None` only for the singular root
/// - `is_root`: true for exactly one node per tree
/// - `is_main`: true for the canonical placement of a category key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    /// Identity assigned by the store
    pub id: i64,

    /// Business key of the category this node places
    pub category_key: String,

    /// Parent node id; None only for the singular root
    pub parent_node_id: Option<i64>,

    /// True for exactly one node per tree
    #[serde(default)]
    pub is_root: bool,

    /// True for the canonical placement of a category key
    #[serde(default)]
    pub is_main: bool,
}

impl CategoryNode {
    /// Create the root placement
    ///
    /// The root is also the main placement of its own category key, so a
    /// feed row naming the root category as parent resolves directly to it.
    pub fn root(id: i64, category_key: impl Into<String>) -> Self {
        Self {
            id,
            category_key: category_key.into(),
            parent_node_id: None,
            is_root: true,
            is_main: true,
        }
    }

    /// Create a main (non-root) placement for a category key
    pub fn main(id: i64, category_key: impl Into<String>, parent_node_id: Option<i64>) -> Self {
        Self {
            id,
            category_key: category_key.into(),
            parent_node_id,
            is_root: false,
            is_main: true,
        }
    }

    /// Create a secondary (cross-link) placement for a category key
    ///
    /// Secondary placements are never touched by hierarchy import.
    pub fn secondary(
        id: i64,
        category_key: impl Into<String>,
        parent_node_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            category_key: category_key.into(),
            parent_node_id,
            is_root: false,
            is_main: false,
        }
    }

    /// A non-root placement with no parent link yet
    ///
    /// Orphans are what `is_already_imported` counts: the hierarchy import
    /// is considered done once no orphans remain.
    pub fn is_orphan(&self) -> bool {
        !self.is_root && self.parent_node_id.is_none()
    }
}
