//! Catalog store abstractions
//!
//! Narrow traits between the import layer and persistence. Importers only
//! see these traits, so tests can substitute in-memory fakes and the
//! resolution logic stays observable (lookup counts, update order) without
//! a real database.

use crate::models::{CategoryNode, CategoryRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Store operations on category tree placements
#[async_trait]
pub trait CategoryNodeStore: Send + Sync {
    /// Count non-root placements with no parent link
    async fn count_orphan_nodes(&self) -> Result<i64>;

    /// Fetch the root placement, when one exists
    async fn find_root_node(&self) -> Result<Option<CategoryNode>>;

    /// Fetch all main placements for a category key
    async fn find_main_nodes_by_category_key(&self, category_key: &str)
        -> Result<Vec<CategoryNode>>;

    /// Fetch the first main placement for a category key, when one exists
    async fn find_main_node_by_category_key(
        &self,
        category_key: &str,
    ) -> Result<Option<CategoryNode>>;
}

/// Store operations on category business records
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Fetch a category record by its business key
    async fn find_category_by_key(&self, category_key: &str) -> Result<Option<CategoryRecord>>;

    /// Persist a category record's attributes and, when the record carries
    /// node references, rewrite that placement's parent link
    async fn update_category(&self, record: &CategoryRecord) -> Result<()>;
}

/// Store operations on glossary keys and their translations
#[async_trait]
pub trait GlossaryStore: Send + Sync {
    /// Count glossary keys in the store
    async fn count_keys(&self) -> Result<i64>;

    /// Whether a glossary key exists
    async fn has_key(&self, glossary_key: &str) -> Result<bool>;

    /// Create a glossary key
    async fn create_key(&self, glossary_key: &str) -> Result<()>;

    /// Whether a translation exists for a key and locale name
    async fn has_translation(&self, glossary_key: &str, locale_name: &str) -> Result<bool>;

    /// Create a translation for an existing key
    async fn create_translation(
        &self,
        glossary_key: &str,
        locale_name: &str,
        value: &str,
        is_active: bool,
    ) -> Result<()>;
}
