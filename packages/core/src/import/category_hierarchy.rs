//! Category hierarchy importer
//!
//! Relinks the main tree placement of every category named in a feed to
//! its parent placement. Rows are processed in feed order, one store
//! lookup per unresolved parent key, with resolved ids memoized for the
//! rest of the run.
//!
//! # Resolution Rules
//!
//! - The root placement is resolved once per run; a store without one
//!   fails the run with `ImportError::MissingRootNode`
//! - Rows without a parent key attach under the root
//! - Parent keys that resolve to no main placement also attach under the
//!   root, and that miss is not memoized
//!
//! A later row can therefore still re-attach children elsewhere in the
//! same pass, but there is no second pass: rows referencing a parent whose
//! own row comes later in the feed land under the root and stay there.

use crate::db::{CategoryNodeStore, CategoryStore};
use crate::import::error::ImportError;
use crate::import::Importer;
use crate::models::{CategoryNode, CategoryRecord, ImportRow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Importer for the category tree feed
///
/// Holds run-scoped resolution state; create a fresh instance per run.
pub struct CategoryHierarchyImporter {
    category_store: Arc<dyn CategoryStore>,
    node_store: Arc<dyn CategoryNodeStore>,

    /// Root placement, fetched at most once per run
    root_node: Option<CategoryNode>,

    /// Parent key to placement id, populated only by successful lookups
    parent_node_ids: HashMap<String, i64>,
}

impl CategoryHierarchyImporter {
    pub fn new(
        category_store: Arc<dyn CategoryStore>,
        node_store: Arc<dyn CategoryNodeStore>,
    ) -> Self {
        Self {
            category_store,
            node_store,
            root_node: None,
            parent_node_ids: HashMap::new(),
        }
    }

    /// Fetch the root placement, memoizing it for the rest of the run
    async fn resolve_root_node(&mut self) -> Result<CategoryNode, ImportError> {
        if let Some(root) = &self.root_node {
            return Ok(root.clone());
        }

        let root = self
            .node_store
            .find_root_node()
            .await?
            .ok_or(ImportError::MissingRootNode)?;

        self.root_node = Some(root.clone());
        Ok(root)
    }

    /// Resolve a parent key to the placement id children should link to
    ///
    /// The root is resolved before the key is examined, so a store without
    /// a root fails here even for rows that name a parent. Lookup misses
    /// fall back to the root id and are not memoized; every later
    /// reference to the same unresolved key retries the lookup.
    async fn resolve_parent_node_id(
        &mut self,
        parent_key: Option<&str>,
    ) -> Result<i64, ImportError> {
        let root = self.resolve_root_node().await?;

        let key = match parent_key {
            Some(key) if !key.is_empty() => key,
            _ => return Ok(root.id),
        };

        if let Some(&node_id) = self.parent_node_ids.get(key) {
            return Ok(node_id);
        }

        match self.node_store.find_main_node_by_category_key(key).await? {
            Some(node) => {
                self.parent_node_ids.insert(key.to_string(), node.id);
                Ok(node.id)
            }
            None => {
                debug!(
                    parent_key = key,
                    fallback_node_id = root.id,
                    "Parent key has no main placement, attaching under root"
                );
                Ok(root.id)
            }
        }
    }

    /// Build the record to persist for a feed row
    ///
    /// Starts from the row's values, then overlays the stored record so
    /// persisted attributes survive the import. Rows naming a category
    /// the store has never seen are an error.
    async fn baseline_record(&self, row: &ImportRow) -> Result<CategoryRecord, ImportError> {
        let category_key = row
            .category_key()
            .ok_or(ImportError::MissingCategoryKey)?
            .to_string();

        let mut record = CategoryRecord::from_row(row);

        let stored = self
            .category_store
            .find_category_by_key(&category_key)
            .await?
            .ok_or_else(|| ImportError::missing_category(&category_key))?;

        record.merge_stored(&stored);
        Ok(record)
    }
}

#[async_trait]
impl Importer for CategoryHierarchyImporter {
    fn title(&self) -> &str {
        "Category Tree"
    }

    /// Reports imported when no non-root placement is missing a parent link
    ///
    /// A store with no placements at all has no orphans and therefore also
    /// reports imported.
    async fn is_already_imported(&self) -> Result<bool, ImportError> {
        let orphans = self.node_store.count_orphan_nodes().await?;
        Ok(orphans == 0)
    }

    async fn import_row(&mut self, row: &ImportRow) -> Result<(), ImportError> {
        let mut record = self.baseline_record(row).await?;

        let parent_node_id = self.resolve_parent_node_id(row.parent_key()).await?;

        let main_nodes = self
            .node_store
            .find_main_nodes_by_category_key(&record.category_key)
            .await?;

        // Every main placement of the category is re-linked; records
        // carry the node references into the store update
        for node in &main_nodes {
            record.category_node_id = Some(node.id);
            record.parent_node_id = Some(parent_node_id);
            self.category_store.update_category(&record).await?;
        }

        debug!(
            category_key = %record.category_key,
            parent_node_id,
            placements = main_nodes.len(),
            "Imported category row"
        );

        Ok(())
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "category_hierarchy_test.rs"]
mod category_hierarchy_test;
