//! TursoCatalogStore - Store Trait Implementations for Turso/libsql Backend
//!
//! This module implements the catalog store traits for the Turso (libsql)
//! database, providing the persistence layer the importers run against.
//!
//! # Design Principles
//!
//! 1. **Pure Delegation**: All methods delegate to DatabaseService `db_*` operations
//! 2. **Row Conversion**: Handles libsql::Row to model conversion in one place
//! 3. **Zero Business Logic**: Resolution and merge rules live in the import layer
//!
//! # Examples
//!
//! ```rust,no_run
//! use storeseed_core::db::{CategoryNodeStore, TursoCatalogStore, DatabaseService};
//! use std::sync::Arc;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create database service
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/catalog.db")).await?);
//!
//!     // Wrap in store traits
//!     let store: Arc<dyn CategoryNodeStore> = Arc::new(TursoCatalogStore::new(db));
//!
//!     // Use abstraction layer
//!     let root = store.find_root_node().await?;
//!
//!     Ok(())
//! }
//! ```

use crate::db::catalog_store::{CategoryNodeStore, CategoryStore, GlossaryStore};
use crate::db::{DatabaseService, DbUpdateCategoryParams};
use crate::models::{CategoryNode, CategoryRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;

/// TursoCatalogStore implements the catalog store traits for Turso/libsql
///
/// This is a thin wrapper around DatabaseService that exposes the store
/// trait abstractions the import layer depends on.
pub struct TursoCatalogStore {
    /// Underlying database service (extracted SQL operations)
    db: Arc<DatabaseService>,
}

impl TursoCatalogStore {
    /// Create a new TursoCatalogStore wrapper
    ///
    /// # Arguments
    ///
    /// * `db` - Arc to DatabaseService with extracted SQL operations
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    /// Imported data might use RFC3339: "YYYY-MM-DDTHH:MM:SSZ"
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        // Try SQLite format first: "YYYY-MM-DD HH:MM:SS"
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        // Try RFC3339 format: "YYYY-MM-DDTHH:MM:SSZ"
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(anyhow::anyhow!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        ))
    }

    /// Convert libsql::Row to CategoryNode model
    ///
    /// Expected columns (in order):
    /// - id (INTEGER)
    /// - category_key (TEXT)
    /// - parent_node_id (INTEGER, nullable)
    /// - is_root (INTEGER, 0/1)
    /// - is_main (INTEGER, 0/1)
    fn row_to_node(row: &Row) -> Result<CategoryNode> {
        let id: i64 = row.get(0).context("Failed to get node id")?;
        let category_key: String = row.get(1).context("Failed to get node category_key")?;
        let parent_node_id: Option<i64> =
            row.get(2).context("Failed to get node parent_node_id")?;
        let is_root: i64 = row.get(3).context("Failed to get node is_root")?;
        let is_main: i64 = row.get(4).context("Failed to get node is_main")?;

        Ok(CategoryNode {
            id,
            category_key,
            parent_node_id,
            is_root: is_root != 0,
            is_main: is_main != 0,
        })
    }

    /// Convert libsql::Row to CategoryRecord model
    ///
    /// Expected columns (in order):
    /// - category_key (TEXT)
    /// - name (TEXT, nullable)
    /// - image_name (TEXT, nullable)
    /// - is_active (INTEGER, 0/1)
    /// - is_in_menu (INTEGER, 0/1)
    /// - is_searchable (INTEGER, 0/1)
    /// - created_at (TEXT, nullable)
    /// - updated_at (TEXT, nullable)
    fn row_to_category(row: &Row) -> Result<CategoryRecord> {
        let category_key: String = row.get(0).context("Failed to get category_key")?;
        let name: Option<String> = row.get(1).context("Failed to get category name")?;
        let image_name: Option<String> = row.get(2).context("Failed to get category image_name")?;
        let is_active: i64 = row.get(3).context("Failed to get category is_active")?;
        let is_in_menu: i64 = row.get(4).context("Failed to get category is_in_menu")?;
        let is_searchable: i64 = row.get(5).context("Failed to get category is_searchable")?;
        let created_at_str: Option<String> = row.get(6).context("Failed to get created_at")?;
        let updated_at_str: Option<String> = row.get(7).context("Failed to get updated_at")?;

        let created_at = match created_at_str {
            Some(s) => Some(Self::parse_timestamp(&s)?),
            None => None,
        };
        let updated_at = match updated_at_str {
            Some(s) => Some(Self::parse_timestamp(&s)?),
            None => None,
        };

        Ok(CategoryRecord {
            category_key,
            name,
            image_name,
            is_active: is_active != 0,
            is_in_menu: is_in_menu != 0,
            is_searchable: is_searchable != 0,
            created_at,
            updated_at,
            category_node_id: None,
            parent_node_id: None,
        })
    }
}

#[async_trait]
impl CategoryNodeStore for TursoCatalogStore {
    async fn count_orphan_nodes(&self) -> Result<i64> {
        self.db
            .db_count_orphan_nodes()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count orphan nodes: {}", e))
    }

    async fn find_root_node(&self) -> Result<Option<CategoryNode>> {
        let row = self
            .db
            .db_find_root_node()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find root node: {}", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_node(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_main_nodes_by_category_key(
        &self,
        category_key: &str,
    ) -> Result<Vec<CategoryNode>> {
        let mut rows = self
            .db
            .db_find_main_nodes_by_category_key(category_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find main nodes: {}", e))?;

        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read main nodes: {}", e))?
        {
            nodes.push(Self::row_to_node(&row)?);
        }

        Ok(nodes)
    }

    async fn find_main_node_by_category_key(
        &self,
        category_key: &str,
    ) -> Result<Option<CategoryNode>> {
        let row = self
            .db
            .db_find_main_node_by_category_key(category_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find main node: {}", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_node(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CategoryStore for TursoCatalogStore {
    async fn find_category_by_key(&self, category_key: &str) -> Result<Option<CategoryRecord>> {
        let row = self
            .db
            .db_find_category_by_key(category_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find category: {}", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_category(&self, record: &CategoryRecord) -> Result<()> {
        let affected = self
            .db
            .db_update_category(DbUpdateCategoryParams {
                category_key: &record.category_key,
                name: record.name.as_deref(),
                image_name: record.image_name.as_deref(),
                is_active: record.is_active,
                is_in_menu: record.is_in_menu,
                is_searchable: record.is_searchable,
            })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update category: {}", e))?;

        if affected == 0 {
            anyhow::bail!(
                "Category '{}' not found for update",
                record.category_key
            );
        }

        // Records carrying node references also rewrite that placement's
        // parent link
        if let (Some(node_id), Some(parent_node_id)) =
            (record.category_node_id, record.parent_node_id)
        {
            self.db
                .db_set_node_parent(node_id, parent_node_id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update node parent: {}", e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl GlossaryStore for TursoCatalogStore {
    async fn count_keys(&self) -> Result<i64> {
        self.db
            .db_count_glossary_keys()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count glossary keys: {}", e))
    }

    async fn has_key(&self, glossary_key: &str) -> Result<bool> {
        let id = self
            .db
            .db_find_glossary_key_id(glossary_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find glossary key: {}", e))?;

        Ok(id.is_some())
    }

    async fn create_key(&self, glossary_key: &str) -> Result<()> {
        self.db
            .db_insert_glossary_key(glossary_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create glossary key: {}", e))?;

        Ok(())
    }

    async fn has_translation(&self, glossary_key: &str, locale_name: &str) -> Result<bool> {
        let key_id = self
            .db
            .db_find_glossary_key_id(glossary_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find glossary key: {}", e))?;

        match key_id {
            Some(key_id) => self
                .db
                .db_has_translation(key_id, locale_name)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to check translation: {}", e)),
            None => Ok(false),
        }
    }

    async fn create_translation(
        &self,
        glossary_key: &str,
        locale_name: &str,
        value: &str,
        is_active: bool,
    ) -> Result<()> {
        let key_id = self
            .db
            .db_find_glossary_key_id(glossary_key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find glossary key: {}", e))?
            .ok_or_else(|| {
                anyhow::anyhow!("Glossary key '{}' not found for translation", glossary_key)
            })?;

        self.db
            .db_insert_translation(key_id, locale_name, value, is_active)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create translation: {}", e))?;

        Ok(())
    }
}
