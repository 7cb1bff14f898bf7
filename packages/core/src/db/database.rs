//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql/Turso for the storeseed catalog.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf; parent directories are
//!   created on demand
//! - **Idempotent schema**: CREATE TABLE IF NOT EXISTS only, no migrations
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled for referential integrity
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async functions: the 5-second busy
//! timeout lets operations wait and retry instead of failing immediately
//! with `SQLITE_BUSY` when the runtime interleaves connections. `connect()`
//! is for synchronous, single-threaded contexts only.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use storeseed_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("./data/storeseed.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for category insertion (avoids too-many-arguments lint)
pub struct DbInsertCategoryParams<'a> {
    pub category_key: &'a str,
    pub name: Option<&'a str>,
    pub image_name: Option<&'a str>,
    pub is_active: bool,
    pub is_in_menu: bool,
    pub is_searchable: bool,
}

/// Parameters for category update (avoids too-many-arguments lint)
pub struct DbUpdateCategoryParams<'a> {
    pub category_key: &'a str,
    pub name: Option<&'a str>,
    pub image_name: Option<&'a str>,
    pub is_active: bool,
    pub is_in_menu: bool,
    pub is_searchable: bool,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys, busy timeout)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // Checked before opening so schema init knows whether to checkpoint
        let is_new_database = !db_path.exists();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        // Open database connection using Builder pattern
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS, so the
    /// call is idempotent and safe on existing catalogs.
    ///
    /// # Schema
    ///
    /// - `categories`: business records keyed by `category_key`
    /// - `category_nodes`: tree placements (parent links, root/main flags)
    /// - `glossary_keys` / `glossary_translations`: translation storage
    ///
    /// # SQLite Configuration
    ///
    /// - WAL mode: Write-Ahead Logging for better concurrency
    /// - Busy timeout: 5s wait instead of immediate SQLITE_BUSY
    /// - Foreign keys: enabled for referential integrity
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_key TEXT NOT NULL UNIQUE,
                name TEXT,
                image_name TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                is_in_menu INTEGER NOT NULL DEFAULT 1,
                is_searchable INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create categories table: {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS category_nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_key TEXT NOT NULL,
                parent_node_id INTEGER,
                is_root INTEGER NOT NULL DEFAULT 0,
                is_main INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                -- Category deletion removes its placements
                FOREIGN KEY (category_key) REFERENCES categories(category_key) ON DELETE CASCADE,
                -- Parent deletion detaches children instead of dropping subtrees
                FOREIGN KEY (parent_node_id) REFERENCES category_nodes(id) ON DELETE SET NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create category_nodes table: {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS glossary_keys (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                glossary_key TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create glossary_keys table: {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS glossary_translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fk_glossary_key INTEGER NOT NULL,
                locale_name TEXT NOT NULL,
                value TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (fk_glossary_key, locale_name),
                FOREIGN KEY (fk_glossary_key) REFERENCES glossary_keys(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create glossary_translations table: {}",
                e
            ))
        })?;

        self.create_core_indexes(&conn).await?;

        // Flush the fresh schema out of the WAL so other connections opened
        // right after creation always see the tables
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    /// Create core indexes for the catalog tables
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        // Index on category_key (placement lookups during parent resolution)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_category_nodes_key ON category_nodes(category_key)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_category_nodes_key': {}",
                e
            ))
        })?;

        // Index on parent_node_id (subtree queries)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_category_nodes_parent ON category_nodes(parent_node_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_category_nodes_parent': {}",
                e
            ))
        })?;

        // Index on is_root (root lookup, orphan counting)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_category_nodes_root ON category_nodes(is_root)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_category_nodes_root': {}",
                e
            ))
        })?;

        // Index on fk_glossary_key (translation lookups per key)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_glossary_translations_key ON glossary_translations(fk_glossary_key)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_glossary_translations_key': {}",
                e
            ))
        })?;

        Ok(())
    }

    /// Get a connection without the async busy timeout setup
    ///
    /// Use only in single-threaded, synchronous contexts where the
    /// connection never crosses an await point.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get a connection configured for async contexts
    ///
    /// Sets a 5-second busy timeout so concurrent operations wait and retry
    /// instead of failing immediately with `SQLITE_BUSY`.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }

    //
    // CATEGORY OPERATIONS
    //

    /// Insert a category record
    pub async fn db_insert_category(
        &self,
        params: DbInsertCategoryParams<'_>,
    ) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO categories (category_key, name, image_name, is_active, is_in_menu, is_searchable)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                params.category_key,
                params.name,
                params.image_name,
                params.is_active as i64,
                params.is_in_menu as i64,
                params.is_searchable as i64,
            ),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert category: {}", e)))?;

        Ok(())
    }

    /// Retrieve a category record by its business key
    ///
    /// Returns the raw database row; the store layer converts it to a
    /// `CategoryRecord`.
    pub async fn db_find_category_by_key(
        &self,
        category_key: &str,
    ) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT category_key, name, image_name, is_active, is_in_menu, is_searchable,
                        created_at, updated_at
                 FROM categories WHERE category_key = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to prepare find_category query: {}",
                    e
                ))
            })?;

        let mut rows = stmt.query([category_key]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute find_category query: {}", e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// Update a category record's attributes by its business key
    ///
    /// Returns the number of affected rows (zero when no such key exists).
    pub async fn db_update_category(
        &self,
        params: DbUpdateCategoryParams<'_>,
    ) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let rows_affected = conn
            .execute(
                "UPDATE categories
                 SET name = ?, image_name = ?, is_active = ?, is_in_menu = ?, is_searchable = ?,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE category_key = ?",
                (
                    params.name,
                    params.image_name,
                    params.is_active as i64,
                    params.is_in_menu as i64,
                    params.is_searchable as i64,
                    params.category_key,
                ),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to update category: {}", e))
            })?;

        Ok(rows_affected)
    }

    //
    // NODE OPERATIONS
    //

    /// Insert a tree placement and return its store-assigned id
    pub async fn db_insert_node(
        &self,
        category_key: &str,
        parent_node_id: Option<i64>,
        is_root: bool,
        is_main: bool,
    ) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO category_nodes (category_key, parent_node_id, is_root, is_main)
             VALUES (?, ?, ?, ?)",
            (category_key, parent_node_id, is_root as i64, is_main as i64),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// Retrieve the root placement, when one exists
    pub async fn db_find_root_node(&self) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, category_key, parent_node_id, is_root, is_main
                 FROM category_nodes WHERE is_root = 1 LIMIT 1",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare root node query: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute root node query: {}", e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// Retrieve all main placements for a category key
    pub async fn db_find_main_nodes_by_category_key(
        &self,
        category_key: &str,
    ) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, category_key, parent_node_id, is_root, is_main
                 FROM category_nodes WHERE category_key = ? AND is_main = 1
                 ORDER BY id",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare main nodes query: {}", e))
            })?;

        stmt.query([category_key]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute main nodes query: {}", e))
        })
    }

    /// Retrieve the first main placement for a category key, when one exists
    pub async fn db_find_main_node_by_category_key(
        &self,
        category_key: &str,
    ) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, category_key, parent_node_id, is_root, is_main
                 FROM category_nodes WHERE category_key = ? AND is_main = 1
                 ORDER BY id LIMIT 1",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare main node query: {}", e))
            })?;

        let mut rows = stmt.query([category_key]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute main node query: {}", e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// Count non-root placements that have no parent link
    pub async fn db_count_orphan_nodes(&self) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT COUNT(*) FROM category_nodes
                 WHERE is_root = 0 AND parent_node_id IS NULL",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare orphan count query: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute orphan count query: {}", e))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| DatabaseError::sql_execution("Orphan count query returned no rows"))?;

        let count: i64 = row.get(0)?;
        Ok(count)
    }

    /// Rewrite a placement's parent link
    ///
    /// Returns the number of affected rows (zero when no such node exists).
    pub async fn db_set_node_parent(
        &self,
        node_id: i64,
        parent_node_id: i64,
    ) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let rows_affected = conn
            .execute(
                "UPDATE category_nodes SET parent_node_id = ? WHERE id = ?",
                (parent_node_id, node_id),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to update node parent: {}", e))
            })?;

        Ok(rows_affected)
    }

    //
    // GLOSSARY OPERATIONS
    //

    /// Count glossary keys in the store
    pub async fn db_count_glossary_keys(&self) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT COUNT(*) FROM glossary_keys")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare key count query: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute key count query: {}", e))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| DatabaseError::sql_execution("Key count query returned no rows"))?;

        let count: i64 = row.get(0)?;
        Ok(count)
    }

    /// Retrieve a glossary key's id, when the key exists
    pub async fn db_find_glossary_key_id(
        &self,
        glossary_key: &str,
    ) -> Result<Option<i64>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT id FROM glossary_keys WHERE glossary_key = ?")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare key lookup query: {}", e))
            })?;

        let mut rows = stmt.query([glossary_key]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute key lookup query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Insert a glossary key and return its store-assigned id
    pub async fn db_insert_glossary_key(&self, glossary_key: &str) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO glossary_keys (glossary_key) VALUES (?)",
            [glossary_key],
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to insert glossary key: {}", e))
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Whether a translation exists for a key id and locale name
    pub async fn db_has_translation(
        &self,
        key_id: i64,
        locale_name: &str,
    ) -> Result<bool, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT COUNT(*) FROM glossary_translations
                 WHERE fk_glossary_key = ? AND locale_name = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to prepare translation count query: {}",
                    e
                ))
            })?;

        let mut rows = stmt.query((key_id, locale_name)).await.map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to execute translation count query: {}",
                e
            ))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| {
                DatabaseError::sql_execution("Translation count query returned no rows")
            })?;

        let count: i64 = row.get(0)?;
        Ok(count > 0)
    }

    /// Insert a translation for a key id and locale name
    pub async fn db_insert_translation(
        &self,
        key_id: i64,
        locale_name: &str,
        value: &str,
        is_active: bool,
    ) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO glossary_translations (fk_glossary_key, locale_name, value, is_active)
             VALUES (?, ?, ?, ?)",
            (key_id, locale_name, value, is_active as i64),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to insert translation: {}", e))
        })?;

        Ok(())
    }

    /// Count all stored translations
    pub async fn db_count_glossary_translations(&self) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT COUNT(*) FROM glossary_translations")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to prepare translation total query: {}",
                    e
                ))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute translation total query: {}", e))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| {
                DatabaseError::sql_execution("Translation total query returned no rows")
            })?;

        let count: i64 = row.get(0)?;
        Ok(count)
    }
}
