//! Import error types
//!
//! Import failures are fatal: the runner stops at the first error and
//! propagates it to the caller, leaving already-imported rows in place.

use crate::models::ImportRow;
use thiserror::Error;

/// Errors surfaced by importers and the import runner
#[derive(Error, Debug)]
pub enum ImportError {
    /// The store has no root placement to anchor the tree
    #[error("Could not find any root nodes")]
    MissingRootNode,

    /// A feed row names a category the store has never seen
    #[error("No stored category found for key: {key}")]
    MissingCategory { key: String },

    /// A feed row carries no category key column
    #[error("Import row is missing the '{}' column", ImportRow::CATEGORY_KEY)]
    MissingCategoryKey,

    /// A store operation failed underneath the importer
    #[error("Store operation failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl ImportError {
    /// Create a MissingCategory error for the given key
    pub fn missing_category(key: impl Into<String>) -> Self {
        ImportError::MissingCategory { key: key.into() }
    }
}
