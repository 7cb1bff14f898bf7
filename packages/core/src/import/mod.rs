//! Import Layer
//!
//! Batch seed imports for the catalog. Each importer consumes feed rows
//! one at a time and persists them through the store traits in `crate::db`;
//! the `ImportRunner` drives a full pass over a `RowSource`.
//!
//! # Architecture
//!
//! - **Importer trait**: one implementation per feed shape (category tree,
//!   glossary translations)
//! - **Single pass**: rows are processed strictly in feed order, with no
//!   repair pass afterwards
//! - **Run-scoped state**: parent resolution caches live on the importer
//!   and last for exactly one run
//! - **Fatal errors**: the first failing row aborts the run; partial
//!   progress stays persisted
//!
//! # Modules
//!
//! - `category_hierarchy`: links category tree placements to their parents
//! - `glossary`: seeds glossary keys and per-locale translations
//! - `runner`: skip-if-imported orchestration and run logging
//! - `source`: feed adapters (CSV, JSON, in-memory)

mod category_hierarchy;
pub mod error;
mod glossary;
mod runner;
mod source;

pub use category_hierarchy::CategoryHierarchyImporter;
pub use error::ImportError;
pub use glossary::GlossaryTranslationImporter;
pub use runner::{ImportRunner, ImportSummary};
pub use source::{CsvRowSource, JsonRowSource, RowSource, VecRowSource};

use crate::models::ImportRow;
use async_trait::async_trait;

/// A batch importer for one feed shape
///
/// Implementations hold their collaborating stores plus any run-scoped
/// state. `import_row` takes `&mut self` so that state can accumulate
/// across the rows of a single run.
#[async_trait]
pub trait Importer: Send {
    /// Human-readable name used in logs and summaries
    fn title(&self) -> &str;

    /// Whether the store already reflects a completed import
    ///
    /// The runner consults this once per run and skips the feed entirely
    /// when it reports true (unless forced).
    async fn is_already_imported(&self) -> Result<bool, ImportError>;

    /// Process a single feed row
    async fn import_row(&mut self, row: &ImportRow) -> Result<(), ImportError>;
}
