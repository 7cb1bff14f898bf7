//! Import runner
//!
//! Drives one importer over one row source: consults the importer's
//! already-imported check, then feeds it rows strictly in feed order until
//! the source is exhausted or a row fails. Every run gets a fresh run id
//! that correlates its log lines.

use crate::import::error::ImportError;
use crate::import::source::RowSource;
use crate::import::Importer;
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of a single import run
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// Correlates the log lines of this run
    pub run_id: String,
    /// The importer's title
    pub title: String,
    /// Rows handed to the importer
    pub rows_imported: u64,
    /// Whether the run was skipped because the store already reported imported
    pub skipped: bool,
}

/// Orchestrates import runs
#[derive(Debug, Clone)]
pub struct ImportRunner {
    skip_imported: bool,
}

impl ImportRunner {
    /// Runner with the default skip-if-imported behavior
    pub fn new() -> Self {
        Self {
            skip_imported: true,
        }
    }

    /// Runner with explicit skip behavior; `false` forces a run even when
    /// the store already reports imported
    pub fn with_skip_imported(skip_imported: bool) -> Self {
        Self { skip_imported }
    }

    /// Run one importer over one source
    ///
    /// The first failing row aborts the run and propagates its error;
    /// rows imported before the failure stay persisted.
    pub async fn run(
        &self,
        importer: &mut dyn Importer,
        source: &mut dyn RowSource,
    ) -> Result<ImportSummary, ImportError> {
        let run_id = Uuid::new_v4().to_string();
        let title = importer.title().to_string();

        if self.skip_imported && importer.is_already_imported().await? {
            info!(run_id = %run_id, title = %title, "Import skipped, store already imported");
            return Ok(ImportSummary {
                run_id,
                title,
                rows_imported: 0,
                skipped: true,
            });
        }

        info!(run_id = %run_id, title = %title, "Import started");

        let mut rows_imported = 0u64;
        while let Some(row) = source.next_row()? {
            importer.import_row(&row).await?;
            rows_imported += 1;
            debug!(run_id = %run_id, rows_imported, "Imported row");
        }

        info!(run_id = %run_id, title = %title, rows_imported, "Import finished");

        Ok(ImportSummary {
            run_id,
            title,
            rows_imported,
            skipped: false,
        })
    }
}

impl Default for ImportRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::source::VecRowSource;
    use crate::models::ImportRow;
    use async_trait::async_trait;

    struct ScriptedImporter {
        already_imported: bool,
        fail_at: Option<usize>,
        seen: Vec<String>,
    }

    impl ScriptedImporter {
        fn new(already_imported: bool) -> Self {
            Self {
                already_imported,
                fail_at: None,
                seen: Vec::new(),
            }
        }

        fn failing_at(row_index: usize) -> Self {
            Self {
                already_imported: false,
                fail_at: Some(row_index),
                seen: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Importer for ScriptedImporter {
        fn title(&self) -> &str {
            "Scripted"
        }

        async fn is_already_imported(&self) -> Result<bool, ImportError> {
            Ok(self.already_imported)
        }

        async fn import_row(&mut self, row: &ImportRow) -> Result<(), ImportError> {
            if Some(self.seen.len()) == self.fail_at {
                return Err(ImportError::missing_category("scripted"));
            }
            self.seen
                .push(row.category_key().unwrap_or_default().to_string());
            Ok(())
        }
    }

    fn source_for(keys: &[&str]) -> VecRowSource {
        VecRowSource::new(
            keys.iter()
                .map(|key| ImportRow::from_pairs([(ImportRow::CATEGORY_KEY, *key)]))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_skips_when_already_imported() {
        let mut importer = ScriptedImporter::new(true);
        let mut source = source_for(&["a", "b"]);

        let summary = ImportRunner::new()
            .run(&mut importer, &mut source)
            .await
            .unwrap();

        assert!(summary.skipped);
        assert_eq!(summary.rows_imported, 0);
        assert!(importer.seen.is_empty());
    }

    #[tokio::test]
    async fn test_processes_rows_in_feed_order() {
        let mut importer = ScriptedImporter::new(false);
        let mut source = source_for(&["a", "b", "c"]);

        let summary = ImportRunner::new()
            .run(&mut importer, &mut source)
            .await
            .unwrap();

        assert!(!summary.skipped);
        assert_eq!(summary.rows_imported, 3);
        assert_eq!(importer.seen, vec!["a", "b", "c"]);
        assert_eq!(summary.title, "Scripted");
    }

    #[tokio::test]
    async fn test_stops_at_first_failing_row() {
        let mut importer = ScriptedImporter::failing_at(1);
        let mut source = source_for(&["a", "b", "c"]);

        let result = ImportRunner::new().run(&mut importer, &mut source).await;

        assert!(matches!(result, Err(ImportError::MissingCategory { .. })));
        // The row before the failure was imported and stays imported
        assert_eq!(importer.seen, vec!["a"]);
    }

    #[tokio::test]
    async fn test_forced_run_ignores_imported_state() {
        let mut importer = ScriptedImporter::new(true);
        let mut source = source_for(&["a"]);

        let summary = ImportRunner::with_skip_imported(false)
            .run(&mut importer, &mut source)
            .await
            .unwrap();

        assert!(!summary.skipped);
        assert_eq!(importer.seen, vec!["a"]);
    }
}
