//! Storeseed command line importer
//!
//! Seeds a catalog database from feed files:
//!
//! ```text
//! storeseed [config.json]
//! ```
//!
//! Configuration is read from the JSON file given as the first argument,
//! falling back to defaults when omitted.
//!
//! # Environment Variables
//!
//! - `STORESEED_DB`: overrides the configured database path
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use storeseed_core::{
    CategoryHierarchyImporter, CsvRowSource, DatabaseService, GlossaryTranslationImporter,
    ImportConfig, ImportRunner, ImportSummary, JsonRowSource, TursoCatalogStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => ImportConfig::from_file(&path)?,
        None => ImportConfig::default(),
    };

    if let Ok(db_path) = std::env::var("STORESEED_DB") {
        config.database_path = PathBuf::from(db_path);
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    info!(database_path = %config.database_path.display(), "Opening catalog database");

    let db = Arc::new(
        DatabaseService::new(config.database_path.clone())
            .await
            .context("Failed to open catalog database")?,
    );
    let store = Arc::new(TursoCatalogStore::new(db));

    let runner = ImportRunner::with_skip_imported(config.skip_imported);
    let mut ran_any = false;

    if let Some(feed) = &config.glossary_feed {
        let mut source = JsonRowSource::open(feed)?;
        let mut importer = GlossaryTranslationImporter::new(store.clone());
        let summary = runner.run(&mut importer, &mut source).await?;
        report(&summary);
        ran_any = true;
    }

    if let Some(feed) = &config.category_feed {
        let mut source = CsvRowSource::open(feed)?;
        let mut importer = CategoryHierarchyImporter::new(store.clone(), store.clone());
        let summary = runner.run(&mut importer, &mut source).await?;
        report(&summary);
        ran_any = true;
    }

    if !ran_any {
        warn!("No feeds configured, nothing to import");
    }

    Ok(())
}

fn report(summary: &ImportSummary) {
    if summary.skipped {
        info!(title = %summary.title, "Feed skipped, store already imported");
    } else {
        info!(
            title = %summary.title,
            rows_imported = summary.rows_imported,
            "Feed imported"
        );
    }
}
