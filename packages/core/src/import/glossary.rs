//! Glossary translation importer
//!
//! Seeds glossary keys and their per-locale translations from a JSON feed.
//! Rows map glossary keys to payload objects; each payload carries a
//! `translations` map of locale name to text.
//!
//! Existing translations are never overwritten: the importer only fills
//! gaps, so locally edited texts survive a re-run.

use crate::db::GlossaryStore;
use crate::import::error::ImportError;
use crate::import::Importer;
use crate::models::ImportRow;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Payload field holding the locale-to-text map
const TRANSLATIONS: &str = "translations";

/// Importer for the glossary translation feed
pub struct GlossaryTranslationImporter {
    glossary_store: Arc<dyn GlossaryStore>,
}

impl GlossaryTranslationImporter {
    pub fn new(glossary_store: Arc<dyn GlossaryStore>) -> Self {
        Self { glossary_store }
    }

    /// Create the translations a key's payload names and the store lacks
    async fn import_translations(
        &self,
        glossary_key: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ImportError> {
        let translations = match payload.get(TRANSLATIONS).and_then(|v| v.as_object()) {
            Some(map) => map,
            None => return Ok(()),
        };

        for (locale_name, text) in translations {
            let text = match text.as_str() {
                Some(text) => text,
                None => continue,
            };

            if self
                .glossary_store
                .has_translation(glossary_key, locale_name)
                .await?
            {
                continue;
            }

            self.glossary_store
                .create_translation(glossary_key, locale_name, text, true)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Importer for GlossaryTranslationImporter {
    fn title(&self) -> &str {
        "Translation"
    }

    /// Reports imported as soon as any glossary key exists
    async fn is_already_imported(&self) -> Result<bool, ImportError> {
        let keys = self.glossary_store.count_keys().await?;
        Ok(keys > 0)
    }

    /// One feed row carries many glossary keys, each with its payload
    async fn import_row(&mut self, row: &ImportRow) -> Result<(), ImportError> {
        for (glossary_key, payload) in row.iter() {
            if !self.glossary_store.has_key(glossary_key).await? {
                self.glossary_store.create_key(glossary_key).await?;
            }

            self.import_translations(glossary_key, payload).await?;
        }

        debug!(keys = row.len(), "Imported glossary row");
        Ok(())
    }
}
