//! Category Record Structures
//!
//! The `CategoryRecord` is the business entity behind a catalog category,
//! identified by its unique `category_key`. Display attributes ride along
//! but are irrelevant to hierarchy resolution.
//!
//! During an import run the record also carries the two node references the
//! update collaborator consumes: the placement being rewritten and the
//! resolved parent, both by node id. They are populated right before the
//! update call and never read back from storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ImportRow;

/// Business record of a catalog category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    /// Unique business key (the `UCATID` column of the feed)
    pub category_key: String,

    /// Display name
    pub name: Option<String>,

    /// Catalog image file name
    pub image_name: Option<String>,

    /// Whether the category is live
    pub is_active: bool,

    /// Whether the category appears in navigation menus
    pub is_in_menu: bool,

    /// Whether the category participates in search
    pub is_searchable: bool,

    /// Creation timestamp, set by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification timestamp, set by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Node placement being rewritten, by node id; populated during import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_node_id: Option<i64>,

    /// Resolved parent placement, by node id; populated during import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<i64>,
}

impl CategoryRecord {
    /// Create a record with default attributes for a business key
    pub fn new(category_key: impl Into<String>) -> Self {
        Self {
            category_key: category_key.into(),
            name: None,
            image_name: None,
            is_active: true,
            is_in_menu: true,
            is_searchable: true,
            created_at: None,
            updated_at: None,
            category_node_id: None,
            parent_node_id: None,
        }
    }

    /// Build a record from a feed row's category columns
    ///
    /// Missing columns keep their defaults. During hierarchy import the
    /// stored baseline overlays them anyway (see
    /// [`CategoryRecord::merge_stored`]).
    pub fn from_row(row: &ImportRow) -> Self {
        let mut record = Self::new(row.category_key().unwrap_or_default());
        record.name = row.get_str("name").map(str::to_string);
        record.image_name = row.get_str("imageName").map(str::to_string);
        if let Some(flag) = row.get_bool("isActive") {
            record.is_active = flag;
        }
        if let Some(flag) = row.get_bool("isInMenu") {
            record.is_in_menu = flag;
        }
        if let Some(flag) = row.get_bool("isSearchable") {
            record.is_searchable = flag;
        }
        record
    }

    /// Overlay the values persisted in the store onto this record
    ///
    /// The read-modify step of hierarchy import: every persisted column takes
    /// the stored value, so a feed row never clobbers attributes it does not
    /// own. The node reference fields are left untouched; they are populated
    /// later in the run from resolved placements, never from storage.
    pub fn merge_stored(&mut self, stored: &CategoryRecord) {
        self.category_key = stored.category_key.clone();
        self.name = stored.name.clone();
        self.image_name = stored.image_name.clone();
        self.is_active = stored.is_active;
        self.is_in_menu = stored.is_in_menu;
        self.is_searchable = stored.is_searchable;
        self.created_at = stored.created_at;
        self.updated_at = stored.updated_at;
    }
}
