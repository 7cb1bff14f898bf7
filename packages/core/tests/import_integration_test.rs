//! Integration tests for seed imports against a real catalog database
//!
//! Coverage:
//! - Schema initialization and reopening an existing database file
//! - Category store roundtrips (insert, find, update, parent relink)
//! - Full category hierarchy import from a CSV feed
//! - Glossary import and re-run idempotence
//! - Fatal error propagation when the store has no root placement

use anyhow::Result;
use std::io::Cursor;
use std::sync::Arc;
use storeseed_core::{
    CategoryHierarchyImporter, CategoryNodeStore, CategoryRecord, CategoryStore, CsvRowSource,
    DatabaseService, DbInsertCategoryParams, GlossaryStore, GlossaryTranslationImporter,
    ImportError, ImportRunner, JsonRowSource, TursoCatalogStore,
};
use tempfile::TempDir;

// ============================================================================
// Test Environment
// ============================================================================

/// Create a DatabaseService backed by a temporary file
///
/// The TempDir must stay alive for the duration of the test.
async fn create_test_db() -> Result<(Arc<DatabaseService>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db = Arc::new(DatabaseService::new(db_path).await?);
    Ok((db, temp_dir))
}

/// Insert a category record with default flags
async fn seed_category(db: &DatabaseService, category_key: &str, name: &str) -> Result<()> {
    db.db_insert_category(DbInsertCategoryParams {
        category_key,
        name: Some(name),
        image_name: None,
        is_active: true,
        is_in_menu: true,
        is_searchable: true,
    })
    .await?;
    Ok(())
}

/// Root placement plus linked and orphaned categories, returning the node ids
///
/// Layout: root, electronics (linked under root), shoes and sneakers
/// (main placements without a parent link).
async fn seed_catalog(db: &DatabaseService) -> Result<(i64, i64, i64, i64)> {
    seed_category(db, "root", "Root").await?;
    seed_category(db, "electronics", "Electronics").await?;
    seed_category(db, "shoes", "Shoes").await?;
    seed_category(db, "sneakers", "Sneakers").await?;

    let root_id = db.db_insert_node("root", None, true, true).await?;
    let electronics_id = db
        .db_insert_node("electronics", Some(root_id), false, true)
        .await?;
    let shoes_id = db.db_insert_node("shoes", None, false, true).await?;
    let sneakers_id = db.db_insert_node("sneakers", None, false, true).await?;

    Ok((root_id, electronics_id, shoes_id, sneakers_id))
}

// ============================================================================
// Database Setup
// ============================================================================

#[tokio::test]
async fn test_schema_survives_reopen() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    seed_category(&db, "shoes", "Shoes").await?;
    let db_path = db.db_path.clone();
    drop(db);

    let reopened = DatabaseService::new(db_path).await?;
    let row = reopened.db_find_category_by_key("shoes").await?;
    assert!(row.is_some());

    Ok(())
}

// ============================================================================
// Category Store
// ============================================================================

#[tokio::test]
async fn test_category_store_roundtrip() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = TursoCatalogStore::new(db.clone());

    seed_category(&db, "shoes", "Shoes").await?;

    let mut record = store
        .find_category_by_key("shoes")
        .await?
        .expect("seeded category should exist");
    assert_eq!(record.name.as_deref(), Some("Shoes"));
    assert!(record.is_active);
    assert!(record.created_at.is_some());

    record.name = Some("Sport Shoes".to_string());
    record.is_in_menu = false;
    store.update_category(&record).await?;

    let updated = store
        .find_category_by_key("shoes")
        .await?
        .expect("updated category should exist");
    assert_eq!(updated.name.as_deref(), Some("Sport Shoes"));
    assert!(!updated.is_in_menu);
    assert!(updated.updated_at.is_some());

    Ok(())
}

#[tokio::test]
async fn test_update_for_unknown_category_rejected() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = TursoCatalogStore::new(db);

    let record = CategoryRecord::new("ghost");
    let result = store.update_category(&record).await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_update_with_node_references_relinks_placement() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = TursoCatalogStore::new(db.clone());
    let (root_id, _, shoes_id, _) = seed_catalog(&db).await?;

    let mut record = store
        .find_category_by_key("shoes")
        .await?
        .expect("seeded category should exist");
    record.category_node_id = Some(shoes_id);
    record.parent_node_id = Some(root_id);
    store.update_category(&record).await?;

    let node = store
        .find_main_node_by_category_key("shoes")
        .await?
        .expect("shoes placement should exist");
    assert_eq!(node.parent_node_id, Some(root_id));

    Ok(())
}

// ============================================================================
// Node Store
// ============================================================================

#[tokio::test]
async fn test_node_store_queries() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = TursoCatalogStore::new(db.clone());
    let (root_id, _electronics_id, shoes_id, _sneakers_id) = seed_catalog(&db).await?;

    let root = store
        .find_root_node()
        .await?
        .expect("root placement should exist");
    assert_eq!(root.id, root_id);
    assert!(root.is_root);

    // shoes and sneakers are still unlinked
    assert_eq!(store.count_orphan_nodes().await?, 2);

    let shoes = store
        .find_main_node_by_category_key("shoes")
        .await?
        .expect("shoes placement should exist");
    assert_eq!(shoes.id, shoes_id);
    assert_eq!(shoes.parent_node_id, None);

    // A second main placement for the same category
    let second_id = db.db_insert_node("shoes", Some(root_id), false, true).await?;
    let placements = store.find_main_nodes_by_category_key("shoes").await?;
    assert_eq!(placements.len(), 2);
    assert!(placements.iter().any(|n| n.id == second_id));

    Ok(())
}

// ============================================================================
// Category Hierarchy Import
// ============================================================================

#[tokio::test]
async fn test_category_feed_import_links_placements() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = Arc::new(TursoCatalogStore::new(db.clone()));
    let (_root_id, electronics_id, shoes_id, _sneakers_id) = seed_catalog(&db).await?;

    let feed = "UCATID,parentKey,name\n\
                shoes,electronics,Feed Shoes\n\
                sneakers,shoes,Feed Sneakers\n";
    let mut source = CsvRowSource::from_reader(Cursor::new(feed))?;
    let mut importer = CategoryHierarchyImporter::new(store.clone(), store.clone());

    let summary = ImportRunner::new().run(&mut importer, &mut source).await?;
    assert!(!summary.skipped);
    assert_eq!(summary.rows_imported, 2);

    let shoes = store
        .find_main_node_by_category_key("shoes")
        .await?
        .expect("shoes placement should exist");
    assert_eq!(shoes.parent_node_id, Some(electronics_id));

    let sneakers = store
        .find_main_node_by_category_key("sneakers")
        .await?
        .expect("sneakers placement should exist");
    assert_eq!(sneakers.parent_node_id, Some(shoes_id));

    // Stored attributes win over feed values
    let record = store
        .find_category_by_key("shoes")
        .await?
        .expect("shoes category should exist");
    assert_eq!(record.name.as_deref(), Some("Shoes"));

    // With every placement linked, a re-run is skipped
    let mut rerun_source = CsvRowSource::from_reader(Cursor::new(feed))?;
    let mut rerun_importer = CategoryHierarchyImporter::new(store.clone(), store.clone());
    let rerun = ImportRunner::new()
        .run(&mut rerun_importer, &mut rerun_source)
        .await?;
    assert!(rerun.skipped);

    Ok(())
}

#[tokio::test]
async fn test_import_without_root_placement_is_fatal() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = Arc::new(TursoCatalogStore::new(db.clone()));

    seed_category(&db, "shoes", "Shoes").await?;
    db.db_insert_node("shoes", None, false, true).await?;

    let feed = "UCATID,parentKey\nshoes,electronics\n";
    let mut source = CsvRowSource::from_reader(Cursor::new(feed))?;
    let mut importer = CategoryHierarchyImporter::new(store.clone(), store.clone());

    let result = ImportRunner::new().run(&mut importer, &mut source).await;
    assert!(matches!(result, Err(ImportError::MissingRootNode)));

    // The failed row wrote nothing
    let shoes = store
        .find_main_node_by_category_key("shoes")
        .await?
        .expect("shoes placement should exist");
    assert_eq!(shoes.parent_node_id, None);

    Ok(())
}

// ============================================================================
// Glossary Import
// ============================================================================

#[tokio::test]
async fn test_glossary_import_is_idempotent() -> Result<()> {
    let (db, _temp_dir) = create_test_db().await?;
    let store = Arc::new(TursoCatalogStore::new(db.clone()));

    let feed = r#"[
        {
            "checkout.title": { "translations": { "en_US": "Checkout", "de_DE": "Kasse" } },
            "cart.empty": { "translations": { "en_US": "Your cart is empty" } }
        }
    ]"#;

    let mut source = JsonRowSource::from_text(feed)?;
    let mut importer = GlossaryTranslationImporter::new(store.clone());
    let summary = ImportRunner::new().run(&mut importer, &mut source).await?;

    assert!(!summary.skipped);
    assert_eq!(summary.rows_imported, 1);
    assert_eq!(store.count_keys().await?, 2);
    assert_eq!(db.db_count_glossary_translations().await?, 3);
    assert!(store.has_translation("checkout.title", "en_US").await?);

    // A default re-run is skipped because keys exist
    let mut source = JsonRowSource::from_text(feed)?;
    let mut importer = GlossaryTranslationImporter::new(store.clone());
    let rerun = ImportRunner::new().run(&mut importer, &mut source).await?;
    assert!(rerun.skipped);

    // Even a forced re-run creates nothing new
    let mut source = JsonRowSource::from_text(feed)?;
    let mut importer = GlossaryTranslationImporter::new(store.clone());
    let forced = ImportRunner::with_skip_imported(false)
        .run(&mut importer, &mut source)
        .await?;
    assert!(!forced.skipped);
    assert_eq!(store.count_keys().await?, 2);
    assert_eq!(db.db_count_glossary_translations().await?, 3);

    Ok(())
}
