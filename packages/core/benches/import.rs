//! Import performance benchmarks
//!
//! Measures CSV feed parsing on its own and a full category hierarchy
//! import against a real database file. Run with `cargo bench`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use std::sync::Arc;
use storeseed_core::{
    CategoryHierarchyImporter, CsvRowSource, DatabaseService, DbInsertCategoryParams,
    ImportRunner, RowSource, TursoCatalogStore,
};
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// CSV feed with `rows` category rows sharing one parent key
fn category_feed(rows: usize) -> String {
    let mut feed = String::from("UCATID,parentKey,name\n");
    for i in 0..rows {
        feed.push_str(&format!("cat-{},electronics,Category {}\n", i, i));
    }
    feed
}

async fn seed_bench_category(db: &DatabaseService, key: &str) {
    db.db_insert_category(DbInsertCategoryParams {
        category_key: key,
        name: Some(key),
        image_name: None,
        is_active: true,
        is_in_menu: true,
        is_searchable: true,
    })
    .await
    .unwrap();
}

fn bench_csv_row_parsing(c: &mut Criterion) {
    let feed = category_feed(100);

    c.bench_function("csv_parse_100_rows", |b| {
        b.iter(|| {
            let mut source = CsvRowSource::from_reader(Cursor::new(feed.as_str())).unwrap();
            let mut rows = 0u64;
            while let Some(row) = source.next_row().unwrap() {
                black_box(row);
                rows += 1;
            }
            rows
        })
    });
}

fn bench_category_import(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let row_count = 50;

    // Seed once; every iteration re-runs the import over the same catalog
    let (store, _temp_dir) = rt.block_on(async {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(
            DatabaseService::new(temp_dir.path().join("bench.db"))
                .await
                .unwrap(),
        );

        seed_bench_category(&db, "root").await;
        seed_bench_category(&db, "electronics").await;
        for i in 0..row_count {
            seed_bench_category(&db, &format!("cat-{}", i)).await;
        }

        let root_id = db.db_insert_node("root", None, true, true).await.unwrap();
        db.db_insert_node("electronics", Some(root_id), false, true)
            .await
            .unwrap();
        for i in 0..row_count {
            db.db_insert_node(&format!("cat-{}", i), None, false, true)
                .await
                .unwrap();
        }

        (Arc::new(TursoCatalogStore::new(db)), temp_dir)
    });

    let feed = category_feed(row_count);

    c.bench_function("category_import_50_rows", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut source = CsvRowSource::from_reader(Cursor::new(feed.as_str())).unwrap();
                let mut importer = CategoryHierarchyImporter::new(store.clone(), store.clone());
                ImportRunner::with_skip_imported(false)
                    .run(&mut importer, &mut source)
                    .await
                    .unwrap()
            })
        })
    });
}

criterion_group!(benches, bench_csv_row_parsing, bench_category_import);
criterion_main!(benches);
