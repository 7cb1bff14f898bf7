//! Database Layer
//!
//! This module handles all database interactions using Turso (libsql):
//!
//! - Database initialization and connection management
//! - Schema creation for categories, tree placements, and glossary tables
//! - Store trait abstractions consumed by the import layer
//!
//! # Architecture
//!
//! Storeseed uses an embedded libsql database as its only backend:
//!
//! - Single-file deployment (no external services)
//! - WAL mode for concurrent readers during imports
//! - Foreign keys for referential integrity between categories and placements
//!
//! The import layer never touches SQL directly; it goes through the
//! `CategoryStore`, `CategoryNodeStore`, and `GlossaryStore` traits, with
//! `TursoCatalogStore` as the production implementation.

mod catalog_store;
mod database;
mod error;
mod turso_store;

pub use catalog_store::{CategoryNodeStore, CategoryStore, GlossaryStore};
pub use database::{DatabaseService, DbInsertCategoryParams, DbUpdateCategoryParams};
pub use error::DatabaseError;
pub use turso_store::TursoCatalogStore;
