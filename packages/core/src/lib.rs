//! Storeseed Core Import Layer
//!
//! This crate provides the batch seed-import logic for the storeseed catalog:
//! the importers themselves, the run driver that feeds them, the row sources
//! they consume, and the libsql-backed store they write through.
//!
//! # Architecture
//!
//! - **Importer seam**: concrete importers implement the [`import::Importer`]
//!   trait and are composed by [`import::ImportRunner`]
//! - **Narrow store traits**: importers depend on small query/update traits,
//!   not on the engine, so behavior contracts stay verifiable against fakes
//! - **libsql/Turso**: embedded SQLite-compatible database behind
//!   [`db::DatabaseService`]
//! - **Run-scoped state**: lookup caches live on importer instances and die
//!   with the run; nothing import-related is process-wide
//!
//! # Modules
//!
//! - [`models`] - Data structures (CategoryRecord, CategoryNode, ImportRow)
//! - [`import`] - Importer trait, concrete importers, run driver, row sources
//! - [`db`] - Database layer with libsql integration
//! - [`config`] - Import run configuration

pub mod config;
pub mod db;
pub mod import;
pub mod models;

// Re-export commonly used types
pub use config::ImportConfig;
pub use db::*;
pub use import::*;
pub use models::*;
