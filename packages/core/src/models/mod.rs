//! Data Models
//!
//! This module contains the core data structures of the import domain:
//!
//! - `CategoryRecord` - business record of a catalog category
//! - `CategoryNode` - a placement of a category within the hierarchy tree
//! - `ImportRow` - one unit of feed input
//!
//! Records and nodes are seeded by an earlier catalog phase; imports read
//! them back, resolve tree links, and write updates through the store layer.

mod category;
mod node;
mod row;

pub use category::CategoryRecord;
pub use node::CategoryNode;
pub use row::ImportRow;
