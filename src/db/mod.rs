//! Database module: models, schema, and the pooled store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows; numeric flag mapping
//!   happens only at this boundary
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the pooled store holding every query and mutation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Admin, Category, Design, DesignInput, DesignWithCategory};
pub use schema::SQLITE_INIT;
pub use sqlite::{GalleryStore, SqlitePool};
