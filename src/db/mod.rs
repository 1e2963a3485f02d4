//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the `DirectoryStorage` query surface

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{ContactMessage, DirectoryEntry, Resource, Subscriber, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{DirectoryStorage, SqlitePool, connect, insert_subscriber_with};
