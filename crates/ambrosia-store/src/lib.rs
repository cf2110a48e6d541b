//! Ambrosia Store - SQLite-backed recipe catalog
//!
//! Provides:
//! - Connection configuration and a pooled, cancellation-aware query handle
//! - Embedded schema migrations with checksums
//! - Entity queries, relational hydration and unique-key lookups
//! - The `RecipeCatalog` boundary facade (policy check + op logging)
//! - YAML seed import

pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod seed;

// Re-export key types
pub use catalog::RecipeCatalog;
pub use config::{StoreConfig, StoreLocation};
pub use errors::Result;
pub use pool::{QueryExecutor, SqlitePool};
pub use query::hydration::HydrationStrategy;
