//! Seed import
//!
//! Provides:
//! - Seed format v1 (users, ingredients, recipes)
//! - YAML parser with validation
//! - Digest canonicalization
//! - Transactional importer

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format::{SeedIngredient, SeedRecipe, SeedUser, SeedV1, SEED_SCHEMA_VERSION};
pub use importer::{import_seed, import_seed_str, ImportSummary};
pub use parser::{
    parse_seed_file, parse_seed_file_with_db, parse_seed_str, parse_seed_str_with_db,
};
