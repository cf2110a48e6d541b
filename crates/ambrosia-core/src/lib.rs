//! Ambrosia Core - domain model and query vocabulary for the recipe catalog
//!
//! This crate has no database dependency. It provides:
//! - The `User` / `Ingredient` / `Recipe` entity graph exposed upstream
//! - Typed, closed filter descriptors and the filter predicate builder
//! - `QueryContext` carrying cancellation and deadlines into the store
//! - The error facility (`AmError`, `AmErrorKind`, `AmbrosiaError`)
//! - The logging facility (`init`, `log_op_*` macros, test capture)
//! - The access policy collaborator consulted at the catalog boundary

pub mod context;
pub mod errors;
pub mod filter;
pub mod logging_facility;
pub mod model;
pub mod policy;

// Re-export commonly used types
pub use context::{CancelToken, QueryContext};
pub use errors::{AmError, AmErrorKind, AmbrosiaError, Result};
pub use filter::{
    build_predicate, FilterColumn, FilterValue, Filters, IngredientFilter, Predicate,
    RecipeFilter, UserFilter,
};
pub use model::{EntityKind, Ingredient, Recipe, RecipeHeader, User};
pub use policy::{AccessPolicy, AllowAllPolicy, CatalogAction, DenyAllPolicy};
