//! Migration framework
//!
//! - Embedded SQL migrations applied in order, each in its own transaction
//! - Idempotent re-application
//! - Checksums recorded at apply time and verified on every later run

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
