//! Schema migration command
//!
//! Usage: ambrosia migrate

use super::{print_json, StoreArgs};
use ambrosia_store::migrations::applied_migrations;
use serde_json::json;

pub fn execute(store: &StoreArgs) -> anyhow::Result<()> {
    let pool = store.open()?;
    let applied = pool.with_connection(|conn| applied_migrations(conn))?;

    print_json(&json!({
        "database": store.db.display().to_string(),
        "applied_migrations": applied,
    }))
}
