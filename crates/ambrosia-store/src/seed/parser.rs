//! Seed parser with validation
//!
//! Parses YAML and validates the schema version, id uniqueness and that
//! every owner and ingredient reference resolves.

use crate::errors::{from_rusqlite, io_error, seed_validation, Result};
use crate::seed::format::{SeedV1, SEED_SCHEMA_VERSION};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedV1> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file, resolving references missing from the seed against `conn`
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<SeedV1> {
    let content = fs::read_to_string(path).map_err(|e| io_error("seed_read", e))?;
    parse_seed_str_with_db(&content, conn)
}

pub fn parse_seed_str(content: &str) -> Result<SeedV1> {
    parse_seed_str_with_db(content, None)
}

/// Parse a seed from a string, resolving references missing from the seed against `conn`
pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<SeedV1> {
    let seed: SeedV1 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(format!("YAML parse error: {}", e)))?;

    validate_seed(&seed, conn)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedV1, conn: Option<&Connection>) -> Result<()> {
    if seed.schema_version != SEED_SCHEMA_VERSION {
        return Err(seed_validation(format!(
            "Unsupported schema_version: {}. Expected {}",
            seed.schema_version, SEED_SCHEMA_VERSION
        )));
    }

    let user_ids = unique_ids("user", seed.users.iter().map(|u| (&u.id, &u.name)))?;
    let ingredient_ids = unique_ids(
        "ingredient",
        seed.ingredients.iter().map(|i| (&i.id, &i.name)),
    )?;
    unique_ids("recipe", seed.recipes.iter().map(|r| (&r.id, &r.name)))?;

    for ingredient in &seed.ingredients {
        if !user_ids.contains(ingredient.owner.as_str())
            && !exists_in_store(conn, "user_account", "user_id", &ingredient.owner)?
        {
            return Err(seed_validation(format!(
                "Ingredient {} references non-existent owner: {}",
                ingredient.id, ingredient.owner
            )));
        }
    }

    for recipe in &seed.recipes {
        if !user_ids.contains(recipe.owner.as_str())
            && !exists_in_store(conn, "user_account", "user_id", &recipe.owner)?
        {
            return Err(seed_validation(format!(
                "Recipe {} references non-existent owner: {}",
                recipe.id, recipe.owner
            )));
        }

        let mut linked = HashSet::new();
        for ingredient_id in &recipe.ingredients {
            if !linked.insert(ingredient_id.as_str()) {
                return Err(seed_validation(format!(
                    "Recipe {} lists ingredient {} twice",
                    recipe.id, ingredient_id
                )));
            }
            if !ingredient_ids.contains(ingredient_id.as_str())
                && !exists_in_store(conn, "ingredient", "ingredient_id", ingredient_id)?
            {
                return Err(seed_validation(format!(
                    "Recipe {} references non-existent ingredient: {}",
                    recipe.id, ingredient_id
                )));
            }
        }
    }

    Ok(())
}

/// Collect ids, rejecting blanks and duplicates
fn unique_ids<'a, I>(kind: &str, entries: I) -> Result<HashSet<&'a str>>
where
    I: Iterator<Item = (&'a String, &'a String)>,
{
    let mut ids = HashSet::new();
    for (id, name) in entries {
        if id.trim().is_empty() {
            return Err(seed_validation(format!("Empty {} id", kind)));
        }
        if name.trim().is_empty() {
            return Err(seed_validation(format!("Empty name for {} {}", kind, id)));
        }
        if !ids.insert(id.as_str()) {
            return Err(seed_validation(format!("Duplicate {} id: {}", kind, id)));
        }
    }
    Ok(ids)
}

fn exists_in_store(conn: Option<&Connection>, table: &str, column: &str, id: &str) -> Result<bool> {
    let Some(conn) = conn else {
        return Ok(false);
    };

    let sql = format!("SELECT 1 FROM {} WHERE {} = ?1", table, column);
    let found: Option<i64> = conn
        .query_row(&sql, [id], |row| row.get(0))
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}
