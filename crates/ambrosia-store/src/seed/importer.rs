//! Seed importer
//!
//! Imports a validated seed in a single transaction: users, then ingredients,
//! then recipes with their ingredient links. Rows are upserted by id. A
//! recipe's links are replaced wholesale so their insertion order matches the
//! seed's listing order.

use crate::errors::{from_rusqlite, Result};
use crate::seed::format::SeedV1;
use crate::seed::{compute_seed_digest, parse_seed_file_with_db, parse_seed_str_with_db};
use rusqlite::{params, Connection, Transaction};
use serde::Serialize;
use std::path::Path;

/// What an import wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub seed_digest: String,
    pub users: usize,
    pub ingredients: usize,
    pub recipes: usize,
    pub links: usize,
}

/// Import a seed file into the database
///
/// References missing from the seed are resolved against rows already in the
/// store. Nothing is written unless the whole seed imports.
///
/// # Errors
///
/// - `Io`: the file could not be read
/// - `SeedValidation`: the seed failed to parse or validate
/// - `Persistence`: a write failed; the transaction is rolled back
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_file_with_db(path, Some(&*conn))?;
    import_parsed(&seed, conn)
}

/// Import seed YAML held in memory
pub fn import_seed_str(content: &str, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_str_with_db(content, Some(&*conn))?;
    import_parsed(&seed, conn)
}

fn import_parsed(seed: &SeedV1, conn: &mut Connection) -> Result<ImportSummary> {
    let seed_digest = compute_seed_digest(seed)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    upsert_users(&tx, seed)?;
    upsert_ingredients(&tx, seed)?;
    let links = upsert_recipes(&tx, seed)?;

    let summary = ImportSummary {
        seed_digest,
        users: seed.users.len(),
        ingredients: seed.ingredients.len(),
        recipes: seed.recipes.len(),
        links,
    };
    record_import(&tx, &summary)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        seed_digest = %summary.seed_digest,
        users = summary.users,
        ingredients = summary.ingredients,
        recipes = summary.recipes,
        "seed imported"
    );
    Ok(summary)
}

fn upsert_users(tx: &Transaction<'_>, seed: &SeedV1) -> Result<()> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO user_account (user_id, name) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET name = excluded.name",
        )
        .map_err(from_rusqlite)?;

    for user in &seed.users {
        stmt.execute(params![user.id, user.name])
            .map_err(from_rusqlite)?;
    }
    Ok(())
}

fn upsert_ingredients(tx: &Transaction<'_>, seed: &SeedV1) -> Result<()> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO ingredient (ingredient_id, name, description, user_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(ingredient_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                user_id = excluded.user_id",
        )
        .map_err(from_rusqlite)?;

    for ingredient in &seed.ingredients {
        stmt.execute(params![
            ingredient.id,
            ingredient.name,
            ingredient.description,
            ingredient.owner
        ])
        .map_err(from_rusqlite)?;
    }
    Ok(())
}

/// Upsert recipes and replace their links; returns the number of links written
fn upsert_recipes(tx: &Transaction<'_>, seed: &SeedV1) -> Result<usize> {
    let mut upsert = tx
        .prepare(
            "INSERT INTO recipe (recipe_id, name, description, user_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(recipe_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                user_id = excluded.user_id",
        )
        .map_err(from_rusqlite)?;
    let mut unlink = tx
        .prepare("DELETE FROM recipe_ingredient WHERE recipe_id = ?1")
        .map_err(from_rusqlite)?;
    let mut link = tx
        .prepare("INSERT INTO recipe_ingredient (recipe_id, ingredient_id) VALUES (?1, ?2)")
        .map_err(from_rusqlite)?;

    let mut links = 0;
    for recipe in &seed.recipes {
        upsert
            .execute(params![
                recipe.id,
                recipe.name,
                recipe.description,
                recipe.owner
            ])
            .map_err(from_rusqlite)?;

        unlink.execute([&recipe.id]).map_err(from_rusqlite)?;
        for ingredient_id in &recipe.ingredients {
            link.execute([&recipe.id, ingredient_id])
                .map_err(from_rusqlite)?;
            links += 1;
        }
    }
    Ok(links)
}

fn record_import(tx: &Transaction<'_>, summary: &ImportSummary) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO seed_import
            (seed_digest, imported_at, user_count, ingredient_count, recipe_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            summary.seed_digest,
            now,
            summary.users as i64,
            summary.ingredients as i64,
            summary.recipes as i64
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use ambrosia_core::errors::AmErrorKind;
    use std::path::PathBuf;

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_import_pancakes_seed() {
        let mut conn = setup_test_db();

        let summary = import_seed(&fixtures_dir().join("seed_pancakes.yaml"), &mut conn).unwrap();

        assert_eq!(summary.users, 2);
        assert_eq!(summary.ingredients, 3);
        assert_eq!(summary.recipes, 1);
        assert_eq!(summary.links, 2);
        assert_eq!(count(&conn, "recipe_ingredient"), 2);
        assert_eq!(count(&conn, "seed_import"), 1);
    }

    #[test]
    fn test_reimport_updates_in_place() {
        let mut conn = setup_test_db();
        let path = fixtures_dir().join("seed_pancakes.yaml");

        let first = import_seed(&path, &mut conn).unwrap();
        let second = import_seed(&path, &mut conn).unwrap();

        assert_eq!(first.seed_digest, second.seed_digest);
        assert_eq!(count(&conn, "ingredient"), 3);
        assert_eq!(count(&conn, "recipe_ingredient"), 2);
        assert_eq!(count(&conn, "seed_import"), 2);
    }

    #[test]
    fn test_invalid_seed_writes_nothing() {
        let mut conn = setup_test_db();

        let err = import_seed(
            &fixtures_dir().join("seed_invalid_owner.yaml"),
            &mut conn,
        )
        .unwrap_err();

        assert_eq!(err.kind(), AmErrorKind::SeedValidation);
        assert_eq!(count(&conn, "user_account"), 0);
        assert_eq!(count(&conn, "seed_import"), 0);
    }

    #[test]
    fn test_follow_up_seed_links_existing_rows() {
        let mut conn = setup_test_db();
        import_seed(&fixtures_dir().join("seed_pancakes.yaml"), &mut conn).unwrap();

        let follow_up = r#"
schema_version: 1
recipes:
  - id: r-crepes
    name: Crepes
    owner: u2
    ingredients: [i-milk, i-flour]
"#;
        let summary = import_seed_str(follow_up, &mut conn).unwrap();

        assert_eq!(summary.recipes, 1);
        assert_eq!(count(&conn, "recipe"), 2);
        assert_eq!(count(&conn, "recipe_ingredient"), 4);
    }
}
