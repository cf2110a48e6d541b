//! Seed digest canonicalization
//!
//! Entities are sorted by id before hashing, so reordering a seed file keeps
//! its digest. A recipe's ingredient list is not sorted: its order is part of
//! the data.

use crate::errors::Result;
use crate::seed::format::SeedV1;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize)]
struct CanonicalSeed<'a> {
    schema_version: u32,
    users: Vec<CanonicalUser<'a>>,
    ingredients: Vec<CanonicalIngredient<'a>>,
    recipes: Vec<CanonicalRecipe<'a>>,
}

#[derive(Debug, Serialize)]
struct CanonicalUser<'a> {
    id: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CanonicalIngredient<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    owner: &'a str,
}

#[derive(Debug, Serialize)]
struct CanonicalRecipe<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    owner: &'a str,
    ingredients: &'a [String],
}

/// SHA-256 hex digest of the canonicalized seed
pub fn compute_seed_digest(seed: &SeedV1) -> Result<String> {
    let json = serde_json::to_string(&canonicalize_seed(seed))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

fn canonicalize_seed(seed: &SeedV1) -> CanonicalSeed<'_> {
    let mut users: Vec<CanonicalUser<'_>> = seed
        .users
        .iter()
        .map(|u| CanonicalUser {
            id: &u.id,
            name: &u.name,
        })
        .collect();
    users.sort_by(|a, b| a.id.cmp(b.id));

    let mut ingredients: Vec<CanonicalIngredient<'_>> = seed
        .ingredients
        .iter()
        .map(|i| CanonicalIngredient {
            id: &i.id,
            name: &i.name,
            description: &i.description,
            owner: &i.owner,
        })
        .collect();
    ingredients.sort_by(|a, b| a.id.cmp(b.id));

    let mut recipes: Vec<CanonicalRecipe<'_>> = seed
        .recipes
        .iter()
        .map(|r| CanonicalRecipe {
            id: &r.id,
            name: &r.name,
            description: &r.description,
            owner: &r.owner,
            ingredients: &r.ingredients,
        })
        .collect();
    recipes.sort_by(|a, b| a.id.cmp(b.id));

    CanonicalSeed {
        schema_version: seed.schema_version,
        users,
        ingredients,
        recipes,
    }
}
