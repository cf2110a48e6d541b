//! Seed format v1
//!
//! Ids are caller-chosen and stable across imports; re-importing a seed
//! updates the rows in place.

use serde::{Deserialize, Serialize};

/// The only schema version this build reads
pub const SEED_SCHEMA_VERSION: u32 = 1;

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedV1 {
    pub schema_version: u32,

    #[serde(default)]
    pub users: Vec<SeedUser>,

    #[serde(default)]
    pub ingredients: Vec<SeedIngredient>,

    #[serde(default)]
    pub recipes: Vec<SeedRecipe>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedIngredient {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Owning user id; must exist in the seed or the store
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedRecipe {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub owner: String,

    /// Linked ingredient ids, in the order the recipe lists them
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_seed() {
        let yaml = r#"
schema_version: 1
users:
  - id: u1
    name: Alice
"#;

        let seed: SeedV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.schema_version, 1);
        assert_eq!(seed.users.len(), 1);
        assert!(seed.ingredients.is_empty());
        assert!(seed.recipes.is_empty());
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let yaml = r#"
schema_version: 1
ingredients:
  - id: i-salt
    name: Salt
    owner: u1
"#;

        let seed: SeedV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.ingredients[0].description, "");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
schema_version: 1
users:
  - id: u1
    name: Alice
    email: alice@example.com
"#;

        assert!(serde_yaml::from_str::<SeedV1>(yaml).is_err());
    }
}
