//! Entity graph exposed to the API layer
//!
//! Field names and nesting are part of the external contract:
//! `User{id, name}`, `Ingredient{id, name, description, owner}` and
//! `Recipe{id, name, description, owner, ingredients[]}`.

pub mod ingredient;
pub mod recipe;
pub mod user;

pub use ingredient::Ingredient;
pub use recipe::{Recipe, RecipeHeader};
pub use user::User;

use serde::{Deserialize, Serialize};

/// The kinds of entity the catalog can fetch, used as error and log context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Ingredient,
    Recipe,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Ingredient => "ingredient",
            EntityKind::Recipe => "recipe",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
