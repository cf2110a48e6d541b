use serde::{Deserialize, Serialize};

use super::ingredient::Ingredient;
use super::user::User;

/// A recipe row as stored, before its owner and ingredients are attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeHeader {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl RecipeHeader {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Promote the header into a full recipe graph
    pub fn into_recipe(self, owner: User, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            description: self.description,
            owner,
            ingredients,
        }
    }
}

/// A fully hydrated recipe graph
///
/// `ingredients` holds exactly the ingredients linked to this recipe, in the
/// order the association rows were read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: User,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Check whether an ingredient with the given id is attached
    pub fn has_ingredient(&self, ingredient_id: &str) -> bool {
        self.ingredients.iter().any(|i| i.id == ingredient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_recipe_keeps_ingredient_order() {
        let alice = User::new("u1", "Alice");
        let bob = User::new("u2", "Bob");
        let header = RecipeHeader::new("abc-123", "Pancakes", "Fluffy");

        let recipe = header.into_recipe(
            alice.clone(),
            vec![
                Ingredient::new("i-flour", "Flour", "", alice.clone()),
                Ingredient::new("i-milk", "Milk", "", bob),
            ],
        );

        assert_eq!(recipe.owner, alice);
        let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Milk"]);
        assert!(recipe.has_ingredient("i-milk"));
        assert!(!recipe.has_ingredient("i-eggs"));
    }

    #[test]
    fn test_serialized_field_names() {
        let owner = User::new("u1", "Alice");
        let recipe = RecipeHeader::new("r1", "Toast", "").into_recipe(
            owner.clone(),
            vec![Ingredient::new("i1", "Bread", "Sourdough", owner)],
        );

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["id"], "r1");
        assert_eq!(json["owner"]["id"], "u1");
        assert_eq!(json["owner"]["name"], "Alice");
        assert_eq!(json["ingredients"][0]["name"], "Bread");
        assert_eq!(json["ingredients"][0]["owner"]["id"], "u1");
    }
}
