//! Closed filter descriptors, one per entity
//!
//! Each variant names exactly one filterable column of the base query for
//! that entity, so only known column names can ever reach the predicate text.

use super::{FilterColumn, FilterValue};

/// Filterable columns of the ingredient base query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientFilter {
    IngredientId(String),
    Name(String),
    OwnerId(String),
}

impl FilterColumn for IngredientFilter {
    fn column(&self) -> &'static str {
        match self {
            IngredientFilter::IngredientId(_) => "i.ingredient_id",
            IngredientFilter::Name(_) => "i.name",
            IngredientFilter::OwnerId(_) => "i.user_id",
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            IngredientFilter::IngredientId(v)
            | IngredientFilter::Name(v)
            | IngredientFilter::OwnerId(v) => FilterValue::Text(v.clone()),
        }
    }
}

/// Filterable columns of the recipe base query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeFilter {
    RecipeId(String),
    Name(String),
    OwnerId(String),
}

impl FilterColumn for RecipeFilter {
    fn column(&self) -> &'static str {
        match self {
            RecipeFilter::RecipeId(_) => "r.recipe_id",
            RecipeFilter::Name(_) => "r.name",
            RecipeFilter::OwnerId(_) => "r.user_id",
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            RecipeFilter::RecipeId(v) | RecipeFilter::Name(v) | RecipeFilter::OwnerId(v) => {
                FilterValue::Text(v.clone())
            }
        }
    }
}

/// Filterable columns of the user base query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    UserId(String),
    Name(String),
}

impl FilterColumn for UserFilter {
    fn column(&self) -> &'static str {
        match self {
            UserFilter::UserId(_) => "u.user_id",
            UserFilter::Name(_) => "u.name",
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            UserFilter::UserId(v) | UserFilter::Name(v) => FilterValue::Text(v.clone()),
        }
    }
}
