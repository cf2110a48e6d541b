//! Relational hydrator - assembles recipe graphs
//!
//! Two equivalent strategies:
//! - `PerRecipe`: one header query, then one dependent ingredient query per
//!   recipe. Simple, and fails fast on the first dependent error.
//! - `Joined`: a single LEFT JOIN over recipes, associations, ingredients and
//!   owners, grouped by recipe in memory.
//!
//! Both return recipes in recipe-id order, each with exactly its linked
//! ingredients in association order. Neither ever returns a partial graph.

use crate::errors::Result;
use crate::pool::QueryExecutor;
use crate::query::executor::{fetch_recipe_headers, fetch_recipe_ingredients};
use crate::query::rows::{IngredientRow, RecipeRow};
use ambrosia_core::filter::{Filters, RecipeFilter};
use ambrosia_core::model::{EntityKind, Recipe};
use ambrosia_core::QueryContext;
use std::collections::HashMap;

const JOINED_RECIPE_QUERY: &str = "
    SELECT r.recipe_id, r.name, r.description, ru.user_id, ru.name,
           i.ingredient_id, i.name, i.description, iu.user_id, iu.name
    FROM recipe r
    LEFT JOIN user_account ru ON r.user_id = ru.user_id
    LEFT JOIN recipe_ingredient ri ON ri.recipe_id = r.recipe_id
    LEFT JOIN ingredient i ON ri.ingredient_id = i.ingredient_id
    LEFT JOIN user_account iu ON i.user_id = iu.user_id";

const JOINED_RECIPE_ORDER: &str = " ORDER BY r.recipe_id, ri.rowid";

/// How recipe graphs are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydrationStrategy {
    /// Header query plus one ingredient query per recipe
    #[default]
    PerRecipe,
    /// Single join query grouped in memory
    Joined,
}

/// Fetch fully hydrated recipes using the chosen strategy
pub fn hydrate_recipes<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<RecipeFilter>,
    strategy: HydrationStrategy,
) -> Result<Vec<Recipe>> {
    match strategy {
        HydrationStrategy::PerRecipe => fetch_recipes_with_ingredients(exec, ctx, filters),
        HydrationStrategy::Joined => fetch_recipes_with_ingredients_joined(exec, ctx, filters),
    }
}

/// Fetch recipes matching `filters` and attach each recipe's ingredients
///
/// The context is checked before every dependent fetch, so a cancellation
/// during the dependent phase stops further queries.
///
/// # Errors
///
/// Any failure of the header fetch or of any dependent fetch aborts the whole
/// call; see [`fetch_recipe_headers`] for the error kinds.
pub fn fetch_recipes_with_ingredients<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<RecipeFilter>,
) -> Result<Vec<Recipe>> {
    let headers = fetch_recipe_headers(exec, ctx, filters)?;
    let filter = filters.describe();

    let mut recipes = Vec::with_capacity(headers.len());
    for (header, owner) in headers {
        ctx.check("fetch_recipe_ingredients").map_err(|e| {
            e.with_entity(EntityKind::Recipe)
                .with_entity_id(header.id.as_str())
                .with_filter(filter.as_str())
        })?;

        let ingredients = fetch_recipe_ingredients(exec, ctx, &header.id)?;
        recipes.push(header.into_recipe(owner, ingredients));
    }

    tracing::debug!(
        recipe_count = recipes.len(),
        filter = %filter,
        "hydrated recipes"
    );
    Ok(recipes)
}

/// Single-query equivalent of [`fetch_recipes_with_ingredients`]
///
/// Assumes recipe ids are unique, which the schema's primary key guarantees.
///
/// # Errors
///
/// As for [`fetch_recipes_with_ingredients`].
pub fn fetch_recipes_with_ingredients_joined<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<RecipeFilter>,
) -> Result<Vec<Recipe>> {
    let predicate = filters.predicate();
    let sql = format!(
        "{}{}{}",
        JOINED_RECIPE_QUERY,
        predicate.where_clause(),
        JOINED_RECIPE_ORDER
    );

    let rows = exec
        .query_map(ctx, &sql, predicate.args(), |row| {
            let recipe = RecipeRow::decode(row)?;
            let linked: Option<String> = row.get(5)?;
            let ingredient = match linked {
                Some(_) => Some(IngredientRow::decode(row, 5)?),
                None => None,
            };
            Ok((recipe, ingredient))
        })
        .map_err(|e| {
            e.or_context(
                "fetch_recipes_with_ingredients_joined",
                EntityKind::Recipe,
                &filters.describe(),
            )
        })?;

    let mut recipes: Vec<Recipe> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (recipe_row, ingredient_row) in rows {
        let position = match positions.get(&recipe_row.header.id) {
            Some(&position) => position,
            None => {
                let (header, owner) = recipe_row.into_pair()?;
                positions.insert(header.id.clone(), recipes.len());
                recipes.push(header.into_recipe(owner, Vec::new()));
                recipes.len() - 1
            }
        };

        if let Some(ingredient_row) = ingredient_row {
            let ingredient = ingredient_row.into_ingredient()?;
            recipes[position].ingredients.push(ingredient);
        }
    }

    tracing::debug!(
        recipe_count = recipes.len(),
        filter = %filters.describe(),
        "hydrated recipes (joined)"
    );
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_is_per_recipe() {
        assert_eq!(HydrationStrategy::default(), HydrationStrategy::PerRecipe);
    }

    #[test]
    fn test_joined_query_keeps_association_order() {
        assert!(JOINED_RECIPE_ORDER.ends_with("ri.rowid"));
    }
}
