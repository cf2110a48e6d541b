//! Singleton lookup - unique-key fetches with exactly-one cardinality

use crate::errors::Result;
use crate::pool::QueryExecutor;
use crate::query::executor::{fetch_ingredients, fetch_recipe_headers, fetch_recipe_ingredients, fetch_users};
use ambrosia_core::errors::AmbrosiaError;
use ambrosia_core::filter::{Filters, IngredientFilter, RecipeFilter, UserFilter};
use ambrosia_core::model::{EntityKind, Ingredient, Recipe, User};
use ambrosia_core::QueryContext;

/// Enforce that `rows` holds exactly one element
///
/// # Errors
///
/// - `NotFound` when `rows` is empty
/// - `CardinalityViolation` when it holds more than one element
pub fn expect_one<T>(rows: Vec<T>, entity: EntityKind, filter: &str) -> Result<T> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(AmbrosiaError::NotFound {
            entity,
            filter: filter.to_string(),
        }
        .into()),
        (Some(_), count) => Err(AmbrosiaError::MultipleResults {
            entity,
            filter: filter.to_string(),
            count,
        }
        .into()),
    }
}

/// The single ingredient matching a unique predicate
pub fn fetch_one_ingredient<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<IngredientFilter>,
) -> Result<Ingredient> {
    let rows = fetch_ingredients(exec, ctx, filters)?;
    expect_one(rows, EntityKind::Ingredient, &filters.describe())
        .map_err(|e| e.with_op("fetch_one_ingredient"))
}

/// The single recipe matching a unique predicate, ingredients attached
///
/// Cardinality is checked on the headers before any dependent query runs, so
/// a duplicated key never costs more than the header fetch.
pub fn fetch_one_recipe<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<RecipeFilter>,
) -> Result<Recipe> {
    let headers = fetch_recipe_headers(exec, ctx, filters)?;
    let (header, owner) = expect_one(headers, EntityKind::Recipe, &filters.describe())
        .map_err(|e| e.with_op("fetch_one_recipe"))?;

    ctx.check("fetch_recipe_ingredients")
        .map_err(|e| e.with_entity(EntityKind::Recipe).with_entity_id(header.id.as_str()))?;
    let ingredients = fetch_recipe_ingredients(exec, ctx, &header.id)?;
    Ok(header.into_recipe(owner, ingredients))
}

/// The single user matching a unique predicate
pub fn fetch_one_user<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<UserFilter>,
) -> Result<User> {
    let rows = fetch_users(exec, ctx, filters)?;
    expect_one(rows, EntityKind::User, &filters.describe()).map_err(|e| e.with_op("fetch_one_user"))
}

pub fn get_ingredient_by_id<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    id: &str,
) -> Result<Ingredient> {
    let filters = Filters::by(IngredientFilter::IngredientId(id.to_string()));
    fetch_one_ingredient(exec, ctx, &filters).map_err(|e| e.with_entity_id(id))
}

pub fn get_recipe_by_id<E: QueryExecutor>(exec: &E, ctx: &QueryContext, id: &str) -> Result<Recipe> {
    let filters = Filters::by(RecipeFilter::RecipeId(id.to_string()));
    fetch_one_recipe(exec, ctx, &filters).map_err(|e| e.with_entity_id(id))
}

pub fn get_user_by_id<E: QueryExecutor>(exec: &E, ctx: &QueryContext, id: &str) -> Result<User> {
    let filters = Filters::by(UserFilter::UserId(id.to_string()));
    fetch_one_user(exec, ctx, &filters).map_err(|e| e.with_entity_id(id))
}
