//! Entity query executor
//!
//! Each fetch appends the filter predicate to a fixed base query joining the
//! entity to its owning user, runs it through a `QueryExecutor` and decodes
//! every row. Rows are ordered by primary key so repeated calls see the same
//! order; dependent ingredient lists follow association insertion order.

use crate::errors::Result;
use crate::pool::QueryExecutor;
use crate::query::rows::{decode_user, IngredientRow, RecipeRow};
use ambrosia_core::filter::{FilterValue, Filters, IngredientFilter, RecipeFilter, UserFilter};
use ambrosia_core::model::{EntityKind, Ingredient, RecipeHeader, User};
use ambrosia_core::QueryContext;

const INGREDIENT_QUERY: &str = "
    SELECT i.ingredient_id, i.name, i.description, iu.user_id, iu.name
    FROM ingredient i
    LEFT JOIN user_account iu ON i.user_id = iu.user_id";

const INGREDIENT_ORDER: &str = " ORDER BY i.ingredient_id";

const RECIPE_QUERY: &str = "
    SELECT r.recipe_id, r.name, r.description, ru.user_id, ru.name
    FROM recipe r
    LEFT JOIN user_account ru ON r.user_id = ru.user_id";

const RECIPE_ORDER: &str = " ORDER BY r.recipe_id";

const USER_QUERY: &str = "
    SELECT u.user_id, u.name
    FROM user_account u";

const USER_ORDER: &str = " ORDER BY u.user_id";

const RECIPE_INGREDIENTS_QUERY: &str = "
    SELECT i.ingredient_id, i.name, i.description, iu.user_id, iu.name
    FROM recipe_ingredient ri
    JOIN ingredient i ON ri.ingredient_id = i.ingredient_id
    LEFT JOIN user_account iu ON i.user_id = iu.user_id
    WHERE ri.recipe_id = $1
    ORDER BY ri.rowid";

/// Fetch ingredients matching `filters`, each with its owning user
///
/// An empty filter set returns every ingredient.
///
/// # Errors
///
/// - `Cancelled` / `DeadlineExceeded`: `ctx` finished mid-fetch
/// - `Decode`: a row could not be decoded (no partial result is returned)
/// - `IntegrityViolation`: an ingredient references a missing user
/// - `Persistence`: the query failed
pub fn fetch_ingredients<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<IngredientFilter>,
) -> Result<Vec<Ingredient>> {
    let predicate = filters.predicate();
    let sql = format!(
        "{}{}{}",
        INGREDIENT_QUERY,
        predicate.where_clause(),
        INGREDIENT_ORDER
    );

    let ingredients: Vec<Ingredient> = exec
        .query_map(ctx, &sql, predicate.args(), |row| IngredientRow::decode(row, 0))
        .and_then(|rows| rows.into_iter().map(IngredientRow::into_ingredient).collect())
        .map_err(|e| {
            e.or_context(
                "fetch_ingredients",
                EntityKind::Ingredient,
                &filters.describe(),
            )
        })?;

    tracing::debug!(
        row_count = ingredients.len(),
        filter = %filters.describe(),
        "fetched ingredients"
    );
    Ok(ingredients)
}

/// Fetch recipe headers matching `filters`, each paired with its owning user
///
/// # Errors
///
/// As for [`fetch_ingredients`].
pub fn fetch_recipe_headers<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<RecipeFilter>,
) -> Result<Vec<(RecipeHeader, User)>> {
    let predicate = filters.predicate();
    let sql = format!(
        "{}{}{}",
        RECIPE_QUERY,
        predicate.where_clause(),
        RECIPE_ORDER
    );

    let headers: Vec<(RecipeHeader, User)> = exec
        .query_map(ctx, &sql, predicate.args(), RecipeRow::decode)
        .and_then(|rows| rows.into_iter().map(RecipeRow::into_pair).collect())
        .map_err(|e| {
            e.or_context(
                "fetch_recipe_headers",
                EntityKind::Recipe,
                &filters.describe(),
            )
        })?;

    tracing::debug!(
        row_count = headers.len(),
        filter = %filters.describe(),
        "fetched recipe headers"
    );
    Ok(headers)
}

/// Fetch users matching `filters`
///
/// # Errors
///
/// As for [`fetch_ingredients`], minus the integrity check.
pub fn fetch_users<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    filters: &Filters<UserFilter>,
) -> Result<Vec<User>> {
    let predicate = filters.predicate();
    let sql = format!("{}{}{}", USER_QUERY, predicate.where_clause(), USER_ORDER);

    let users: Vec<User> = exec
        .query_map(ctx, &sql, predicate.args(), decode_user)
        .map_err(|e| e.or_context("fetch_users", EntityKind::User, &filters.describe()))?;

    tracing::debug!(row_count = users.len(), filter = %filters.describe(), "fetched users");
    Ok(users)
}

/// Fetch the ingredients linked to one recipe, in association order
///
/// # Errors
///
/// As for [`fetch_ingredients`].
pub fn fetch_recipe_ingredients<E: QueryExecutor>(
    exec: &E,
    ctx: &QueryContext,
    recipe_id: &str,
) -> Result<Vec<Ingredient>> {
    let args = [FilterValue::from(recipe_id)];

    exec.query_map(ctx, RECIPE_INGREDIENTS_QUERY, &args, |row| {
        IngredientRow::decode(row, 0)
    })
    .and_then(|rows| rows.into_iter().map(IngredientRow::into_ingredient).collect())
    .map_err(|e| {
        e.or_context(
            "fetch_recipe_ingredients",
            EntityKind::Ingredient,
            &format!("ri.recipe_id={}", recipe_id),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_order_by_primary_key() {
        assert!(INGREDIENT_ORDER.contains("i.ingredient_id"));
        assert!(RECIPE_ORDER.contains("r.recipe_id"));
        assert!(RECIPE_INGREDIENTS_QUERY.trim_end().ends_with("ORDER BY ri.rowid"));
    }

    #[test]
    fn test_filter_columns_exist_in_base_queries() {
        use ambrosia_core::filter::FilterColumn;

        for filter in [
            IngredientFilter::IngredientId(String::new()),
            IngredientFilter::Name(String::new()),
            IngredientFilter::OwnerId(String::new()),
        ] {
            let alias = filter.column().split('.').next().unwrap_or_default();
            assert!(INGREDIENT_QUERY.contains(&format!("ingredient {}", alias)));
        }
    }
}
