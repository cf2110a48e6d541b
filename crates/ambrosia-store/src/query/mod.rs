//! Read-only query layer
//!
//! - `executor`: single-level entity queries (ingredients, recipe headers, users)
//! - `hydration`: recipe graphs with their ingredients attached
//! - `lookup`: unique-key fetches enforcing exactly-one cardinality
//!
//! Every query joins the owning user with a LEFT JOIN so that a dangling
//! owner reference is reported as an integrity fault instead of silently
//! dropping the row.

pub mod executor;
pub mod hydration;
pub mod lookup;
mod rows;

pub use executor::{fetch_ingredients, fetch_recipe_headers, fetch_recipe_ingredients, fetch_users};
pub use hydration::{
    fetch_recipes_with_ingredients, fetch_recipes_with_ingredients_joined, hydrate_recipes,
    HydrationStrategy,
};
pub use lookup::{
    expect_one, fetch_one_ingredient, fetch_one_recipe, fetch_one_user, get_ingredient_by_id,
    get_recipe_by_id, get_user_by_id,
};
