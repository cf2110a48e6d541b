//! Recipe catalog - the read surface handed to API layers
//!
//! ## Logging Ownership
//!
//! The catalog owns lifecycle logging for every read:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The query layer below uses only `tracing::debug!()`.
//!
//! Every call consults the injected `AccessPolicy` first; a denied request
//! never reaches the store.

use crate::errors::Result;
use crate::pool::QueryExecutor;
use crate::query::{self, HydrationStrategy};
use ambrosia_core::filter::{Filters, IngredientFilter, RecipeFilter};
use ambrosia_core::model::{EntityKind, Ingredient, Recipe, User};
use ambrosia_core::policy::{AccessPolicy, AllowAllPolicy, CatalogAction};
use ambrosia_core::{log_op_end, log_op_error, log_op_start, QueryContext};
use std::time::Instant;

/// Policy-checked, logged access to the recipe catalog
#[derive(Debug, Clone)]
pub struct RecipeCatalog<E, P = AllowAllPolicy> {
    exec: E,
    policy: P,
    strategy: HydrationStrategy,
}

impl<E: QueryExecutor> RecipeCatalog<E, AllowAllPolicy> {
    /// Catalog that permits every read
    pub fn new(exec: E) -> Self {
        Self::with_policy(exec, AllowAllPolicy)
    }
}

impl<E: QueryExecutor, P: AccessPolicy> RecipeCatalog<E, P> {
    pub fn with_policy(exec: E, policy: P) -> Self {
        Self {
            exec,
            policy,
            strategy: HydrationStrategy::default(),
        }
    }

    /// Choose how `recipes` assembles recipe graphs
    pub fn with_strategy(mut self, strategy: HydrationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> HydrationStrategy {
        self.strategy
    }

    /// Ingredients matching `filters`; empty filters list everything
    pub fn ingredients(
        &self,
        ctx: &QueryContext,
        filters: &Filters<IngredientFilter>,
    ) -> Result<Vec<Ingredient>> {
        self.observe(
            "catalog_ingredients",
            ctx,
            CatalogAction::List(EntityKind::Ingredient),
            &filters.describe(),
            || query::fetch_ingredients(&self.exec, ctx, filters),
        )
    }

    /// The ingredient with the given id
    pub fn ingredient(&self, ctx: &QueryContext, id: &str) -> Result<Ingredient> {
        self.observe(
            "catalog_ingredient",
            ctx,
            CatalogAction::Get(EntityKind::Ingredient),
            id,
            || query::get_ingredient_by_id(&self.exec, ctx, id),
        )
    }

    /// Fully hydrated recipes matching `filters`
    pub fn recipes(&self, ctx: &QueryContext, filters: &Filters<RecipeFilter>) -> Result<Vec<Recipe>> {
        self.observe(
            "catalog_recipes",
            ctx,
            CatalogAction::List(EntityKind::Recipe),
            &filters.describe(),
            || query::hydrate_recipes(&self.exec, ctx, filters, self.strategy),
        )
    }

    /// The recipe with the given id, ingredients attached
    pub fn recipe(&self, ctx: &QueryContext, id: &str) -> Result<Recipe> {
        self.observe(
            "catalog_recipe",
            ctx,
            CatalogAction::Get(EntityKind::Recipe),
            id,
            || query::get_recipe_by_id(&self.exec, ctx, id),
        )
    }

    pub fn user(&self, ctx: &QueryContext, id: &str) -> Result<User> {
        self.observe(
            "catalog_user",
            ctx,
            CatalogAction::Get(EntityKind::User),
            id,
            || query::get_user_by_id(&self.exec, ctx, id),
        )
    }

    fn observe<T, F>(
        &self,
        op: &'static str,
        ctx: &QueryContext,
        action: CatalogAction,
        subject: &str,
        run: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let request = ctx.request();
        let request_id = request.request_id.to_string();
        let trace_id = request.trace_id.as_ref().map(ToString::to_string);
        log_op_start!(
            op,
            request_id = %request_id,
            trace_id = trace_id.as_deref(),
            subject = subject
        );
        let start = Instant::now();

        let result = self
            .policy
            .check(request, action)
            .and_then(|()| run())
            .map_err(|e| {
                let e = e.with_request(request);
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %request_id,
                    trace_id = trace_id.as_deref()
                );
                e
            })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            trace_id = trace_id.as_deref()
        );
        Ok(result)
    }
}
