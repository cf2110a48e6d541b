//! Typed equality filters for entity queries
//!
//! A `Filters<F>` is an AND of `column = value` constraints drawn from the
//! closed column set `F`. An empty set matches every row.

pub mod columns;
pub mod predicate;

pub use columns::{IngredientFilter, RecipeFilter, UserFilter};
pub use predicate::{build_predicate, Predicate};

use crate::errors::{AmbrosiaError, Result};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Scalar comparison value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

/// A filterable column together with the value it must equal
pub trait FilterColumn {
    /// Fully qualified column name in the entity's base query
    fn column(&self) -> &'static str;

    fn value(&self) -> FilterValue;
}

/// Set of equality constraints over the columns described by `F`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters<F> {
    entries: BTreeMap<&'static str, FilterValue>,
    _columns: PhantomData<F>,
}

impl<F: FilterColumn> Filters<F> {
    /// No constraints: match all rows
    pub fn all() -> Self {
        Self {
            entries: BTreeMap::new(),
            _columns: PhantomData,
        }
    }

    /// A single constraint, typically the primary key
    pub fn by(filter: F) -> Self {
        let mut filters = Self::all();
        filters.entries.insert(filter.column(), filter.value());
        filters
    }

    /// Add a constraint, consuming and returning the set
    ///
    /// # Errors
    ///
    /// `DuplicateFilter` if the column is already constrained.
    pub fn and(mut self, filter: F) -> Result<Self> {
        self.push(filter)?;
        Ok(self)
    }

    /// Add a constraint in place
    ///
    /// # Errors
    ///
    /// `DuplicateFilter` if the column is already constrained.
    pub fn push(&mut self, filter: F) -> Result<()> {
        let column = filter.column();
        if self.entries.contains_key(column) {
            return Err(AmbrosiaError::DuplicateFilter {
                column: column.to_string(),
            }
            .into());
        }
        self.entries.insert(column, filter.value());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value constrained on `column`, if any
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.entries.get(column)
    }

    /// Render as `col=value, col=value` for logs and error context
    pub fn describe(&self) -> String {
        if self.entries.is_empty() {
            return "<all>".to_string();
        }
        self.entries
            .iter()
            .map(|(column, value)| format!("{}={}", column, value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build the parameterized predicate for these constraints
    pub fn predicate(&self) -> Predicate {
        build_predicate(&self.entries)
    }
}

impl<F: FilterColumn> Default for Filters<F> {
    fn default() -> Self {
        Self::all()
    }
}
