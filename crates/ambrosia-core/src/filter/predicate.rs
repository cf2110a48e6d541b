//! Filter predicate builder
//!
//! Turns a set of column/value equality constraints into parameterized SQL
//! predicate text plus positionally aligned arguments.

use super::FilterValue;
use std::collections::BTreeMap;

/// Parameterized predicate text with its positional arguments
///
/// `args[n]` is bound to placeholder `$(n + 1)` in `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Predicate {
    text: String,
    args: Vec<FilterValue>,
}

impl Predicate {
    /// The predicate that restricts nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the predicate matches every row
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Conjunction text without a leading `WHERE`, e.g. `a = $1 AND b = $2`
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn args(&self) -> &[FilterValue] {
        &self.args
    }

    pub fn into_args(self) -> Vec<FilterValue> {
        self.args
    }

    /// `" WHERE <text>"`, or an empty string when nothing is restricted
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.text)
        }
    }

    /// Number of `$n` placeholders emitted into the text
    pub fn placeholder_count(&self) -> usize {
        self.text.matches(" = $").count()
    }
}

/// Build the predicate for a column → value map.
///
/// Columns are emitted in map order (sorted by column name for a `BTreeMap`),
/// so the same filters always produce the same query text. Placeholders are
/// 1-indexed and strictly increasing.
///
/// Column names are spliced into SQL verbatim. Callers must only pass column
/// names from a closed set of known columns, never external input; the typed
/// filters in this module guarantee that.
pub fn build_predicate<K: AsRef<str>>(filters: &BTreeMap<K, FilterValue>) -> Predicate {
    if filters.is_empty() {
        return Predicate::empty();
    }

    let mut conditions = Vec::with_capacity(filters.len());
    let mut args = Vec::with_capacity(filters.len());
    for (position, (column, value)) in filters.iter().enumerate() {
        conditions.push(format!("{} = ${}", column.as_ref(), position + 1));
        args.push(value.clone());
    }

    Predicate {
        text: conditions.join(" AND "),
        args,
    }
}
