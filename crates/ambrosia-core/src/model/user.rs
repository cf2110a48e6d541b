use serde::{Deserialize, Serialize};

/// A user account that owns recipes and ingredients
///
/// Always embedded by value inside the entity that references it; a `User`
/// has no lifecycle of its own in the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Opaque user identifier
    pub id: String,

    /// Display name
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
