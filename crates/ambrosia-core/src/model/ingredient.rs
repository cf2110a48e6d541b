use serde::{Deserialize, Serialize};

use super::user::User;

/// An ingredient together with the user who created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub description: String,

    /// Owning user, embedded by value
    pub owner: User,
}

impl Ingredient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        owner: User,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            owner,
        }
    }
}
