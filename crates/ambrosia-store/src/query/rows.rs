//! Row decoding shared by the query modules
//!
//! Rows decode into `*Row` structs whose owner is optional; promoting them
//! into domain entities is where a missing owner becomes an integrity error.

use crate::errors::Result;
use ambrosia_core::errors::AmbrosiaError;
use ambrosia_core::model::{EntityKind, Ingredient, RecipeHeader, User};
use rusqlite::Row;

/// Decode an owner from two nullable columns (`user_id`, `name`) at `offset`
pub(crate) fn decode_owner(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<User>> {
    let id: Option<String> = row.get(offset)?;
    let name: Option<String> = row.get(offset + 1)?;
    Ok(match (id, name) {
        (Some(id), Some(name)) => Some(User { id, name }),
        _ => None,
    })
}

pub(crate) fn decode_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Ingredient columns as read, owner not yet verified
#[derive(Debug)]
pub(crate) struct IngredientRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<User>,
}

impl IngredientRow {
    /// Decode `ingredient_id, name, description, user_id, user_name` at `offset`
    pub fn decode(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            owner: decode_owner(row, offset + 3)?,
        })
    }

    pub fn into_ingredient(self) -> Result<Ingredient> {
        match self.owner {
            Some(owner) => Ok(Ingredient {
                id: self.id,
                name: self.name,
                description: self.description,
                owner,
            }),
            None => Err(AmbrosiaError::MissingOwner {
                entity: EntityKind::Ingredient,
                entity_id: self.id,
            }
            .into()),
        }
    }
}

/// Recipe header columns as read, owner not yet verified
#[derive(Debug)]
pub(crate) struct RecipeRow {
    pub header: RecipeHeader,
    pub owner: Option<User>,
}

impl RecipeRow {
    /// Decode `recipe_id, name, description, user_id, user_name` from column 0
    pub fn decode(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            header: RecipeHeader {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            },
            owner: decode_owner(row, 3)?,
        })
    }

    pub fn into_pair(self) -> Result<(RecipeHeader, User)> {
        match self.owner {
            Some(owner) => Ok((self.header, owner)),
            None => Err(AmbrosiaError::MissingOwner {
                entity: EntityKind::Recipe,
                entity_id: self.header.id,
            }
            .into()),
        }
    }
}
