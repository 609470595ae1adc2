//! Drink record and write payload

use serde::{Deserialize, Serialize};

/// A persisted drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Drink {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Validated fields for inserting or replacing a drink
///
/// Only the serializer produces these from request bodies, so a value of this
/// type always satisfies the field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkFields {
    pub name: String,
    pub description: String,
}

impl Drink {
    /// Writable fields of this record
    pub fn fields(&self) -> DrinkFields {
        DrinkFields {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}
