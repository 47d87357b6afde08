use serde::{Deserialize, Serialize};

/// A stored coffee, as returned by every read endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Coffee {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Request payload for creating a coffee
///
/// Any `id` sent by the client is ignored; the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewCoffee {
    pub name: String,
    pub price: f64,
}

impl NewCoffee {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub(crate) fn with_id(self, id: i64) -> Coffee {
        Coffee {
            id,
            name: self.name,
            price: self.price,
        }
    }
}
