//! Product Module

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Identified;

/// Product form input. Price and stock are absent until the user fills them in.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDTO {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

impl Identified for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

pub mod validators;
