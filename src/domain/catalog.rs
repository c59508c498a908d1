use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

// ============================================================================
// Catalog Value Objects
// ============================================================================

/// Product category. Only `Water` counts toward loyalty points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Water,
    Container,
    Accessory,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Water => "water",
            ProductCategory::Container => "container",
            ProductCategory::Accessory => "accessory",
        }
    }

    pub fn is_loyalty_eligible(&self) -> bool {
        matches!(self, ProductCategory::Water)
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water" => Ok(ProductCategory::Water),
            "container" => Ok(ProductCategory::Container),
            "accessory" => Ok(ProductCategory::Accessory),
            other => Err(format!("unknown product category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub price: Money,
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub id: i64,
    pub name: String,
    pub delivery_fee: Money,
}
