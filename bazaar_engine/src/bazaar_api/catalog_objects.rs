use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db_types::Price;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopQueryFilter {
    pub name: Option<String>,
    pub is_work: Option<bool>,
}

impl ShopQueryFilter {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_is_work(mut self, is_work: bool) -> Self {
        self.is_work = Some(is_work);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_work.is_none()
    }
}

/// A parameter value attached to a product, e.g. `("Colour", "black")`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(skip)]
    pub product_id: i64,
    pub parameter: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub category_id: i64,
    pub category_name: String,
    #[sqlx(skip)]
    pub attributes: Vec<AttributeValue>,
}

/// A listing joined with its shop and product, which is what a buyer browses.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ListingDetails {
    pub id: i64,
    pub ext_id: i64,
    pub quantity: i64,
    pub price: Price,
    pub price_rrc: Price,
    pub shop_id: i64,
    pub shop_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_model: String,
    pub category_id: i64,
}

/// What a price-list import touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub shop_id: i64,
    pub categories: usize,
    pub products: usize,
    /// Listings that did not exist before this import
    pub new_listings: usize,
    pub attributes: usize,
}
