//! The YAML price-list document sellers upload.
//!
//! ```yaml
//! shop: Gadget Hut
//! url: https://gadgethut.example      # optional
//! categories:
//!   - id: 224
//!     name: Smartphones
//! goods:
//!   - id: 4216292
//!     category: 224
//!     model: apple/iphone/xs-max
//!     name: Apple iPhone XS Max 512GB (gold)
//!     price: 110000
//!     price_rrc: 116990
//!     quantity: 14
//!     parameters:
//!       "Screen (in)": 6.5
//!       "Colour": gold
//! ```
use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{db_types::Price, traits::CatalogApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    pub shop: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub categories: Vec<PriceListCategory>,
    #[serde(default)]
    pub goods: Vec<PriceListGood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListGood {
    /// The shop's own id for this good
    pub id: i64,
    pub category: i64,
    pub name: String,
    #[serde(default)]
    pub model: String,
    pub quantity: i64,
    pub price: Price,
    pub price_rrc: Price,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

/// Parameter values are free-form scalars in the document and are stored as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Flag(v) => write!(f, "{v}"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
            ParameterValue::Decimal(v) => write!(f, "{v}"),
            ParameterValue::Text(v) => f.write_str(v),
        }
    }
}

impl PriceList {
    pub fn from_yaml(text: &str) -> Result<Self, CatalogApiError> {
        let list: Self = serde_yaml::from_str(text).map_err(|e| CatalogApiError::InvalidDocument(e.to_string()))?;
        list.check()?;
        Ok(list)
    }

    /// Structural checks that YAML typing alone does not catch.
    pub fn check(&self) -> Result<(), CatalogApiError> {
        if self.shop.trim().is_empty() {
            return Err(CatalogApiError::InvalidDocument("The shop name is empty".into()));
        }
        if let Some(c) = self.categories.iter().find(|c| c.name.trim().is_empty()) {
            return Err(CatalogApiError::InvalidDocument(format!("Category {} has no name", c.id)));
        }
        for good in &self.goods {
            if good.name.trim().is_empty() {
                return Err(CatalogApiError::InvalidDocument(format!("Good {} has no name", good.id)));
            }
            if good.quantity < 0 || good.price.value() < 0 || good.price_rrc.value() < 0 {
                return Err(CatalogApiError::InvalidDocument(format!(
                    "Good {} has a negative quantity or price",
                    good.id
                )));
            }
            let max = i32::MAX as i64;
            if good.quantity > max || good.price.value() > max || good.price_rrc.value() > max {
                return Err(CatalogApiError::InvalidDocument(format!(
                    "Good {} has a quantity or price above {max}",
                    good.id
                )));
            }
        }
        Ok(())
    }
}
