use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    db_types::{NewOrderItem, Order, Price},
    helpers::FieldErrors,
};

const REQUIRED: &str = "This field is required.";

/// Largest quantity a single basket item may hold.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

//--------------------------------------   BasketItemRequest   --------------------------------------------------------
/// A `(listing, quantity)` pair as submitted by a client, before any type checking.
///
/// Both fields are kept as raw JSON values because adding and updating basket items treat badly typed values
/// differently: adding coerces numeric strings, while updating skips any pair that is not made of plain integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketItemRequest {
    #[serde(default, alias = "product_info")]
    pub listing: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

impl BasketItemRequest {
    pub fn new(listing_id: i64, quantity: i64) -> Self {
        Self { listing: Some(Value::from(listing_id)), quantity: Some(Value::from(quantity)) }
    }

    /// True when both values were sent as JSON integers, as opposed to numeric strings or anything else.
    pub fn is_strictly_integral(&self) -> bool {
        let is_int = |v: &Option<Value>| matches!(v, Some(Value::Number(n)) if n.is_i64());
        is_int(&self.listing) && is_int(&self.quantity)
    }

    /// Checks field presence, types and the quantity bounds. Whether the listing exists is up to the caller.
    pub fn validate(&self) -> Result<NewOrderItem, FieldErrors> {
        let mut errors = FieldErrors::new();
        let listing_id = match &self.listing {
            None => {
                errors.add("listing", REQUIRED);
                None
            },
            Some(v) => {
                let id = coerce_int(v);
                if id.is_none() {
                    errors.add("listing", format!("Incorrect type. Expected pk value, received {}.", json_type(v)));
                }
                id
            },
        };
        let quantity = match &self.quantity {
            None => {
                errors.add("quantity", REQUIRED);
                None
            },
            Some(v) => match coerce_int(v) {
                Some(q) if q < 1 => {
                    errors.add("quantity", "Ensure this value is greater than or equal to 1.");
                    None
                },
                Some(q) if q > MAX_QUANTITY => {
                    errors.add("quantity", format!("Ensure this value is less than or equal to {MAX_QUANTITY}."));
                    None
                },
                Some(q) => Some(q),
                None => {
                    errors.add("quantity", "A valid integer is required.");
                    None
                },
            },
        };
        match (listing_id, quantity) {
            (Some(listing_id), Some(quantity)) if errors.is_empty() => Ok(NewOrderItem::new(listing_id, quantity)),
            _ => Err(errors),
        }
    }
}

fn coerce_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

//--------------------------------------      OrderedItem      --------------------------------------------------------
/// An order item joined with the listing, shop and product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderedItem {
    pub id: i64,
    pub order_id: i64,
    pub quantity: i64,
    pub listing_id: i64,
    pub ext_id: i64,
    pub price: Price,
    pub price_rrc: Price,
    pub shop_id: i64,
    pub shop_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_model: String,
}

impl OrderedItem {
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

//--------------------------------------      OrderDetails     --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub ordered_items: Vec<OrderedItem>,
    /// Σ(quantity × price) over `ordered_items`. Derived on every read.
    pub total_sum: Price,
}

impl OrderDetails {
    pub fn new(order: Order, ordered_items: Vec<OrderedItem>) -> Self {
        let total_sum = ordered_items.iter().map(OrderedItem::line_total).sum();
        Self { order, ordered_items, total_sum }
    }
}

//--------------------------------------      PlacedOrder      --------------------------------------------------------
/// Result of promoting a basket to a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: Order,
    /// Owner of the shop that sells the first item of the order, if the shop has an owner.
    pub seller_id: Option<i64>,
}
