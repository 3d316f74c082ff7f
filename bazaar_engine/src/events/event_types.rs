use serde::{Deserialize, Serialize};

use crate::db_types::OrderStatusType;

/// The buyer placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub buyer_id: i64,
    pub order_id: i64,
}

/// A seller has a new order to fulfil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderForSellerEvent {
    pub seller_id: i64,
    pub buyer_id: i64,
    pub order_id: i64,
}

/// A seller moved an order to a new status. Both parties are told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub seller_id: i64,
    pub buyer_id: i64,
    pub order_id: i64,
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    OrderPlaced(OrderPlacedEvent),
    NewOrderForSeller(NewOrderForSellerEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderPlaced(_) => "order_placed",
            Self::NewOrderForSeller(_) => "new_order_for_seller",
            Self::OrderStatusChanged(_) => "order_status_changed",
        }
    }

    /// User ids that should receive this notification.
    pub fn recipients(&self) -> Vec<i64> {
        match self {
            Self::OrderPlaced(e) => vec![e.buyer_id],
            Self::NewOrderForSeller(e) => vec![e.seller_id],
            Self::OrderStatusChanged(e) => vec![e.buyer_id, e.seller_id],
        }
    }

    pub fn order_id(&self) -> i64 {
        match self {
            Self::OrderPlaced(e) => e.order_id,
            Self::NewOrderForSeller(e) => e.order_id,
            Self::OrderStatusChanged(e) => e.order_id,
        }
    }
}

impl From<OrderPlacedEvent> for NotificationEvent {
    fn from(e: OrderPlacedEvent) -> Self {
        Self::OrderPlaced(e)
    }
}

impl From<NewOrderForSellerEvent> for NotificationEvent {
    fn from(e: NewOrderForSellerEvent) -> Self {
        Self::NewOrderForSeller(e)
    }
}

impl From<OrderStatusChangedEvent> for NotificationEvent {
    fn from(e: OrderStatusChangedEvent) -> Self {
        Self::OrderStatusChanged(e)
    }
}
