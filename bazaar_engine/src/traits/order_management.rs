use thiserror::Error;

use crate::{
    bazaar_api::order_objects::{OrderDetails, PlacedOrder},
    db_types::{NewOrderItem, Order, OrderStatusType},
    helpers::FieldErrors,
    traits::ContactApiError,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not all required arguments were provided. {0}")]
    MissingArguments(String),
    #[error("Invalid order items. {0}")]
    ValidationError(FieldErrors),
    #[error("Specify valid items to delete")]
    NoValidItems,
    #[error("Contact details for delivery are not specified")]
    NoContacts,
    #[error("Order {0} has no items")]
    EmptyOrder(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Only for shops")]
    SellersOnly,
    #[error("Order {0} does not contain items from your shops")]
    NotOrderOwner(i64),
    #[error("The buyer of order {0} already has an open basket")]
    BasketAlreadyOpen(i64),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

impl From<ContactApiError> for OrderFlowError {
    fn from(e: ContactApiError) -> Self {
        match e {
            ContactApiError::DatabaseError(s) => Self::DatabaseError(s),
            ContactApiError::MissingArguments(s) => Self::MissingArguments(s),
            ContactApiError::ValidationError(f) => Self::ValidationError(f),
        }
    }
}

/// Baskets, placed orders and the seller's view of them.
///
/// A user has at most one order in the `basket` state. Every basket mutation fetches it, creating it if necessary,
/// inside the same transaction as the mutation itself.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// The user's basket with its items and total, if they have one.
    async fn fetch_basket(&self, user_id: i64) -> Result<Option<OrderDetails>, OrderFlowError>;

    async fn listing_exists(&self, listing_id: i64) -> Result<bool, OrderFlowError>;

    /// Adds every item to the basket in one transaction. Returns the number of items created.
    async fn add_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError>;

    /// Sets the quantity of the basket items that refer to each listing. Returns the number of rows changed.
    async fn update_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError>;

    /// Deletes the basket items that refer to any of the given listings. Returns the number of rows deleted.
    async fn remove_basket_items(&self, user_id: i64, listing_ids: &[i64]) -> Result<u64, OrderFlowError>;

    /// Moves order `order_id` from `basket` to `new`, if it is the user's basket. Returns `None` when the order is not
    /// an open basket of this user, in which case nothing changes.
    async fn promote_basket(&self, user_id: i64, order_id: i64) -> Result<Option<PlacedOrder>, OrderFlowError>;

    /// Every order of the user that has left the basket, newest first.
    async fn fetch_orders_for_buyer(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;

    /// Every placed order containing at least one item sold by one of the seller's shops, newest first.
    async fn fetch_orders_for_seller(&self, seller_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;

    /// Writes `status` onto a placed order that contains at least one of the seller's items.
    async fn update_order_status(
        &self,
        seller_id: i64,
        order_id: i64,
        status: &OrderStatusType,
    ) -> Result<Order, OrderFlowError>;
}
