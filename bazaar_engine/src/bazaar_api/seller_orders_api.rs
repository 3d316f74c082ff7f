use std::fmt::Debug;

use log::*;

use crate::{
    bazaar_api::order_objects::OrderDetails,
    db_types::{Order, OrderStatusType, SessionUser},
    events::{EventProducers, OrderStatusChangedEvent},
    traits::{OrderFlowError, OrderManagement},
};

/// The seller's view of placed orders.
///
/// Any status string is accepted; transitions are not policed. Callers that are not sellers get
/// [`OrderFlowError::SellersOnly`] before anything is looked up.
pub struct SellerOrdersApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for SellerOrdersApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SellerOrdersApi")
    }
}

impl<B> SellerOrdersApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> SellerOrdersApi<B>
where B: OrderManagement
{
    pub async fn orders(&self, user: &SessionUser) -> Result<Vec<OrderDetails>, OrderFlowError> {
        if !user.is_seller() {
            return Err(OrderFlowError::SellersOnly);
        }
        self.db.fetch_orders_for_seller(user.id).await
    }

    pub async fn update_status(&self, user: &SessionUser, order_id: i64, status: &str) -> Result<Order, OrderFlowError> {
        if !user.is_seller() {
            return Err(OrderFlowError::SellersOnly);
        }
        let status = status.trim();
        if status.is_empty() {
            return Err(OrderFlowError::MissingArguments("status".into()));
        }
        let status = OrderStatusType::from(status);
        let order = self.db.update_order_status(user.id, order_id, &status).await?;
        info!("🔄️🚚️ Order #{order_id} is now '{status}'");
        let event =
            OrderStatusChangedEvent { seller_id: user.id, buyer_id: order.user_id, order_id, status: order.status.clone() };
        self.producers.notify(event).await;
        Ok(order)
    }
}
