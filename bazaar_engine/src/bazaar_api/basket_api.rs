use std::fmt::Debug;

use log::*;

use crate::{
    bazaar_api::order_objects::{BasketItemRequest, OrderDetails, PlacedOrder},
    db_types::NewOrderItem,
    events::{EventProducers, NewOrderForSellerEvent, OrderPlacedEvent},
    helpers::{parse_id_list, FieldErrors},
    traits::{ContactManagement, OrderFlowError, OrderManagement},
};

/// `BasketApi` is the buyer's side of the order flow.
///
/// Every user has at most one basket, created on demand. Items are added, re-quantified and removed until the buyer
/// places the basket, at which point it becomes an order with status `new` and the buyer and seller are notified.
pub struct BasketApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for BasketApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BasketApi")
    }
}

impl<B> BasketApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> BasketApi<B>
where B: OrderManagement + ContactManagement
{
    /// The user's basket, as a list holding zero or one order.
    pub async fn basket(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let basket = self.db.fetch_basket(user_id).await?;
        Ok(basket.into_iter().collect())
    }

    /// Validates every item, then adds all of them to the basket. The first invalid item rejects the whole batch and
    /// nothing is written.
    pub async fn add_items(&self, user_id: i64, items: &[BasketItemRequest]) -> Result<u64, OrderFlowError> {
        if items.is_empty() {
            return Err(OrderFlowError::MissingArguments("items".into()));
        }
        let mut valid = Vec::with_capacity(items.len());
        for item in items {
            let item = item.validate().map_err(OrderFlowError::ValidationError)?;
            if !self.db.listing_exists(item.listing_id).await? {
                debug!("🔄️🧺️ User #{user_id} tried to add non-existent listing #{}", item.listing_id);
                let msg = format!("Invalid pk \"{}\" - object does not exist.", item.listing_id);
                return Err(OrderFlowError::ValidationError(FieldErrors::single("listing", msg)));
            }
            valid.push(item);
        }
        let created = self.db.add_basket_items(user_id, &valid).await?;
        debug!("🔄️🧺️ {created} items added to the basket of user #{user_id}");
        Ok(created)
    }

    /// Sets new quantities for listings already in the basket. Pairs that are not made of plain integers are skipped
    /// without complaint.
    pub async fn update_quantities(&self, user_id: i64, items: &[BasketItemRequest]) -> Result<u64, OrderFlowError> {
        if items.is_empty() {
            return Err(OrderFlowError::MissingArguments("items".into()));
        }
        let mut updates = Vec::<NewOrderItem>::with_capacity(items.len());
        for item in items.iter().filter(|i| i.is_strictly_integral()) {
            updates.push(item.validate().map_err(OrderFlowError::ValidationError)?);
        }
        let skipped = items.len() - updates.len();
        if skipped > 0 {
            trace!("🔄️🧺️ Skipping {skipped} malformed basket updates for user #{user_id}");
        }
        if updates.is_empty() {
            return Ok(0);
        }
        let updated = self.db.update_basket_items(user_id, &updates).await?;
        debug!("🔄️🧺️ {updated} basket items updated for user #{user_id}");
        Ok(updated)
    }

    /// Removes the basket items for the listings in the comma-separated `items` list. Tokens that are not plain
    /// numbers are ignored.
    pub async fn remove_items(&self, user_id: i64, items: &str) -> Result<u64, OrderFlowError> {
        let ids = parse_id_list(items);
        if ids.is_empty() {
            return Err(OrderFlowError::MissingArguments("items".into()));
        }
        let deleted = self.db.remove_basket_items(user_id, &ids).await?;
        if deleted == 0 {
            return Err(OrderFlowError::NoValidItems);
        }
        debug!("🔄️🧺️ {deleted} items removed from the basket of user #{user_id}");
        Ok(deleted)
    }

    /// Places the basket `order_id`. The buyer must have at least one contact on file.
    ///
    /// Returns `None`, having changed nothing, when `order_id` is not the user's open basket. On success the buyer gets
    /// a confirmation, and the owner of the shop selling the first item is told about the new order.
    pub async fn place_order(&self, user_id: i64, order_id: i64) -> Result<Option<PlacedOrder>, OrderFlowError> {
        if !self.db.has_contacts(user_id).await? {
            debug!("🔄️📦️ User #{user_id} has no contacts on file. Order #{order_id} stays in the basket.");
            return Err(OrderFlowError::NoContacts);
        }
        let Some(placed) = self.db.promote_basket(user_id, order_id).await? else {
            return Ok(None);
        };
        info!("🔄️📦️ User #{user_id} placed order #{order_id}");
        self.producers.notify(OrderPlacedEvent { buyer_id: user_id, order_id }).await;
        match placed.seller_id {
            Some(seller_id) => {
                self.producers.notify(NewOrderForSellerEvent { seller_id, buyer_id: user_id, order_id }).await;
            },
            None => warn!("🔄️📦️ The shop selling the first item of order #{order_id} has no owner. Nobody to notify."),
        }
        Ok(Some(placed))
    }

    /// Every order the user has placed, newest first.
    pub async fn my_orders(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        self.db.fetch_orders_for_buyer(user_id).await
    }
}
