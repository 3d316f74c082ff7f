//! `SqliteDatabase` is a concrete implementation of a marketplace backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{
    catalog,
    contacts,
    db_url,
    new_pool,
    orders::{self, OrderScope},
    run_migrations,
};
use crate::{
    bazaar_api::{
        catalog_objects::{ImportSummary, ListingDetails, ProductDetails, ShopQueryFilter},
        order_objects::{OrderDetails, PlacedOrder},
        price_list::PriceList,
    },
    db_types::{Category, Contact, NewContact, NewOrderItem, Order, OrderStatusType, Parameter, Shop},
    traits::{
        CatalogApiError,
        CatalogManagement,
        ContactApiError,
        ContactManagement,
        OrderFlowError,
        OrderManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_categories(&self, name: Option<String>) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let categories = catalog::fetch_categories(name, &mut conn).await?;
        Ok(categories)
    }

    async fn fetch_shops(&self, filter: ShopQueryFilter) -> Result<Vec<Shop>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let shops = catalog::fetch_shops(filter, &mut conn).await?;
        Ok(shops)
    }

    async fn search_products(&self, search: Option<String>) -> Result<Vec<ProductDetails>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let products = catalog::search_products(search, &mut conn).await?;
        Ok(products)
    }

    async fn search_listings(&self, search: Option<String>) -> Result<Vec<ListingDetails>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let listings = catalog::search_listings(search, &mut conn).await?;
        Ok(listings)
    }

    async fn fetch_parameters(&self) -> Result<Vec<Parameter>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let parameters = catalog::fetch_parameters(&mut conn).await?;
        Ok(parameters)
    }

    /// Runs the whole reconciliation in a single transaction. If any good is rejected, nothing from the price list is
    /// kept.
    async fn import_price_list(&self, seller_id: i64, price_list: PriceList) -> Result<ImportSummary, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let shop = catalog::upsert_shop(&price_list.shop, price_list.url.as_deref(), seller_id, &mut tx).await?;
        debug!("🗃️ Importing price list for shop #{} '{}' (seller #{seller_id})", shop.id, shop.name);
        let mut summary = ImportSummary { shop_id: shop.id, ..Default::default() };
        for category in &price_list.categories {
            catalog::upsert_category(category.id, &category.name, &mut tx).await?;
            catalog::link_shop_category(shop.id, category.id, &mut tx).await?;
            summary.categories += 1;
        }
        for good in &price_list.goods {
            if !catalog::category_exists(good.category, &mut tx).await? {
                warn!("🗃️ Good {} refers to unknown category {}. Rolling back the import.", good.id, good.category);
                return Err(CatalogApiError::UnknownCategory(good.category));
            }
            let (product, _) = catalog::fetch_or_create_product(&good.name, &good.model, good.category, &mut tx).await?;
            summary.products += 1;
            let (_, created) = catalog::fetch_or_create_listing(shop.id, product.id, good, &mut tx).await?;
            if created {
                summary.new_listings += 1;
            }
            for (name, value) in &good.parameters {
                let parameter = catalog::fetch_or_create_parameter(name, &mut tx).await?;
                let value = value.to_string();
                catalog::fetch_or_create_attribute(product.id, parameter.id, &value, &mut tx).await?;
                summary.attributes += 1;
            }
        }
        tx.commit().await?;
        info!(
            "🗃️ Price list for shop #{} imported: {} categories, {} products, {} new listings, {} attributes",
            summary.shop_id, summary.categories, summary.products, summary.new_listings, summary.attributes
        );
        Ok(summary)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_basket(&self, user_id: i64) -> Result<Option<OrderDetails>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let basket = orders::fetch_order_details(OrderScope::Basket(user_id), &mut conn).await?;
        Ok(basket.into_iter().next())
    }

    async fn listing_exists(&self, listing_id: i64) -> Result<bool, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let exists = catalog::listing_exists(listing_id, &mut conn).await?;
        Ok(exists)
    }

    async fn add_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let basket = orders::fetch_or_create_basket(user_id, &mut tx).await?;
        let mut created = 0;
        for item in items {
            let item = orders::insert_item(basket.id, item, &mut tx).await?;
            trace!("🗃️ Item #{} (listing #{}) added to basket #{}", item.id, item.listing_id, basket.id);
            created += 1;
        }
        tx.commit().await?;
        debug!("🗃️ {created} items added to basket #{} of user #{user_id}", basket.id);
        Ok(created)
    }

    async fn update_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let basket = orders::fetch_or_create_basket(user_id, &mut tx).await?;
        let mut updated = 0;
        for item in items {
            updated += orders::update_item_quantity(basket.id, item, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ {updated} items updated in basket #{} of user #{user_id}", basket.id);
        Ok(updated)
    }

    async fn remove_basket_items(&self, user_id: i64, listing_ids: &[i64]) -> Result<u64, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let basket = orders::fetch_or_create_basket(user_id, &mut tx).await?;
        let deleted = orders::delete_items_for_listings(basket.id, listing_ids, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {deleted} items removed from basket #{} of user #{user_id}", basket.id);
        Ok(deleted)
    }

    async fn promote_basket(&self, user_id: i64, order_id: i64) -> Result<Option<PlacedOrder>, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::promote_basket(user_id, order_id, &mut tx).await? else {
            let is_open_basket = orders::fetch_order(order_id, &mut tx)
                .await?
                .map(|o| o.user_id == user_id && o.status.is_basket())
                .unwrap_or(false);
            if is_open_basket {
                return Err(OrderFlowError::EmptyOrder(order_id));
            }
            debug!("🗃️ Order #{order_id} is not an open basket of user #{user_id}. Nothing to promote.");
            return Ok(None);
        };
        let seller_id = orders::first_item_seller(order_id, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Basket #{order_id} of user #{user_id} has been placed as a new order");
        Ok(Some(PlacedOrder { order, seller_id }))
    }

    async fn fetch_orders_for_buyer(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_order_details(OrderScope::PlacedBy(user_id), &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_orders_for_seller(&self, seller_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_order_details(OrderScope::SoldBy(seller_id), &mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        seller_id: i64,
        order_id: i64,
        status: &OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let updated = match orders::update_status(seller_id, order_id, status, &mut tx).await {
            // Only one basket per buyer
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(OrderFlowError::BasketAlreadyOpen(order_id));
            },
            result => result?,
        };
        let Some(order) = updated else {
            // A basket is private to the buyer until it is placed
            let is_placed = orders::fetch_order(order_id, &mut tx).await?.map(|o| !o.status.is_basket()).unwrap_or(false);
            return Err(if is_placed {
                OrderFlowError::NotOrderOwner(order_id)
            } else {
                OrderFlowError::OrderNotFound(order_id)
            });
        };
        tx.commit().await?;
        info!("🗃️ Seller #{seller_id} moved order #{order_id} to '{status}'");
        Ok(order)
    }
}

impl ContactManagement for SqliteDatabase {
    async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let contacts = contacts::fetch_contacts(user_id, &mut conn).await?;
        Ok(contacts)
    }

    async fn fetch_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let contact = contacts::fetch_contact(user_id, contact_id, &mut conn).await?;
        Ok(contact)
    }

    async fn has_contacts(&self, user_id: i64) -> Result<bool, ContactApiError> {
        let mut conn = self.pool.acquire().await?;
        let count = contacts::count_contacts(user_id, &mut conn).await?;
        Ok(count > 0)
    }

    async fn insert_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, ContactApiError> {
        let mut tx = self.pool.begin().await?;
        let contact = contacts::insert_contact(user_id, contact, &mut tx).await?;
        tx.commit().await?;
        Ok(contact)
    }

    async fn save_contact(&self, contact: Contact) -> Result<Option<Contact>, ContactApiError> {
        let mut tx = self.pool.begin().await?;
        let contact = contacts::update_contact(contact, &mut tx).await?;
        tx.commit().await?;
        Ok(contact)
    }

    async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, ContactApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = contacts::delete_contacts(user_id, ids, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {deleted} contacts deleted for user #{user_id}");
        Ok(deleted)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the url in `BZR_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        run_migrations(&self.pool).await?;
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
