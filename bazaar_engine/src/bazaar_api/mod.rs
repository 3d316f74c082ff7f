//! # Marketplace engine public API
//!
//! The `bazaar_api` module exposes the programmatic API for the marketplace engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`catalog_api`] provides read-only access to shops, categories, products, listings and parameters.
//! * [`import_api`] reconciles seller price lists against the catalog.
//! * [`basket_api`] is the buyer's side of the order flow: building a basket, placing it and listing past orders.
//! * [`seller_orders_api`] is the seller's side: listing the orders that contain their goods and moving them along.
//! * [`contacts_api`] manages the delivery contacts that a buyer must have on file before placing an order.
//!
//! The other submodules in this module are support types.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API, plus the event producers when the API emits
//! notifications.
//!
//! ```rust,ignore
//! use bazaar_engine::{events::EventProducers, BasketApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderManagement and ContactManagement
//! let api = BasketApi::new(db, EventProducers::default());
//! let basket = api.basket(user_id).await?;
//! ```

pub mod basket_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod contacts_api;
pub mod import_api;
pub mod order_objects;
pub mod price_list;
pub mod seller_orders_api;
