//! Bazaar Engine
//!
//! The Bazaar Engine is the core of a multi-seller marketplace: sellers upload price lists, buyers browse the catalog,
//! build a basket and place orders, and sellers move those orders through their lifecycle. This library contains the
//! core logic. It knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Database management and control. SQLite is the supported backend. You should never need to access the database
//!    directly. Instead, use the public API provided by the engine. The exception is the data types used in the
//!    database. These are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`mod@bazaar_api`]). This provides the public-facing functionality: catalog browsing and
//!    import, baskets and orders, and delivery contacts. Backends need to implement the traits in the [`traits`]
//!    module in order to act as a backend for the server.
//!
//! The engine also emits notification events when an order is placed or changes status. A simple actor framework is
//! used so that you can easily hook into these events and deliver the notifications however you like.
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod bazaar_api;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use bazaar_api::{
    basket_api::BasketApi,
    catalog_api::CatalogApi,
    catalog_objects,
    contacts_api::ContactsApi,
    import_api::CatalogImportApi,
    order_objects,
    price_list,
    seller_orders_api::SellerOrdersApi,
};
pub use traits::{
    CatalogApiError,
    CatalogManagement,
    ContactApiError,
    ContactManagement,
    OrderFlowError,
    OrderManagement,
};
