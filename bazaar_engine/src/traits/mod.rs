//! # Backend contracts
//!
//! This module defines the behaviour a storage backend must provide to drive the marketplace engine. The public APIs
//! in [`crate::bazaar_api`] are generic over these traits, so the HTTP layer can be tested against mocks and a backend
//! other than SQLite could be dropped in.
//!
//! * [`CatalogManagement`] covers the catalog store: browsing shops, categories, products and listings, and applying a
//!   parsed price list.
//! * [`OrderManagement`] covers baskets, placed orders and seller-side status changes.
//! * [`ContactManagement`] covers the buyers' delivery contacts.
//!
//! Every trait has its own error type. Each converts from `sqlx::Error`.
mod catalog_management;
mod contact_management;
mod order_management;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use contact_management::{ContactApiError, ContactManagement};
pub use order_management::{OrderFlowError, OrderManagement};
