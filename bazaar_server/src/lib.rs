//! # Bazaar server
//! The HTTP front end of the marketplace order backend. It is responsible for:
//! * Serving the public catalog: categories, shops, products, listings and parameters.
//! * Resolving bearer tokens into a session user and enforcing buyer/seller access.
//! * Exposing the basket, order, seller and contact operations of [`bazaar_engine`].
//! * Accepting price-list uploads and importing them in the background.
//! * Composing notifications for order events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Public routes live at the root (`/health`, `/categories`, `/shops`, `/products`, `/listings`, `/parameters`).
//! Everything that needs a user lives under `/api`. See [routes](routes/index.html).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod import_worker;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
