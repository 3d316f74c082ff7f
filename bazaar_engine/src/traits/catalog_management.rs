use thiserror::Error;

use crate::{
    bazaar_api::{
        catalog_objects::{ImportSummary, ListingDetails, ProductDetails, ShopQueryFilter},
        price_list::PriceList,
    },
    db_types::{Category, Parameter, Shop},
};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The price list is not valid. {0}")]
    InvalidDocument(String),
    #[error("Category {0} is not defined in the price list or the catalog")]
    UnknownCategory(i64),
    #[error("Could not read the price list. {0}")]
    FileError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// The catalog store. Reads are unrestricted; the only write path is [`CatalogManagement::import_price_list`].
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches all categories, or only those with exactly the given name.
    async fn fetch_categories(&self, name: Option<String>) -> Result<Vec<Category>, CatalogApiError>;

    async fn fetch_shops(&self, filter: ShopQueryFilter) -> Result<Vec<Shop>, CatalogApiError>;

    /// Products whose name or model contains `search`, together with their category and attributes.
    async fn search_products(&self, search: Option<String>) -> Result<Vec<ProductDetails>, CatalogApiError>;

    /// Listings whose product name or model contains `search`.
    async fn search_listings(&self, search: Option<String>) -> Result<Vec<ListingDetails>, CatalogApiError>;

    async fn fetch_parameters(&self) -> Result<Vec<Parameter>, CatalogApiError>;

    /// Reconciles a price list against the catalog on behalf of `seller_id`, atomically.
    ///
    /// * The shop is created if needed, and its owner is set to the seller either way.
    /// * Categories are upserted by id and linked to the shop.
    /// * Products are matched on (name, model, category), and created when there is no match.
    /// * Listings are matched on every one of their values (ext id, quantity, price, recommended price, product and
    ///   shop). A good whose price or stock changed since the last upload therefore gets a *new* listing, while the
    ///   old one stays in place for existing orders.
    /// * Parameters are matched by name, and attributes on (value, parameter, product).
    async fn import_price_list(&self, seller_id: i64, price_list: PriceList) -> Result<ImportSummary, CatalogApiError>;
}
