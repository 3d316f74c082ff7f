//! Read-only access to the catalog.

use std::fmt::Debug;

use crate::{
    bazaar_api::catalog_objects::{ListingDetails, ProductDetails, ShopQueryFilter},
    db_types::{Category, Parameter, Shop},
    traits::{CatalogApiError, CatalogManagement},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn categories(&self, name: Option<String>) -> Result<Vec<Category>, CatalogApiError> {
        self.db.fetch_categories(blank_to_none(name)).await
    }

    pub async fn shops(&self, filter: ShopQueryFilter) -> Result<Vec<Shop>, CatalogApiError> {
        self.db.fetch_shops(filter).await
    }

    pub async fn products(&self, search: Option<String>) -> Result<Vec<ProductDetails>, CatalogApiError> {
        self.db.search_products(blank_to_none(search)).await
    }

    pub async fn listings(&self, search: Option<String>) -> Result<Vec<ListingDetails>, CatalogApiError> {
        self.db.search_listings(blank_to_none(search)).await
    }

    pub async fn parameters(&self) -> Result<Vec<Parameter>, CatalogApiError> {
        self.db.fetch_parameters().await
    }
}

/// An empty query string means "no filter".
fn blank_to_none(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
