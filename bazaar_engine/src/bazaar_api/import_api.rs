use std::{fmt::Debug, path::Path};

use log::*;

use crate::{
    bazaar_api::{catalog_objects::ImportSummary, price_list::PriceList},
    traits::{CatalogApiError, CatalogManagement},
};

/// `CatalogImportApi` takes a seller's price list, from a file or from memory, and reconciles it against the catalog.
pub struct CatalogImportApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogImportApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogImportApi ({:?})", self.db)
    }
}

impl<B> CatalogImportApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Reads a YAML price list from disk and imports it on behalf of `seller_id`.
    pub async fn import_file<P: AsRef<Path>>(&self, path: P, seller_id: i64) -> Result<ImportSummary, CatalogApiError> {
        let path = path.as_ref();
        debug!("📦️ Reading price list {} uploaded by seller #{seller_id}", path.display());
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogApiError::FileError(format!("{}: {e}", path.display())))?;
        self.import_yaml(seller_id, &text).await
    }

    pub async fn import_yaml(&self, seller_id: i64, text: &str) -> Result<ImportSummary, CatalogApiError> {
        let price_list = PriceList::from_yaml(text)?;
        self.import(seller_id, price_list).await
    }

    pub async fn import(&self, seller_id: i64, price_list: PriceList) -> Result<ImportSummary, CatalogApiError> {
        price_list.check()?;
        trace!(
            "📦️ Importing '{}': {} categories, {} goods",
            price_list.shop,
            price_list.categories.len(),
            price_list.goods.len()
        );
        let summary = self.db.import_price_list(seller_id, price_list).await?;
        info!("📦️ Price list for shop #{} imported for seller #{seller_id}", summary.shop_id);
        Ok(summary)
    }
}
