use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};

use bazaar_engine::{
    events::{EventHandler, EventProducer, Handler},
    CatalogImportApi,
    SqliteDatabase,
};
use chrono::Utc;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

/// A price list waiting to be imported on behalf of a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    pub path: PathBuf,
    pub seller_id: i64,
}

/// Creates the import queue. Every job reads the stored document, imports it, and logs the outcome. Failed imports are
/// not retried; the seller has to upload again.
pub fn import_worker(db: SqliteDatabase, buffer_size: usize) -> EventHandler<ImportJob> {
    let handler: Handler<ImportJob> = Arc::new(move |job: ImportJob| {
        let api = CatalogImportApi::new(db.clone());
        Box::pin(async move {
            match api.import_file(&job.path, job.seller_id).await {
                Ok(summary) => info!(
                    "📦️ Imported {} for seller #{}: shop #{}, {} categories, {} products, {} new listings, {} \
                     attributes",
                    job.path.display(),
                    job.seller_id,
                    summary.shop_id,
                    summary.categories,
                    summary.products,
                    summary.new_listings,
                    summary.attributes
                ),
                Err(e) => error!("📦️ Could not import {} for seller #{}. {e}", job.path.display(), job.seller_id),
            }
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    EventHandler::new(buffer_size, handler)
}

/// Stores uploaded price lists and queues them for the import worker.
#[derive(Clone)]
pub struct PriceListUploads {
    dir: PathBuf,
    producer: EventProducer<ImportJob>,
}

impl PriceListUploads {
    pub fn new<P: Into<PathBuf>>(dir: P, producer: EventProducer<ImportJob>) -> Self {
        Self { dir: dir.into(), producer }
    }

    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    /// Writes the document to the upload directory and queues it. Returns the path it was stored under.
    pub async fn store_and_queue(&self, seller_id: i64, document: &[u8]) -> Result<PathBuf, ServerError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let suffix = thread_rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect::<String>();
        let file_name = format!("price_list_{seller_id}_{}_{suffix}.yaml", Utc::now().format("%Y%m%d%H%M%S"));
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, document).await?;
        debug!("📦️ Stored price list from seller #{seller_id} at {}", path.display());
        self.producer.publish_event(ImportJob { path: path.clone(), seller_id }).await;
        Ok(path)
    }
}
