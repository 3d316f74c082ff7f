use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::events::EventProducer;
use tokio::sync::mpsc;

use super::helpers::{buyer_token, send, seller_token, SELLER_ID};
use crate::{
    import_worker::{ImportJob, PriceListUploads},
    routes::UploadPriceListRoute,
};

const PRICE_LIST: &str = "shop: Svyaznoy\ncategories:\n  - id: 224\n    name: Smartphones\ngoods: []\n";

fn configure(uploads: PriceListUploads) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(uploads)).service(UploadPriceListRoute::new());
    }
}

fn uploads(dir: &std::path::Path) -> (PriceListUploads, mpsc::Receiver<ImportJob>) {
    let (sender, receiver) = mpsc::channel(4);
    (PriceListUploads::new(dir, EventProducer::new(sender)), receiver)
}

#[actix_web::test]
async fn seller_uploads_a_price_list() {
    let _ = env_logger::try_init().ok();
    let dir = tempfile::tempdir().unwrap();
    let (uploads, mut jobs) = uploads(dir.path());
    let token = seller_token();
    let req = TestRequest::post().uri("/seller/price_list").set_payload(PRICE_LIST);
    let (status, body) = send(req, Some(&token), configure(uploads)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let job = jobs.try_recv().expect("An import job should have been queued");
    assert_eq!(job.seller_id, SELLER_ID);
    assert!(job.path.starts_with(dir.path()));
    let stored = std::fs::read_to_string(&job.path).unwrap();
    assert_eq!(stored, PRICE_LIST);
}

#[actix_web::test]
async fn empty_price_lists_are_rejected() {
    let _ = env_logger::try_init().ok();
    let dir = tempfile::tempdir().unwrap();
    let (uploads, mut jobs) = uploads(dir.path());
    let token = seller_token();
    let req = TestRequest::post().uri("/seller/price_list").set_payload("  \n");
    let (status, body) = send(req, Some(&token), configure(uploads)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not read request body: The price list is empty");
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn only_sellers_upload_price_lists() {
    let _ = env_logger::try_init().ok();
    let dir = tempfile::tempdir().unwrap();
    let (uploads, mut jobs) = uploads(dir.path());
    let token = buyer_token();
    let req = TestRequest::post().uri("/seller/price_list").set_payload(PRICE_LIST);
    let (status, body) = send(req, Some(&token), configure(uploads)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only for shops");
    assert!(jobs.try_recv().is_err());
}

#[actix_web::test]
async fn anonymous_uploads_are_rejected() {
    let _ = env_logger::try_init().ok();
    let dir = tempfile::tempdir().unwrap();
    let (uploads, _jobs) = uploads(dir.path());
    let req = TestRequest::post().uri("/seller/price_list").set_payload(PRICE_LIST);
    let (status, body) = send(req, None, configure(uploads)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Authentication Error. Log in required");
}
