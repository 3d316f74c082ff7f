use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{
    bazaar_api::order_objects::PlacedOrder,
    events::EventProducers,
    traits::OrderFlowError,
    BasketApi,
};
use serde_json::json;

use super::{
    helpers::{buyer_token, order, order_details, send, BUYER_ID, SELLER_ID},
    mocks::MockBackend,
};
use crate::routes::{MyOrdersRoute, PlaceOrderRoute};

fn configure(mock: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(BasketApi::new(mock, EventProducers::default())))
            .service(MyOrdersRoute::<MockBackend>::new())
            .service(PlaceOrderRoute::<MockBackend>::new());
    }
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_orders_for_buyer().withf(|user_id| *user_id == BUYER_ID).times(1).returning(|_| {
        Ok(vec![order_details(7, BUYER_ID, "sent", 1_500), order_details(4, BUYER_ID, "new", 300)])
    });
    let token = buyer_token();
    let (status, body) = send(TestRequest::get().uri("/orders"), Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    let ids = body.as_array().unwrap().iter().map(|o| o["id"].as_i64().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec![7, 4]);
    assert_eq!(body[0]["total_sum"], 1_500);
    assert_eq!(body[0]["ordered_items"][0]["quantity"], 1);
    assert_eq!(body[0]["ordered_items"][0]["shop_name"], "Svyaznoy");
}

#[actix_web::test]
async fn place_order() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_has_contacts().returning(|_| Ok(true));
    mock.expect_promote_basket()
        .withf(|user_id, order_id| *user_id == BUYER_ID && *order_id == 5)
        .times(1)
        .returning(|user_id, order_id| Ok(Some(PlacedOrder { order: order(order_id, user_id, "new"), seller_id: Some(SELLER_ID) })));
    let token = buyer_token();
    let req = TestRequest::post().uri("/orders").set_json(json!({"id": "5"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["id"], 5);
    assert_eq!(body["order"]["status"], "new");
}

#[actix_web::test]
async fn place_order_without_contacts() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_has_contacts().returning(|_| Ok(false));
    mock.expect_promote_basket().never();
    let token = buyer_token();
    let req = TestRequest::post().uri("/orders").set_json(json!({"id": 5}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Contact details for delivery are not specified");
}

#[actix_web::test]
async fn place_someone_elses_order() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_has_contacts().returning(|_| Ok(true));
    mock.expect_promote_basket().returning(|_, _| Ok(None));
    let token = buyer_token();
    let req = TestRequest::post().uri("/orders").set_json(json!({"id": 6}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. id (order #6 is not your basket)");
}

#[actix_web::test]
async fn place_empty_basket() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_has_contacts().returning(|_| Ok(true));
    mock.expect_promote_basket().returning(|_, order_id| Err(OrderFlowError::EmptyOrder(order_id)));
    let token = buyer_token();
    let req = TestRequest::post().uri("/orders").set_json(json!({"id": 5}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Order 5 has no items");
}

#[actix_web::test]
async fn place_order_without_an_id() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_promote_basket().never();
    let token = buyer_token();
    let req = TestRequest::post().uri("/orders").set_json(json!({}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. id");
}

#[actix_web::test]
async fn database_failures_are_not_leaked() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_orders_for_buyer().returning(|_| Err(OrderFlowError::DatabaseError("disk I/O error".into())));
    let token = buyer_token();
    let (status, body) = send(TestRequest::get().uri("/orders"), Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An error occurred on the backend of the server.");
}
