use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{db_types::NewOrderItem, events::EventProducers, BasketApi};
use serde_json::json;

use super::{
    helpers::{buyer_token, inactive_token, order_details, send, BUYER_ID},
    mocks::MockBackend,
};
use crate::routes::{AddToBasketRoute, BasketRoute, RemoveFromBasketRoute, UpdateBasketRoute};

fn configure(mock: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(BasketApi::new(mock, EventProducers::default())))
            .service(BasketRoute::<MockBackend>::new())
            .service(AddToBasketRoute::<MockBackend>::new())
            .service(UpdateBasketRoute::<MockBackend>::new())
            .service(RemoveFromBasketRoute::<MockBackend>::new());
    }
}

#[actix_web::test]
async fn basket_requires_login() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send(TestRequest::get().uri("/basket"), None, configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Authentication Error. Log in required");
}

#[actix_web::test]
async fn basket_rejects_bad_tokens() {
    let _ = env_logger::try_init().ok();
    let mut token = buyer_token();
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let (status, _) = send(TestRequest::get().uri("/basket"), Some(&token), configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn deactivated_accounts_are_turned_away() {
    let _ = env_logger::try_init().ok();
    let token = inactive_token();
    let (status, body) = send(TestRequest::get().uri("/basket"), Some(&token), configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Authentication Error. This account has been deactivated");
}

#[actix_web::test]
async fn fetch_basket() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_basket()
        .withf(|user_id| *user_id == BUYER_ID)
        .times(1)
        .returning(|_| Ok(Some(order_details(5, BUYER_ID, "basket", 400_000))));
    let token = buyer_token();
    let (status, body) = send(TestRequest::get().uri("/basket"), Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().expect("Expected a list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], 5);
    assert_eq!(orders[0]["status"], "basket");
    assert_eq!(orders[0]["total_sum"], 400_000);
}

#[actix_web::test]
async fn empty_basket_is_an_empty_list() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_basket().returning(|_| Ok(None));
    let token = buyer_token();
    let (status, body) = send(TestRequest::get().uri("/basket"), Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn add_items() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_listing_exists().returning(|_| Ok(true));
    mock.expect_add_basket_items()
        .withf(|user_id, items| *user_id == BUYER_ID && items.to_vec() == vec![NewOrderItem::new(3, 2)])
        .times(1)
        .returning(|_, items| Ok(items.len() as u64));
    let token = buyer_token();
    let req = TestRequest::post().uri("/basket").set_json(json!([{"listing": 3, "quantity": "2"}]));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true, "created": 1}));
}

#[actix_web::test]
async fn add_unknown_listing() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_listing_exists().returning(|id| Ok(id != 99));
    mock.expect_add_basket_items().never();
    let token = buyer_token();
    let req = TestRequest::post()
        .uri("/basket")
        .set_json(json!([{"listing": 3, "quantity": 1}, {"product_info": 99, "quantity": 1}]));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["listing"][0], "Invalid pk \"99\" - object does not exist.");
}

#[actix_web::test]
async fn add_zero_quantity() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_add_basket_items().never();
    let token = buyer_token();
    let req = TestRequest::post().uri("/basket").set_json(json!([{"listing": 3, "quantity": 0}]));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["quantity"][0], "Ensure this value is greater than or equal to 1.");
}

#[actix_web::test]
async fn add_nothing() {
    let _ = env_logger::try_init().ok();
    let token = buyer_token();
    let req = TestRequest::post().uri("/basket").set_json(json!([]));
    let (status, body) = send(req, Some(&token), configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. items");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = buyer_token();
    let req = TestRequest::post()
        .uri("/basket")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("[{\"listing\": 3,");
    let (status, body) = send(req, Some(&token), configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn update_skips_loosely_typed_pairs() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_update_basket_items()
        .withf(|user_id, items| *user_id == BUYER_ID && items.to_vec() == vec![NewOrderItem::new(4, 5)])
        .times(1)
        .returning(|_, _| Ok(1));
    let token = buyer_token();
    let req = TestRequest::put()
        .uri("/basket")
        .set_json(json!([{"listing": "3", "quantity": 2}, {"listing": 4, "quantity": 5}]));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "updated": 1}));
}

#[actix_web::test]
async fn remove_items() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_remove_basket_items()
        .withf(|user_id, ids| *user_id == BUYER_ID && ids.to_vec() == vec![1, 2])
        .times(1)
        .returning(|_, ids| Ok(ids.len() as u64));
    let token = buyer_token();
    let req = TestRequest::delete().uri("/basket").set_json(json!({"items": "1,x,2"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": 2}));
}

#[actix_web::test]
async fn remove_a_single_item_by_number() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_remove_basket_items()
        .withf(|user_id, ids| *user_id == BUYER_ID && ids.to_vec() == vec![7])
        .times(1)
        .returning(|_, _| Ok(1));
    let token = buyer_token();
    let req = TestRequest::delete().uri("/basket").set_json(json!({"items": 7}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": 1}));
}

#[actix_web::test]
async fn remove_items_not_in_basket() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_remove_basket_items().returning(|_, _| Ok(0));
    let token = buyer_token();
    let req = TestRequest::delete().uri("/basket").set_json(json!({"items": "7"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Specify valid items to delete");
}
