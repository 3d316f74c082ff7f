use actix_web::{
    body::to_bytes,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use bazaar_engine::{
    bazaar_api::order_objects::{OrderDetails, OrderedItem},
    db_types::{Contact, Order, OrderStatusType, Price, UserType},
};
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;
use serde_json::Value;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenValidator},
    config::AuthConfig,
    middleware::JwtMiddlewareFactory,
    server::json_config,
};

// DO NOT re-use this secret anywhere.
const TEST_SECRET: &str = "endpoint-tests-only-secret-0123456789";

pub const BUYER_ID: i64 = 10;
pub const SELLER_ID: i64 = 20;

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET, Duration::hours(1))
}

pub fn token_for(user_id: i64, user_type: UserType) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(user_id, user_type).expect("Failed to issue token")
}

pub fn buyer_token() -> String {
    token_for(BUYER_ID, UserType::Buyer)
}

pub fn seller_token() -> String {
    token_for(SELLER_ID, UserType::Seller)
}

pub fn inactive_token() -> String {
    let claims = JwtClaims {
        sub: BUYER_ID,
        user_type: UserType::Buyer,
        is_active: false,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).expect("Failed to sign")
}

/// Sends `req` with an optional bearer token to an app built by `configure` and behind the JWT middleware. Returns the
/// status and the body, parsed as JSON where possible.
pub async fn send<F>(req: TestRequest, token: Option<&str>, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let req = match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    };
    let validator = TokenValidator::new(&get_auth_config());
    let app = App::new().app_data(json_config()).wrap(JwtMiddlewareFactory::new(validator)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let bytes = to_bytes(res.into_body()).await.ok().unwrap_or_default();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub fn order(id: i64, user_id: i64, status: &str) -> Order {
    Order {
        id,
        user_id,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        status: OrderStatusType::from(status),
    }
}

/// An order holding a single item worth `total`.
pub fn order_details(id: i64, user_id: i64, status: &str, total: i64) -> OrderDetails {
    let item = OrderedItem {
        id: id * 100,
        order_id: id,
        quantity: 1,
        listing_id: 11,
        ext_id: 4216292,
        price: Price::from(total),
        price_rrc: Price::from(total),
        shop_id: 1,
        shop_name: "Svyaznoy".into(),
        product_id: 4,
        product_name: "Smartphone Apple iPhone XS Max 512GB (gold)".into(),
        product_model: "apple/iphone/xs-max".into(),
    };
    OrderDetails::new(order(id, user_id, status), vec![item])
}

pub fn contact(id: i64, user_id: i64) -> Contact {
    Contact {
        id,
        user_id,
        country: "Russia".into(),
        region: "Moscow".into(),
        zip: "101000".into(),
        city: "Moscow".into(),
        street: "Tverskaya".into(),
        house: "1".into(),
        building: None,
        apartment: Some("12".into()),
        phone: "+7 (495) 123-45-67".into(),
    }
}
