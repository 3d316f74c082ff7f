use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{
    bazaar_api::catalog_objects::{AttributeValue, ListingDetails, ProductDetails, ShopQueryFilter},
    db_types::{Category, Parameter, Price, Shop},
    traits::CatalogApiError,
    CatalogApi,
};
use serde_json::json;

use super::{helpers::send, mocks::MockBackend};
use crate::routes::{health, CategoriesRoute, ListingsRoute, ParametersRoute, ProductsRoute, ShopsRoute};

fn configure(mock: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CatalogApi::new(mock)))
            .service(health)
            .service(CategoriesRoute::<MockBackend>::new())
            .service(ShopsRoute::<MockBackend>::new())
            .service(ProductsRoute::<MockBackend>::new())
            .service(ListingsRoute::<MockBackend>::new())
            .service(ParametersRoute::<MockBackend>::new());
    }
}

fn svyaznoy(is_work: bool) -> Shop {
    Shop { id: 1, name: "Svyaznoy".into(), url: None, seller_id: Some(20), is_work }
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = send(TestRequest::get().uri("/health"), None, configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn categories_by_name() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_categories()
        .withf(|name| name.as_deref() == Some("Smartphones"))
        .times(1)
        .returning(|_| Ok(vec![Category { id: 224, name: "Smartphones".into() }]));
    let (status, body) =
        send(TestRequest::get().uri("/categories?name=Smartphones"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 224, "name": "Smartphones"}]));
}

#[actix_web::test]
async fn blank_searches_are_unfiltered() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_categories().withf(|name| name.is_none()).times(1).returning(|_| Ok(vec![]));
    let (status, body) = send(TestRequest::get().uri("/categories?name=%20"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn shops_by_work_flag() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_shops()
        .withf(|filter| *filter == ShopQueryFilter::default().with_is_work(true))
        .times(1)
        .returning(|_| Ok(vec![svyaznoy(true)]));
    let (status, body) = send(TestRequest::get().uri("/shops?is_work=yes"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Svyaznoy");
    assert_eq!(body[0]["is_work"], true);
}

#[actix_web::test]
async fn unrecognised_work_flags_are_ignored() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_shops()
        .withf(|filter| *filter == ShopQueryFilter::default().with_name("Svyaznoy"))
        .times(1)
        .returning(|_| Ok(vec![svyaznoy(false)]));
    let (status, _) =
        send(TestRequest::get().uri("/shops?name=Svyaznoy&is_work=maybe"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn search_products() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_search_products().withf(|s| s.as_deref() == Some("iPhone")).returning(|_| {
        Ok(vec![ProductDetails {
            id: 4,
            name: "Smartphone Apple iPhone XS Max 512GB (gold)".into(),
            model: "apple/iphone/xs-max".into(),
            category_id: 224,
            category_name: "Smartphones".into(),
            attributes: vec![AttributeValue { product_id: 4, parameter: "Colour".into(), value: "gold".into() }],
        }])
    });
    let (status, body) = send(TestRequest::get().uri("/products?search=iPhone"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["category_name"], "Smartphones");
    assert_eq!(body[0]["attributes"], json!([{"parameter": "Colour", "value": "gold"}]));
}

#[actix_web::test]
async fn search_listings() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_search_listings().withf(|s| s.as_deref() == Some("xs")).returning(|_| {
        Ok(vec![ListingDetails {
            id: 11,
            ext_id: 4216292,
            quantity: 14,
            price: Price::from(110_000),
            price_rrc: Price::from(116_990),
            shop_id: 1,
            shop_name: "Svyaznoy".into(),
            product_id: 4,
            product_name: "Smartphone Apple iPhone XS Max 512GB (gold)".into(),
            product_model: "apple/iphone/xs-max".into(),
            category_id: 224,
        }])
    });
    let (status, body) = send(TestRequest::get().uri("/listings?search=xs"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["price"], 110_000);
    assert_eq!(body[0]["shop_name"], "Svyaznoy");
}

#[actix_web::test]
async fn list_parameters() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_parameters()
        .returning(|| Ok(vec![Parameter { id: 1, name: "Diagonal (inches)".into() }, Parameter {
            id: 2,
            name: "Colour".into(),
        }]));
    let (status, body) = send(TestRequest::get().uri("/parameters"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["name"], "Colour");
}

#[actix_web::test]
async fn catalog_failures_are_server_errors() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_parameters().returning(|| Err(CatalogApiError::DatabaseError("database is locked".into())));
    let (status, _) = send(TestRequest::get().uri("/parameters"), None, configure(mock)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
