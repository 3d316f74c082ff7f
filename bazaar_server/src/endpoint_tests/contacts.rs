use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{db_types::Contact, ContactsApi};
use serde_json::{json, Value};

use super::{
    helpers::{buyer_token, contact, send, BUYER_ID},
    mocks::MockBackend,
};
use crate::routes::{AddContactRoute, DeleteContactsRoute, MyContactsRoute, UpdateContactRoute};

fn configure(mock: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ContactsApi::new(mock)))
            .service(MyContactsRoute::<MockBackend>::new())
            .service(AddContactRoute::<MockBackend>::new())
            .service(UpdateContactRoute::<MockBackend>::new())
            .service(DeleteContactsRoute::<MockBackend>::new());
    }
}

fn new_contact_json() -> Value {
    json!({
        "country": "Russia",
        "region": "Moscow",
        "zip": "101000",
        "city": "Moscow",
        "street": "Tverskaya",
        "house": "1",
        "apartment": "12",
        "phone": "+7 (495) 123-45-67"
    })
}

#[actix_web::test]
async fn list_contacts() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_contacts()
        .withf(|user_id| *user_id == BUYER_ID)
        .returning(|user_id| Ok(vec![contact(1, user_id), contact(2, user_id)]));
    let token = buyer_token();
    let (status, body) = send(TestRequest::get().uri("/contacts"), Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["id"], 2);
    assert_eq!(body[1]["building"], Value::Null);
}

#[actix_web::test]
async fn add_contact() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_insert_contact()
        .withf(|user_id, c| *user_id == BUYER_ID && c.city == "Moscow" && c.building.is_none())
        .times(1)
        .returning(|user_id, _| Ok(contact(9, user_id)));
    let token = buyer_token();
    let req = TestRequest::post().uri("/contacts").set_json(new_contact_json());
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 9);
    assert_eq!(body["user_id"], BUYER_ID);
}

#[actix_web::test]
async fn add_contact_with_missing_fields() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_insert_contact().never();
    let token = buyer_token();
    let mut fields = new_contact_json();
    let obj = fields.as_object_mut().unwrap();
    obj.remove("zip");
    obj.remove("phone");
    let req = TestRequest::post().uri("/contacts").set_json(fields);
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. zip, phone");
}

#[actix_web::test]
async fn add_contact_with_a_long_zip() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_insert_contact().never();
    let token = buyer_token();
    let mut fields = new_contact_json();
    fields["zip"] = json!("12345678901");
    let req = TestRequest::post().uri("/contacts").set_json(fields);
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["zip"][0], "Ensure this field has no more than 10 characters.");
}

#[actix_web::test]
async fn update_contact() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_contact()
        .withf(|user_id, id| *user_id == BUYER_ID && *id == 4)
        .returning(|user_id, id| Ok(Some(contact(id, user_id))));
    mock.expect_save_contact()
        .withf(|c: &Contact| c.id == 4 && c.city == "Tver" && c.street == "Tverskaya")
        .times(1)
        .returning(|c| Ok(Some(c)));
    let token = buyer_token();
    let req = TestRequest::put().uri("/contacts").set_json(json!({"id": "4", "city": "Tver"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Tver");
    assert_eq!(body["zip"], "101000");
}

#[actix_web::test]
async fn update_someone_elses_contact() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_fetch_contact().returning(|_, _| Ok(None));
    mock.expect_save_contact().never();
    let token = buyer_token();
    let req = TestRequest::put().uri("/contacts").set_json(json!({"id": 40, "city": "Tver"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. id (no contact #40 on file)");
}

#[actix_web::test]
async fn update_contact_without_an_id() {
    let _ = env_logger::try_init().ok();
    let token = buyer_token();
    let req = TestRequest::put().uri("/contacts").set_json(json!({"city": "Tver"}));
    let (status, body) = send(req, Some(&token), configure(MockBackend::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. id");
}

#[actix_web::test]
async fn delete_contacts() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_delete_contacts()
        .withf(|user_id, ids| *user_id == BUYER_ID && ids.to_vec() == vec![4, 5])
        .times(1)
        .returning(|_, _| Ok(1));
    let token = buyer_token();
    let req = TestRequest::delete().uri("/contacts").set_json(json!({"items": "4,5"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": 1}));
}

#[actix_web::test]
async fn deleting_nothing_is_fine() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_delete_contacts().withf(|_, ids| ids.to_vec() == vec![400]).returning(|_, _| Ok(0));
    let token = buyer_token();
    let req = TestRequest::delete().uri("/contacts").set_json(json!({"items": 400}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 0);
}

#[actix_web::test]
async fn delete_without_valid_ids() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockBackend::new();
    mock.expect_delete_contacts().never();
    let token = buyer_token();
    let req = TestRequest::delete().uri("/contacts").set_json(json!({"items": "a,b"}));
    let (status, body) = send(req, Some(&token), configure(mock)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not all required arguments were provided. items");
}
