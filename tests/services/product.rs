//! Product service tests - full CRUD through the request entry point.

use serde_json::json;
use storefront_rust::gateway::{Method, Request};
use storefront_rust::services::ProductService;

use crate::support::{product_service, FailingStore};

#[test]
fn create_generates_an_id_and_get_round_trips() {
    let products = product_service();

    let created = products.handle(
        &Request::post("/product").with_json_body(&json!({ "name": "Shoe" })),
    );
    assert!(created.is_success());

    let id = created.data().unwrap()["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let fetched = products.handle(
        &Request::get(format!("/product/{id}")).with_path_parameter("id", &id),
    );
    assert_eq!(
        fetched.data().unwrap(),
        &json!({ "name": "Shoe", "id": id })
    );
}

#[test]
fn create_overwrites_a_caller_supplied_id() {
    let products = product_service();

    let created = products.handle(
        &Request::post("/product").with_json_body(&json!({ "id": "mine", "name": "Shoe" })),
    );

    let id = created.data().unwrap()["id"].as_str().unwrap();
    assert_ne!(id, "mine");
}

#[test]
fn list_returns_every_product() {
    let products = product_service();
    for name in ["Shoe", "Hat", "Sock"] {
        products.handle(&Request::post("/product").with_json_body(&json!({ "name": name })));
    }

    let listed = products.handle(&Request::get("/product"));
    assert_eq!(listed.data().unwrap().as_array().unwrap().len(), 3);
}

#[test]
fn get_unknown_id_is_an_empty_object() {
    let products = product_service();
    let fetched = products.handle(
        &Request::get("/product/nope").with_path_parameter("id", "nope"),
    );
    assert!(fetched.is_success());
    assert_eq!(fetched.data().unwrap(), &json!({}));
}

#[test]
fn update_changes_only_patched_fields() {
    let products = product_service();
    let created = products.handle(
        &Request::post("/product").with_json_body(&json!({ "name": "Shoe", "price": 10 })),
    );
    let id = created.data().unwrap()["id"].as_str().unwrap().to_string();

    let updated = products.handle(
        &Request::put(format!("/product/{id}"))
            .with_path_parameter("id", &id)
            .with_json_body(&json!({ "price": 42 })),
    );
    assert!(updated.is_success());
    assert_eq!(updated.data().unwrap(), &json!({ "price": 42 }));

    let fetched = products.handle(
        &Request::get(format!("/product/{id}")).with_path_parameter("id", &id),
    );
    assert_eq!(fetched.data().unwrap()["name"], json!("Shoe"));
    assert_eq!(fetched.data().unwrap()["price"], json!(42));
}

#[test]
fn update_cannot_move_the_id() {
    let products = product_service();
    let created = products.handle(
        &Request::post("/product").with_json_body(&json!({ "price": 10 })),
    );
    let id = created.data().unwrap()["id"].as_str().unwrap().to_string();

    // A patch naming the key attribute must not move the record.
    let updated = products.handle(
        &Request::put(format!("/product/{id}"))
            .with_path_parameter("id", &id)
            .with_json_body(&json!({ "id": "hijacked", "price": 42 })),
    );
    assert!(updated.is_success());

    let fetched = products.handle(
        &Request::get(format!("/product/{id}")).with_path_parameter("id", &id),
    );
    assert_eq!(fetched.data().unwrap()["id"], json!(id));

    let hijacked = products.handle(
        &Request::get("/product/hijacked").with_path_parameter("id", "hijacked"),
    );
    assert_eq!(hijacked.data().unwrap(), &json!({}));
}

#[test]
fn update_with_only_key_fields_fails() {
    let products = product_service();
    let response = products.handle(
        &Request::put("/product/p1")
            .with_path_parameter("id", "p1")
            .with_json_body(&json!({ "id": "p1" })),
    );
    assert_eq!(response.status_code, 500);
    assert!(response.body["errorMessage"]
        .as_str()
        .unwrap()
        .contains("no settable fields"));
}

#[test]
fn category_filter_matches_by_substring() {
    let products = product_service();
    let created = products.handle(
        &Request::post("/product")
            .with_json_body(&json!({ "name": "Shoe", "category": "shoes,sandals" })),
    );
    let id = created.data().unwrap()["id"].as_str().unwrap().to_string();

    let matched = products.handle(
        &Request::get(format!("/product/{id}"))
            .with_path_parameter("id", &id)
            .with_query_parameter("category", "shoes"),
    );
    assert_eq!(matched.data().unwrap().as_array().unwrap().len(), 1);

    let missed = products.handle(
        &Request::get(format!("/product/{id}"))
            .with_path_parameter("id", &id)
            .with_query_parameter("category", "boots"),
    );
    assert_eq!(missed.data().unwrap(), &json!([]));
}

#[test]
fn delete_is_idempotent() {
    let products = product_service();
    let created = products.handle(
        &Request::post("/product").with_json_body(&json!({ "name": "Shoe" })),
    );
    let id = created.data().unwrap()["id"].as_str().unwrap().to_string();

    let request = Request::delete(format!("/product/{id}")).with_path_parameter("id", &id);
    assert!(products.handle(&request).is_success());
    assert!(products.handle(&request).is_success());
}

#[test]
fn missing_id_on_put_is_a_failure_envelope() {
    let products = product_service();
    let response = products.handle(&Request::put("/product"));

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body["message"], json!("Internal Server Error"));
    assert!(response.body["errorMessage"]
        .as_str()
        .unwrap()
        .contains("\"id\""));
}

#[test]
fn unsupported_method_names_the_verb() {
    let products = product_service();
    let response = products.handle(&Request::new(
        Method::Other("PATCH".to_string()),
        "/product",
    ));

    assert_eq!(response.status_code, 500);
    assert!(response.body["errorMessage"]
        .as_str()
        .unwrap()
        .contains("PATCH"));
}

#[test]
fn store_outage_surfaces_as_the_failure_envelope() {
    let products = ProductService::new(FailingStore);
    let response = products.handle(&Request::get("/product"));

    assert_eq!(response.status_code, 500);
    assert!(response.body["errorStack"]
        .as_str()
        .unwrap()
        .contains("simulated outage"));
}

#[test]
fn malformed_body_is_a_failure_envelope() {
    let products = product_service();
    let response = products.handle(&Request::post("/product").with_body("not json"));

    assert_eq!(response.status_code, 500);
    assert!(response.body["errorMessage"]
        .as_str()
        .unwrap()
        .contains("decode failed"));
}
