//! Order service tests - read-only surface over relay-written records.

use serde_json::json;
use storefront_rust::bus::BusEvent;
use storefront_rust::gateway::Request;
use storefront_rust::services::{CHECKOUT_DETAIL_TYPE, CHECKOUT_SOURCE};
use storefront_rust::store::RecordStore;

use crate::support::checkout_fixture;

fn order_record(user: &str, date: &str) -> storefront_rust::store::Record {
    json!({ "userName": user, "orderDate": date, "totalPrice": 10.0 })
        .as_object()
        .unwrap()
        .clone()
}

#[test]
fn orders_for_a_user_come_back_sorted_by_date() {
    let fixture = checkout_fixture();
    fixture
        .order_table
        .put(order_record("alice", "2024-06-02T00:00:00Z"))
        .unwrap();
    fixture
        .order_table
        .put(order_record("alice", "2024-06-01T00:00:00Z"))
        .unwrap();
    fixture
        .order_table
        .put(order_record("bob", "2024-06-03T00:00:00Z"))
        .unwrap();

    let response = fixture.order.handle(
        &Request::get("/order/alice").with_path_parameter("userName", "alice"),
    );
    let orders = response.data().unwrap().as_array().unwrap().clone();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["orderDate"], json!("2024-06-01T00:00:00Z"));
    assert_eq!(orders[1]["orderDate"], json!("2024-06-02T00:00:00Z"));
}

#[test]
fn list_returns_orders_for_every_user() {
    let fixture = checkout_fixture();
    fixture
        .order_table
        .put(order_record("alice", "2024-06-01T00:00:00Z"))
        .unwrap();
    fixture
        .order_table
        .put(order_record("bob", "2024-06-02T00:00:00Z"))
        .unwrap();

    let response = fixture.order.handle(&Request::get("/order"));
    assert_eq!(response.data().unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn client_writes_are_rejected() {
    let fixture = checkout_fixture();
    for request in [
        Request::post("/order").with_json_body(&json!({ "userName": "alice" })),
        Request::delete("/order/alice").with_path_parameter("userName", "alice"),
    ] {
        let response = fixture.order.handle(&request);
        assert_eq!(response.status_code, 500);
        assert!(response.body["errorMessage"]
            .as_str()
            .unwrap()
            .contains("unsupported method"));
    }
}

#[test]
fn ingest_stamps_the_order_date() {
    let fixture = checkout_fixture();

    let event = BusEvent::new(
        CHECKOUT_SOURCE,
        CHECKOUT_DETAIL_TYPE,
        json!({ "userName": "alice", "totalPrice": 42.0, "items": [] }),
    );
    let order = fixture.order.ingest(&event).unwrap();

    assert!(order["orderDate"].as_str().is_some());
    assert_eq!(fixture.order.get("alice").unwrap().len(), 1);
}

#[test]
fn ingest_rejects_a_non_object_detail() {
    let fixture = checkout_fixture();
    let event = BusEvent::new(CHECKOUT_SOURCE, CHECKOUT_DETAIL_TYPE, json!("nonsense"));
    assert!(fixture.order.ingest(&event).is_err());
}
