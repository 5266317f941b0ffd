//! Checkout hand-off tests - basket publish through relay to order ingest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use storefront_rust::bus::{start_relay, InMemoryEventBus, Rule};
use storefront_rust::gateway::Request;
use storefront_rust::services::{checkout_pattern, BasketService};
use storefront_rust::store::{MemoryTable, RecordStore};

use crate::support::checkout_fixture;

fn alice_basket() -> serde_json::Value {
    json!({
        "userName": "alice",
        "items": [
            { "productId": "p1", "productName": "Shoe", "quantity": 1, "color": "red", "price": 30.0 },
            { "productId": "p2", "productName": "Hat", "quantity": 1, "color": "blue", "price": 12.0 },
        ],
    })
}

#[test]
fn checkout_creates_an_order_downstream() {
    let fixture = checkout_fixture();
    fixture
        .basket
        .handle(&Request::post("/basket").with_json_body(&alice_basket()));

    let response = fixture.basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "alice" })),
    );
    assert!(response.is_success());

    let stats = fixture.bus.deliver_pending();
    assert_eq!(stats.delivered, 1);

    let orders = fixture.order.get("alice").unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["userName"], json!("alice"));
    assert_eq!(orders[0]["totalPrice"], json!(42.0));
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 2);
    assert!(orders[0]["orderDate"].as_str().is_some());
}

#[test]
fn checkout_acknowledges_before_any_delivery() {
    let fixture = checkout_fixture();
    fixture
        .basket
        .handle(&Request::post("/basket").with_json_body(&alice_basket()));

    let response = fixture.basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "alice" })),
    );

    // The publisher is answered while the event is still pending.
    assert!(response.is_success());
    assert_eq!(fixture.bus.pending(), 1);
    assert!(fixture.order.get("alice").unwrap().is_empty());
}

#[test]
fn checkout_leaves_the_basket_in_place() {
    let fixture = checkout_fixture();
    fixture
        .basket
        .handle(&Request::post("/basket").with_json_body(&alice_basket()));

    fixture.basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "alice" })),
    );
    fixture.bus.deliver_pending();

    let fetched = fixture.basket.handle(
        &Request::get("/basket/alice").with_path_parameter("userName", "alice"),
    );
    assert_eq!(fetched.data().unwrap(), &alice_basket());
}

#[test]
fn checkout_succeeds_when_the_consumer_fails() {
    let bus = InMemoryEventBus::new("test-events");
    bus.rule(
        Rule::new("CheckoutBasketRule", checkout_pattern())
            .with_target(|_| Err("consumer exploded".into())),
    );
    let basket = BasketService::new(
        Arc::new(MemoryTable::new("basket", "userName")),
        bus.clone(),
    );

    basket.handle(&Request::post("/basket").with_json_body(&alice_basket()));
    let response = basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "alice" })),
    );

    // The consumer's failure is the relay's problem, never the publisher's.
    assert!(response.is_success());

    let stats = bus.deliver_pending();
    assert_eq!(stats.retried, 1);
    assert_eq!(stats.dead, 1);
}

#[test]
fn checkout_of_an_absent_basket_publishes_an_empty_snapshot() {
    let fixture = checkout_fixture();

    let response = fixture.basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "ghost" })),
    );
    assert!(response.is_success());

    fixture.bus.deliver_pending();

    let orders = fixture.order.get("ghost").unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["totalPrice"], json!(0.0));
    assert_eq!(orders[0]["items"], json!([]));
}

#[test]
fn checkout_without_user_name_is_a_failure_envelope() {
    let fixture = checkout_fixture();
    let response = fixture
        .basket
        .handle(&Request::post("/basket/checkout").with_json_body(&json!({})));

    assert_eq!(response.status_code, 500);
}

#[test]
fn relay_worker_carries_the_checkout_in_the_background() {
    let fixture = checkout_fixture();
    let relay = start_relay(fixture.bus.clone(), Duration::from_millis(10));

    fixture
        .basket
        .handle(&Request::post("/basket").with_json_body(&alice_basket()));
    fixture.basket.handle(
        &Request::post("/basket/checkout").with_json_body(&json!({ "userName": "alice" })),
    );

    // Wait for the background delivery.
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if !fixture.order_table.query("alice").unwrap().is_empty() {
            break;
        }
        assert!(Instant::now() < deadline, "order never arrived");
        std::thread::sleep(Duration::from_millis(5));
    }

    let stats = relay.stop();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.dead, 0);
}
