//! HTTP transport integration tests.
//!
//! Starts an axum server over in-memory services and exercises the full
//! routed surface with reqwest.

#![cfg(feature = "http")]

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use storefront_rust::bus::RelayHandle;
use storefront_rust::http::{router, AppState};

/// Bind to port 0 and return the base URL plus the running relay.
async fn start_server() -> (String, RelayHandle) {
    let (state, relay) = AppState::in_memory();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), relay)
}

#[tokio::test]
async fn health_check() {
    let (base, _relay) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn product_crud_round_trip() {
    let (base, _relay) = start_server().await;
    let client = reqwest::Client::new();

    // Create
    let resp = client
        .post(format!("{base}/product"))
        .json(&json!({ "name": "Shoe", "category": "shoes,sandals", "price": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Success"));
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // Get
    let body: Value = client
        .get(format!("{base}/product/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["name"], json!("Shoe"));
    assert_eq!(body["data"]["id"], json!(id));

    // Category filter by substring
    let body: Value = client
        .get(format!("{base}/product/{id}?category=shoes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Partial update
    let body: Value = client
        .put(format!("{base}/product/{id}"))
        .json(&json!({ "price": 42 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"], json!({ "price": 42 }));

    // Delete, twice: idempotent
    for _ in 0..2 {
        let resp = client
            .delete(format!("{base}/product/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    // Gone
    let body: Value = client
        .get(format!("{base}/product/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn checkout_flows_through_to_the_order_service() {
    let (base, _relay) = start_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/basket"))
        .json(&json!({
            "userName": "alice",
            "items": [
                { "productId": "p1", "productName": "Shoe", "quantity": 1, "color": "red", "price": 42.0 },
            ],
        }))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/basket/checkout"))
        .json(&json!({ "userName": "alice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["published"], json!(true));

    // Delivery is asynchronous; poll the order surface until it lands.
    let deadline = Instant::now() + Duration::from_secs(2);
    let orders = loop {
        let body: Value = client
            .get(format!("{base}/order/alice"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let orders = body["data"].as_array().unwrap().clone();
        if !orders.is_empty() {
            break orders;
        }
        assert!(Instant::now() < deadline, "order never arrived");
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(orders[0]["userName"], json!("alice"));
    assert_eq!(orders[0]["totalPrice"], json!(42.0));
}

#[tokio::test]
async fn verbs_outside_the_surface_get_the_failure_envelope() {
    let (base, _relay) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(format!("{base}/product"))
        .json(&json!({ "name": "Shoe" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Internal Server Error"));
    assert!(body["errorMessage"].as_str().unwrap().contains("PATCH"));
}

#[tokio::test]
async fn missing_basket_reads_as_empty_object() {
    let (base, _relay) = start_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{base}/basket/nobody"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], json!("Success"));
    assert_eq!(body["data"], json!({}));
}
