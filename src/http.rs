//! HTTP transport - maps a routed HTTP surface onto the entity services.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! Every entity path is bound with `any()` so the HTTP layer stays a thin
//! front door: it forwards the whole request (method included) and each
//! service's own router decides what the method means. That keeps routing
//! behavior identical whether requests arrive over HTTP or are dispatched
//! directly in tests.
//!
//! ## Routes
//!
//! - `/product`, `/product/:id` - product service
//! - `/basket`, `/basket/checkout`, `/basket/:userName` - basket service
//! - `/order`, `/order/:userName` - order service
//! - `GET /health` - health check returning `{ "ok": true, "services": [...] }`
//!
//! ## Example
//!
//! ```ignore
//! use storefront_rust::http::AppState;
//!
//! let (state, relay) = AppState::in_memory();
//! storefront_rust::http::serve(state, "0.0.0.0:3000").await?;
//! relay.stop();
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::json;

use crate::bus::{start_relay, EventPublisher, InMemoryEventBus, RelayHandle};
use crate::config::TableConfig;
use crate::gateway::{Method, Request, Response};
use crate::services::{BasketService, OrderService, ProductService};
use crate::store::{MemoryTable, RecordStore};

/// The three services behind one routed surface.
pub struct AppState<S, P> {
    pub product: ProductService<S>,
    pub basket: BasketService<S, P>,
    pub order: Arc<OrderService<S>>,
}

impl AppState<Arc<MemoryTable>, InMemoryEventBus> {
    /// Wire the services over fresh in-memory tables and a running relay.
    ///
    /// The order service is subscribed to checkout events before the relay
    /// starts. Keep the returned handle alive for as long as the state; the
    /// relay stops when it drops.
    pub fn in_memory() -> (Arc<Self>, RelayHandle) {
        let product_config = TableConfig::product();
        let basket_config = TableConfig::basket();
        let order_config = TableConfig::order();

        let bus = InMemoryEventBus::new("storefront-events");
        let order = Arc::new(OrderService::with_config(
            Arc::new(MemoryTable::from_config(&order_config)),
            order_config,
        ));
        bus.rule(Arc::clone(&order).checkout_rule());
        let relay = start_relay(bus.clone(), Duration::from_millis(20));

        let state = Arc::new(Self {
            product: ProductService::with_config(
                Arc::new(MemoryTable::from_config(&product_config)),
                product_config,
            ),
            basket: BasketService::with_config(
                Arc::new(MemoryTable::from_config(&basket_config)),
                bus,
                basket_config,
            ),
            order,
        });

        (state, relay)
    }
}

/// Build an axum `Router` over the given services.
pub fn router<S, P>(state: Arc<AppState<S, P>>) -> Router
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/product", any(product_collection::<S, P>))
        .route("/product/:id", any(product_item::<S, P>))
        .route("/basket", any(basket_collection::<S, P>))
        .route("/basket/checkout", any(basket_checkout::<S, P>))
        .route("/basket/:userName", any(basket_item::<S, P>))
        .route("/order", any(order_collection::<S, P>))
        .route("/order/:userName", any(order_item::<S, P>))
        .with_state(state)
}

/// Serve the services over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S, P>(state: Arc<AppState<S, P>>, addr: &str) -> Result<(), std::io::Error>
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET /health` - returns `{ "ok": true, "services": [...] }`.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true, "services": ["product", "basket", "order"] }))
}

/// Convert an envelope into an axum response.
fn to_http(response: Response) -> (StatusCode, Json<serde_json::Value>) {
    let status = StatusCode::from_u16(response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body))
}

/// Assemble a gateway request from the HTTP pieces.
fn to_request(
    method: &axum::http::Method,
    path: impl Into<String>,
    query: HashMap<String, String>,
    body: String,
) -> Request {
    let mut request = Request::new(Method::parse(method.as_str()), path);
    request.query_string_parameters = query;
    if !body.is_empty() {
        request.body = Some(body);
    }
    request
}

async fn product_collection<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, "/product", query, body);
    to_http(state.product.handle(&request))
}

async fn product_item<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, format!("/product/{}", id), query, body)
        .with_path_parameter("id", id);
    to_http(state.product.handle(&request))
}

async fn basket_collection<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, "/basket", query, body);
    to_http(state.basket.handle(&request))
}

async fn basket_checkout<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, "/basket/checkout", query, body);
    to_http(state.basket.handle(&request))
}

async fn basket_item<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Path(user_name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, format!("/basket/{}", user_name), query, body)
        .with_path_parameter("userName", user_name);
    to_http(state.basket.handle(&request))
}

async fn order_collection<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, "/order", query, body);
    to_http(state.order.handle(&request))
}

async fn order_item<S, P>(
    State(state): State<Arc<AppState<S, P>>>,
    method: axum::http::Method,
    Path(user_name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse
where
    S: RecordStore + 'static,
    P: EventPublisher + 'static,
{
    let request = to_request(&method, format!("/order/{}", user_name), query, body)
        .with_path_parameter("userName", user_name);
    to_http(state.order.handle(&request))
}
