//! storefront_rust - e-commerce microservices over a schemaless key-value
//! store.
//!
//! Three independent services (product catalog, shopping basket, order)
//! share the same building blocks: a per-entity request router, a safe
//! partial-update builder, and an event relay that carries the checkout
//! hand-off from the basket service to the order service.
//!
//! ## Quick Start
//!
//! ```
//! use serde_json::json;
//! use storefront_rust::gateway::Request;
//! use storefront_rust::services::ProductService;
//! use storefront_rust::store::MemoryTable;
//!
//! let products = ProductService::new(MemoryTable::new("product", "id"));
//!
//! let created = products.handle(
//!     &Request::post("/product").with_json_body(&json!({ "name": "Shoe" })),
//! );
//! let id = created.data().unwrap()["id"].as_str().unwrap().to_string();
//!
//! let fetched = products.handle(
//!     &Request::get(format!("/product/{id}")).with_path_parameter("id", &id),
//! );
//! assert_eq!(fetched.data().unwrap()["name"], json!("Shoe"));
//! ```
//!
//! The `http` feature adds an axum front door over the same services; see
//! [`http`].

pub mod bus;
pub mod config;
pub mod gateway;
pub mod services;
pub mod store;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
pub mod http;

pub use bus::{BusEvent, EventPattern, EventPublisher, InMemoryEventBus, Rule};
pub use config::TableConfig;
pub use gateway::{Method, Request, Response};
pub use services::{BasketService, HandlerError, OrderService, ProductService};
pub use store::{MemoryTable, Record, RecordKey, RecordStore, UpdateExpression};
