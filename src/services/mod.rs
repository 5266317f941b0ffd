//! Entity services - product, basket, and order request handlers.
//!
//! Each service is the whole backend of one entity: it routes an inbound
//! [`Request`](crate::gateway::Request) to one of a fixed set of operations,
//! reads and writes its own table, and answers with the uniform envelope.
//! Services share nothing but the store and bus abstractions; every request
//! is handled by a stateless invocation.
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
//! let response = products.handle(
//!     &Request::post("/product").with_json_body(&json!({ "name": "Shoe" })),
//! );
//! assert!(response.is_success());
//! ```

mod basket;
mod error;
mod order;
mod product;

pub use basket::{BasketRoute, BasketService};
pub use error::HandlerError;
pub use order::{OrderRoute, OrderService};
pub use product::{ProductRoute, ProductService};

use crate::bus::EventPattern;
use crate::gateway::Request;
use crate::store::Record;

/// Source tag carried by checkout events.
pub const CHECKOUT_SOURCE: &str = "checkoutbasket";

/// Detail-type tag carried by checkout events.
pub const CHECKOUT_DETAIL_TYPE: &str = "CheckoutBasketRule";

/// Name of the relay rule subscribing the order service to checkouts.
pub const CHECKOUT_RULE_NAME: &str = "CheckoutBasketRule";

/// The pattern checkout consumers subscribe with.
pub fn checkout_pattern() -> EventPattern {
    EventPattern::new(CHECKOUT_SOURCE, CHECKOUT_DETAIL_TYPE)
}

/// Parse a request body as a JSON object.
pub(crate) fn body_object(request: &Request) -> Result<Record, HandlerError> {
    request
        .json_body()?
        .as_object()
        .cloned()
        .ok_or_else(|| HandlerError::DecodeFailed("request body must be a JSON object".to_string()))
}
