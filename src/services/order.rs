//! Order service - read-only route surface, written by the checkout relay.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

use crate::bus::{BusEvent, Rule};
use crate::config::TableConfig;
use crate::gateway::{Method, Request, Response};
use crate::store::{Record, RecordStore};

use super::error::HandlerError;
use super::{checkout_pattern, CHECKOUT_RULE_NAME};

/// The operations the order route surface dispatches to.
///
/// Clients can only read orders; writes happen exclusively through
/// [`OrderService::ingest`] when a checkout event arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderRoute {
    /// `GET /order`
    List,
    /// `GET /order/{userName}`
    Get { user_name: String },
}

impl OrderRoute {
    /// Select the operation for a request.
    pub fn resolve(request: &Request) -> Result<Self, HandlerError> {
        match &request.method {
            Method::Get => Ok(match request.path_parameter("userName") {
                Some(user_name) => OrderRoute::Get {
                    user_name: user_name.to_string(),
                },
                None => OrderRoute::List,
            }),
            method => Err(HandlerError::UnsupportedMethod(method.as_str().to_string())),
        }
    }
}

/// Reads over the order table, plus the checkout event consumer.
pub struct OrderService<S> {
    store: S,
    config: TableConfig,
}

impl<S: RecordStore> OrderService<S> {
    /// Create a service over a store with the default order config.
    pub fn new(store: S) -> Self {
        Self::with_config(store, TableConfig::order())
    }

    /// Create a service with an injected config.
    pub fn with_config(store: S, config: TableConfig) -> Self {
        Self { store, config }
    }

    /// Entry point: route, dispatch, and wrap the result in the envelope.
    pub fn handle(&self, request: &Request) -> Response {
        info!(method = %request.method, path = %request.path, "order request");
        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(error) => {
                error!(%error, "order request failed");
                Response::failure(&error)
            }
        }
    }

    fn dispatch(&self, request: &Request) -> Result<Value, HandlerError> {
        let route = OrderRoute::resolve(request)?;
        let records = match route {
            OrderRoute::List => self.list()?,
            OrderRoute::Get { user_name } => self.get(&user_name)?,
        };
        Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
    }

    /// Every order in the table.
    pub fn list(&self) -> Result<Vec<Record>, HandlerError> {
        Ok(self.store.scan()?)
    }

    /// A user's orders, ordered by `orderDate`.
    pub fn get(&self, user_name: &str) -> Result<Vec<Record>, HandlerError> {
        Ok(self.store.query(user_name)?)
    }

    /// Consume a checkout event: stamp the order date and persist the order.
    pub fn ingest(&self, event: &BusEvent) -> Result<Record, HandlerError> {
        let mut order = event.detail.as_object().cloned().ok_or_else(|| {
            HandlerError::DecodeFailed("checkout event detail must be a JSON object".to_string())
        })?;

        let sort_key = self.config.sort_key.as_deref().unwrap_or("orderDate");
        order.insert(
            sort_key.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let user = order
            .get(&self.config.primary_key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        info!(event = %event.id, user = %user, "ingesting checkout event");

        self.store.put(order.clone())?;
        Ok(order)
    }

    /// The relay rule that feeds this service checkout events.
    pub fn checkout_rule(self: Arc<Self>) -> Rule
    where
        S: 'static,
    {
        Rule::new(CHECKOUT_RULE_NAME, checkout_pattern()).with_target(move |event| {
            self.ingest(event)?;
            Ok(())
        })
    }
}
