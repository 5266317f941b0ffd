//! Basket service - user-identified baskets and the checkout publish.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::bus::{BusEvent, EventPublisher};
use crate::config::TableConfig;
use crate::gateway::{Method, Request, Response};
use crate::store::{Record, RecordKey, RecordStore};

use super::error::HandlerError;
use super::{body_object, CHECKOUT_DETAIL_TYPE, CHECKOUT_SOURCE};

/// The operations the basket route surface dispatches to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BasketRoute {
    /// `GET /basket`
    List,
    /// `GET /basket/{userName}`
    Get { user_name: String },
    /// `POST /basket`
    Create,
    /// `POST /basket/checkout`
    Checkout,
    /// `DELETE /basket/{userName}`
    Delete { user_name: String },
}

impl BasketRoute {
    /// Select the operation for a request.
    ///
    /// The checkout sub-path is checked before the generic create rule;
    /// both arrive as `POST`.
    pub fn resolve(request: &Request) -> Result<Self, HandlerError> {
        match &request.method {
            Method::Get => Ok(match request.path_parameter("userName") {
                Some(user_name) => BasketRoute::Get {
                    user_name: user_name.to_string(),
                },
                None => BasketRoute::List,
            }),
            Method::Post => Ok(if request.path == "/basket/checkout" {
                BasketRoute::Checkout
            } else {
                BasketRoute::Create
            }),
            Method::Delete => Ok(BasketRoute::Delete {
                user_name: request
                    .path_parameter("userName")
                    .ok_or(HandlerError::MissingKey("userName"))?
                    .to_string(),
            }),
            method => Err(HandlerError::UnsupportedMethod(method.as_str().to_string())),
        }
    }
}

/// Body of a checkout request.
#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    #[serde(rename = "userName")]
    user_name: String,
}

/// CRUD over the basket table plus the checkout publish.
///
/// Baskets are user-identified: the caller supplies `userName`, one basket
/// per user, replaced wholesale on every write.
pub struct BasketService<S, P> {
    store: S,
    events: P,
    config: TableConfig,
}

impl<S: RecordStore, P: EventPublisher> BasketService<S, P> {
    /// Create a service over a store and an event publisher with the
    /// default basket config.
    pub fn new(store: S, events: P) -> Self {
        Self::with_config(store, events, TableConfig::basket())
    }

    /// Create a service with an injected config.
    pub fn with_config(store: S, events: P, config: TableConfig) -> Self {
        Self {
            store,
            events,
            config,
        }
    }

    /// Entry point: route, dispatch, and wrap the result in the envelope.
    pub fn handle(&self, request: &Request) -> Response {
        info!(method = %request.method, path = %request.path, "basket request");
        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(error) => {
                error!(%error, "basket request failed");
                Response::failure(&error)
            }
        }
    }

    fn dispatch(&self, request: &Request) -> Result<Value, HandlerError> {
        match BasketRoute::resolve(request)? {
            BasketRoute::List => Ok(Value::Array(
                self.list()?.into_iter().map(Value::Object).collect(),
            )),
            BasketRoute::Get { user_name } => Ok(self
                .get(&user_name)?
                .map(Value::Object)
                .unwrap_or_else(|| json!({}))),
            BasketRoute::Create => {
                let body = body_object(request)?;
                Ok(Value::Object(self.create(body)?))
            }
            BasketRoute::Checkout => {
                let checkout: CheckoutRequest =
                    serde_json::from_value(request.json_body()?)?;
                self.checkout(&checkout.user_name)
            }
            BasketRoute::Delete { user_name } => {
                self.delete(&user_name)?;
                Ok(json!({ "deleted": true, "userName": user_name }))
            }
        }
    }

    fn key(&self, user_name: &str) -> RecordKey {
        RecordKey::new(&self.config.primary_key, user_name)
    }

    /// Fetch a user's basket. `None` when the user has none.
    pub fn get(&self, user_name: &str) -> Result<Option<Record>, HandlerError> {
        Ok(self.store.get(&self.key(user_name))?)
    }

    /// Every basket in the table.
    pub fn list(&self) -> Result<Vec<Record>, HandlerError> {
        Ok(self.store.scan()?)
    }

    /// Write a basket wholesale. No merge with any existing basket.
    pub fn create(&self, basket: Record) -> Result<Record, HandlerError> {
        debug!("creating basket");
        self.store.put(basket.clone())?;
        Ok(basket)
    }

    /// Remove a user's basket. Deleting an absent basket is not an error.
    pub fn delete(&self, user_name: &str) -> Result<(), HandlerError> {
        debug!(user_name, "deleting basket");
        Ok(self.store.delete(&self.key(user_name))?)
    }

    /// Publish the user's basket as a checkout event.
    ///
    /// The response acknowledges that the bus accepted the event; delivery
    /// to downstream consumers is asynchronous, and their outcome never
    /// becomes this caller's failure. The basket itself is left in place.
    pub fn checkout(&self, user_name: &str) -> Result<Value, HandlerError> {
        let basket = self.get(user_name)?.unwrap_or_default();
        let detail = checkout_detail(user_name, &basket);
        let total_price = detail["totalPrice"].clone();

        info!(user_name, %total_price, "publishing checkout event");
        self.events
            .put_event(BusEvent::new(CHECKOUT_SOURCE, CHECKOUT_DETAIL_TYPE, detail))?;

        Ok(json!({
            "userName": user_name,
            "totalPrice": total_price,
            "published": true,
        }))
    }
}

/// Assemble the event payload: the basket snapshot, the user identity, and
/// the summed price of the items.
fn checkout_detail(user_name: &str, basket: &Record) -> Value {
    let items = basket
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let total_price: f64 = items
        .iter()
        .filter_map(|item| item.get("price").and_then(Value::as_f64))
        .sum();

    json!({
        "userName": user_name,
        "totalPrice": total_price,
        "items": items,
    })
}
