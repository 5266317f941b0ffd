//! Product service - system-identified catalog records.

use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::TableConfig;
use crate::gateway::{Method, Request, Response};
use crate::store::{Record, RecordKey, RecordStore, ReturnValues, UpdateExpression};

use super::error::HandlerError;
use super::body_object;

/// The operations the product route surface dispatches to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductRoute {
    /// `GET /product`
    List,
    /// `GET /product/{id}`
    Get { id: String },
    /// `GET /product/{id}?category=...`
    GetByCategory { id: String, category: String },
    /// `POST /product`
    Create,
    /// `PUT /product/{id}`
    Update { id: String },
    /// `DELETE /product/{id}`
    Delete { id: String },
}

impl ProductRoute {
    /// Select the operation for a request.
    ///
    /// Pure function of the request; evaluated once, before any store access.
    pub fn resolve(request: &Request) -> Result<Self, HandlerError> {
        match &request.method {
            Method::Get => Ok(match request.path_parameter("id") {
                Some(id) => match request.query_parameter("category") {
                    Some(category) => ProductRoute::GetByCategory {
                        id: id.to_string(),
                        category: category.to_string(),
                    },
                    None => ProductRoute::Get { id: id.to_string() },
                },
                None => ProductRoute::List,
            }),
            Method::Post => Ok(ProductRoute::Create),
            Method::Put => Ok(ProductRoute::Update {
                id: request
                    .path_parameter("id")
                    .ok_or(HandlerError::MissingKey("id"))?
                    .to_string(),
            }),
            Method::Delete => Ok(ProductRoute::Delete {
                id: request
                    .path_parameter("id")
                    .ok_or(HandlerError::MissingKey("id"))?
                    .to_string(),
            }),
            Method::Other(name) => Err(HandlerError::UnsupportedMethod(name.clone())),
        }
    }
}

/// CRUD over the product table.
///
/// Products are system-identified: `create` stamps a generated `id` into the
/// record, and no later operation can move it.
pub struct ProductService<S> {
    store: S,
    config: TableConfig,
}

impl<S: RecordStore> ProductService<S> {
    /// Create a service over a store with the default product config.
    pub fn new(store: S) -> Self {
        Self::with_config(store, TableConfig::product())
    }

    /// Create a service with an injected config.
    pub fn with_config(store: S, config: TableConfig) -> Self {
        Self { store, config }
    }

    /// Entry point: route, dispatch, and wrap the result in the envelope.
    pub fn handle(&self, request: &Request) -> Response {
        info!(method = %request.method, path = %request.path, "product request");
        match self.dispatch(request) {
            Ok(data) => Response::success(data),
            Err(error) => {
                error!(%error, "product request failed");
                Response::failure(&error)
            }
        }
    }

    fn dispatch(&self, request: &Request) -> Result<Value, HandlerError> {
        match ProductRoute::resolve(request)? {
            ProductRoute::List => Ok(Value::Array(
                self.list()?.into_iter().map(Value::Object).collect(),
            )),
            ProductRoute::Get { id } => Ok(self
                .get(&id)?
                .map(Value::Object)
                .unwrap_or_else(|| json!({}))),
            ProductRoute::GetByCategory { id, category } => Ok(Value::Array(
                self.get_by_category(&id, &category)?
                    .into_iter()
                    .map(Value::Object)
                    .collect(),
            )),
            ProductRoute::Create => {
                let body = body_object(request)?;
                Ok(Value::Object(self.create(body)?))
            }
            ProductRoute::Update { id } => {
                let patch = body_object(request)?;
                Ok(Value::Object(self.update(&id, &patch)?))
            }
            ProductRoute::Delete { id } => {
                self.delete(&id)?;
                Ok(json!({ "deleted": true, "id": id }))
            }
        }
    }

    fn key(&self, id: &str) -> RecordKey {
        RecordKey::new(&self.config.primary_key, id)
    }

    /// Fetch one product. `None` when the id is unknown.
    pub fn get(&self, id: &str) -> Result<Option<Record>, HandlerError> {
        Ok(self.store.get(&self.key(id))?)
    }

    /// Fetch a product and keep it only when its `category` attribute
    /// contains the given substring.
    pub fn get_by_category(
        &self,
        id: &str,
        category: &str,
    ) -> Result<Vec<Record>, HandlerError> {
        let records = self.store.query(id)?;
        Ok(records
            .into_iter()
            .filter(|record| {
                record
                    .get("category")
                    .and_then(Value::as_str)
                    .map(|value| value.contains(category))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Every product in the table.
    pub fn list(&self) -> Result<Vec<Record>, HandlerError> {
        Ok(self.store.scan()?)
    }

    /// Persist a new product under a freshly generated id.
    ///
    /// Any caller-supplied id is overwritten; the server owns this namespace.
    pub fn create(&self, mut product: Record) -> Result<Record, HandlerError> {
        let id = Uuid::new_v4().to_string();
        debug!(%id, "creating product");
        product.insert(self.config.primary_key.clone(), Value::String(id));
        self.store.put(product.clone())?;
        Ok(product)
    }

    /// Apply a partial update, returning the attributes it touched.
    pub fn update(&self, id: &str, patch: &Record) -> Result<Record, HandlerError> {
        let key = self.key(id);
        let expression = UpdateExpression::from_patch(patch, &key)?;
        debug!(%id, expression = expression.expression(), "updating product");
        let updated = self
            .store
            .update(&key, &expression, ReturnValues::UpdatedNew)?;
        Ok(updated.unwrap_or_default())
    }

    /// Remove a product. Deleting an unknown id is not an error.
    pub fn delete(&self, id: &str) -> Result<(), HandlerError> {
        debug!(%id, "deleting product");
        Ok(self.store.delete(&self.key(id))?)
    }
}
