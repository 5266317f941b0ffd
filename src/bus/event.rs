//! Events and the publisher-facing error type.

use std::error::Error;
use std::fmt;

use serde_json::Value;

/// An event put on the bus.
///
/// `source` and `detail_type` are the routing tags rules match on; `detail`
/// is the payload handed to matched targets.
#[derive(Clone, Debug, PartialEq)]
pub struct BusEvent {
    /// Unique identifier for this event
    pub id: String,
    /// Origin tag (e.g., "checkoutbasket")
    pub source: String,
    /// Kind tag (e.g., "CheckoutBasketRule")
    pub detail_type: String,
    /// JSON payload
    pub detail: Value,
}

impl BusEvent {
    /// Create an event with a freshly generated id.
    pub fn new(
        source: impl Into<String>,
        detail_type: impl Into<String>,
        detail: Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            detail_type: detail_type.into(),
            detail,
        }
    }

    /// Create an event with an explicit id.
    pub fn with_id(
        id: impl Into<String>,
        source: impl Into<String>,
        detail_type: impl Into<String>,
        detail: Value,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            detail_type: detail_type.into(),
            detail,
        }
    }

    /// Deserialize the detail payload into a typed struct.
    pub fn detail_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.detail.clone())
    }
}

/// Error type for publish operations.
///
/// Publishing only covers hand-off to the bus. Delivery to targets happens
/// asynchronously and never surfaces here.
#[derive(Debug)]
pub enum PublishError {
    /// Connection to the bus failed
    ConnectionFailed(String),
    /// The bus rejected the event
    Rejected(String),
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "event rejected: {}", msg),
            PublishError::Other(e) => write!(f, "publish error: {}", e),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
