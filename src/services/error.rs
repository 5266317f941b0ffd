//! Error types for entity request handlers.

use std::error::Error;
use std::fmt;

use crate::bus::PublishError;
use crate::store::{StoreError, UpdateError};

/// Error type for handler operations.
///
/// Every variant surfaces to the caller through the uniform failure
/// envelope; none is retried automatically.
#[derive(Debug)]
pub enum HandlerError {
    /// The request used an HTTP verb the entity has no operations for.
    UnsupportedMethod(String),
    /// A required path parameter was absent.
    MissingKey(&'static str),
    /// An update patch had no settable fields.
    EmptyPatch,
    /// Request body decode / deserialization failed.
    DecodeFailed(String),
    /// Record store error.
    Store(StoreError),
    /// The event bus refused the publish.
    Publish(PublishError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnsupportedMethod(method) => {
                write!(f, "unsupported method \"{}\"", method)
            }
            HandlerError::MissingKey(parameter) => {
                write!(f, "missing required path parameter \"{}\"", parameter)
            }
            HandlerError::EmptyPatch => write!(f, "update patch has no settable fields"),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::Store(e) => write!(f, "store error: {}", e),
            HandlerError::Publish(e) => write!(f, "publish error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Store(e) => Some(e),
            HandlerError::Publish(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::Store(err)
    }
}

impl From<UpdateError> for HandlerError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::EmptyPatch => HandlerError::EmptyPatch,
        }
    }
}

impl From<PublishError> for HandlerError {
    fn from(err: PublishError) -> Self {
        HandlerError::Publish(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}
