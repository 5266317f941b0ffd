//! Uniform response envelope.
//!
//! Every route answers with the same envelope: success wraps the handler's
//! result under `data` with status 200; failure embeds the error's message
//! and its source chain with status 500. All failures map to 500 regardless
//! of cause, matching the upstream contract this service keeps.

use std::error::Error;

use serde_json::{json, Value};

/// A formatted response: status code plus JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub body: Value,
}

impl Response {
    /// Wrap a handler result in the success envelope.
    pub fn success(data: Value) -> Self {
        Self {
            status_code: 200,
            body: json!({
                "message": "Success",
                "data": data,
            }),
        }
    }

    /// Wrap a handler error in the failure envelope.
    pub fn failure(error: &dyn Error) -> Self {
        Self {
            status_code: 500,
            body: json!({
                "message": "Internal Server Error",
                "errorMessage": error.to_string(),
                "errorStack": error_stack(error),
            }),
        }
    }

    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// The `data` field of a success envelope.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }
}

/// Render an error and its source chain, one frame per line.
fn error_stack(error: &dyn Error) -> String {
    let mut stack = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        stack.push_str("\n  caused by: ");
        stack.push_str(&cause.to_string());
        source = cause.source();
    }
    stack
}
