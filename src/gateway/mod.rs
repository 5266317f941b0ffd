//! Gateway - inbound request shape and the uniform response envelope.
//!
//! The gateway layer is transport-agnostic: a [`Request`] can come from an
//! HTTP router (see the `http` feature), a test, or any other front door.
//! Each entity service routes the request itself and answers with a
//! [`Response`] envelope.

mod request;
mod response;

pub use request::{Method, Request};
pub use response::Response;
