//! Inbound requests as the entity routers see them.

use std::collections::HashMap;

use serde_json::Value;

/// HTTP method of an inbound request.
///
/// Unrecognized verbs are preserved so routing failures can report the
/// offending method name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl Method {
    /// Parse a method from its wire name (case-insensitive).
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            _ => Method::Other(name.to_string()),
        }
    }

    /// The wire name of the method.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound request: method, path, parameters, and raw body.
///
/// Routing is a pure function of these fields, so tests can build requests
/// directly without any transport.
///
/// ## Example
///
/// ```
/// use storefront_rust::gateway::Request;
///
/// let request = Request::put("/product/p1")
///     .with_path_parameter("id", "p1")
///     .with_body(r#"{ "price": 42 }"#);
///
/// assert_eq!(request.path_parameter("id"), Some("p1"));
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub path_parameters: HashMap<String, String>,
    pub query_string_parameters: HashMap<String, String>,
    pub body: Option<String>,
}

impl Request {
    /// Create a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_parameters: HashMap::new(),
            query_string_parameters: HashMap::new(),
            body: None,
        }
    }

    /// Create a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Create a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Create a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Create a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Add a path parameter.
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// Add a query string parameter.
    pub fn with_query_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query_string_parameters.insert(name.into(), value.into());
        self
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the body from a JSON value.
    pub fn with_json_body(self, body: &Value) -> Self {
        self.with_body(body.to_string())
    }

    /// Look up a path parameter.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    /// Look up a query string parameter.
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// Parse the body as JSON. An absent body parses as `{}`.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(self.body.as_deref().unwrap_or("{}"))
    }
}
