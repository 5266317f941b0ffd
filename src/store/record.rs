//! Records and record keys.
//!
//! A record is a schemaless attribute map. The only structure a table imposes
//! on it is the key schema: one partition attribute, optionally followed by a
//! sort attribute, both holding string values.

use serde_json::{Map, Value};

/// A schemaless record - attribute names mapped to JSON values.
pub type Record = Map<String, Value>;

/// The primary key of a record: ordered attribute/value pairs.
///
/// Single-attribute keys identify products (`id`) and baskets (`userName`);
/// composite keys identify orders (`userName` + `orderDate`).
///
/// ## Example
///
/// ```
/// use storefront_rust::store::RecordKey;
///
/// let product = RecordKey::new("id", "prod-1");
/// let order = RecordKey::new("userName", "alice").and("orderDate", "2024-06-01T00:00:00Z");
///
/// assert!(order.has_attribute("orderDate"));
/// assert_eq!(order.partition_value(), "alice");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordKey {
    parts: Vec<(String, String)>,
}

impl RecordKey {
    /// Create a single-attribute key.
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parts: vec![(attribute.into(), value.into())],
        }
    }

    /// Append a sort attribute, producing a composite key.
    pub fn and(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((attribute.into(), value.into()));
        self
    }

    /// The attribute/value pairs in key order.
    pub fn parts(&self) -> &[(String, String)] {
        &self.parts
    }

    /// Whether the key contains the named attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.parts.iter().any(|(attribute, _)| attribute == name)
    }

    /// The value of the first (partition) attribute.
    pub fn partition_value(&self) -> &str {
        &self.parts[0].1
    }

    /// The key attributes as a record fragment.
    pub fn to_record(&self) -> Record {
        self.parts
            .iter()
            .map(|(attribute, value)| (attribute.clone(), Value::String(value.clone())))
            .collect()
    }

    /// Flatten the key values into a single storage string.
    ///
    /// Key values are joined with an unprintable separator so composite keys
    /// cannot collide with single-attribute keys that happen to contain the
    /// same characters.
    pub(crate) fn storage_key(&self) -> String {
        let values: Vec<&str> = self.parts.iter().map(|(_, value)| value.as_str()).collect();
        values.join("\u{1f}")
    }
}
