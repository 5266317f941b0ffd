//! Update expression builder - turns a partial patch into a safe update.
//!
//! An arbitrary JSON patch cannot be applied to a record directly: attribute
//! names may collide with store reserved words, and a hostile or careless
//! patch may try to overwrite the primary key. The builder routes every
//! attribute through a `#name` / `:value` placeholder indirection and strips
//! key attributes from the settable field set before anything reaches a table.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use storefront_rust::store::{RecordKey, UpdateExpression};
//!
//! let patch = json!({ "price": 42, "id": "evil" });
//! let key = RecordKey::new("id", "p1");
//!
//! let expr = UpdateExpression::from_patch(patch.as_object().unwrap(), &key).unwrap();
//! assert_eq!(expr.expression(), "SET #price = :price");
//! assert_eq!(expr.names()["#price"], "price");
//! assert_eq!(expr.values()[":price"], json!(42));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::record::{Record, RecordKey};

/// Which snapshot of the record an update should hand back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnValues {
    /// Return nothing; the caller only wants the write to happen.
    None,
    /// Return only the attributes the update touched.
    UpdatedNew,
    /// Return the whole record as it stands after the update.
    AllNew,
}

/// Error type for building an update expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The patch contained no settable fields once key attributes were removed.
    EmptyPatch,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::EmptyPatch => write!(f, "update patch has no settable fields"),
        }
    }
}

impl std::error::Error for UpdateError {}

/// A built `SET` expression with its placeholder name and value maps.
///
/// Only constructible through [`UpdateExpression::from_patch`], which is what
/// guarantees that key attributes never appear among the settable fields.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateExpression {
    expression: String,
    names: BTreeMap<String, String>,
    values: BTreeMap<String, Value>,
}

impl UpdateExpression {
    /// Build an expression from a patch and the target record's key.
    ///
    /// Settable fields are the patch's keys minus the key's attributes; the
    /// primary key is never settable even when the patch names it. Fails with
    /// [`UpdateError::EmptyPatch`] when nothing settable remains.
    pub fn from_patch(patch: &Record, key: &RecordKey) -> Result<Self, UpdateError> {
        let fields: Vec<&String> = patch
            .keys()
            .filter(|field| !key.has_attribute(field))
            .collect();

        if fields.is_empty() {
            return Err(UpdateError::EmptyPatch);
        }

        let mut clauses = Vec::with_capacity(fields.len());
        let mut names = BTreeMap::new();
        let mut values = BTreeMap::new();

        for field in fields {
            let name_token = format!("#{}", field);
            let value_token = format!(":{}", field);
            clauses.push(format!("{} = {}", name_token, value_token));
            names.insert(name_token, field.clone());
            if let Some(value) = patch.get(field) {
                values.insert(value_token, value.clone());
            }
        }

        Ok(Self {
            expression: format!("SET {}", clauses.join(", ")),
            names,
            values,
        })
    }

    /// The `SET` clause, joining `#field = :field` for every settable field.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Placeholder name map: `#field` to the real attribute name.
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Placeholder value map: `:field` to the new value.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Resolve the indirection and write the new values into a record.
    ///
    /// Fields with no entry in the value map are skipped rather than treated
    /// as an error. Returns the attribute names that were written.
    pub(crate) fn apply_to(&self, record: &mut Record) -> Vec<String> {
        let mut touched = Vec::with_capacity(self.names.len());
        for (name_token, field) in &self.names {
            let value_token = format!(":{}", &name_token[1..]);
            if let Some(value) = self.values.get(&value_token) {
                record.insert(field.clone(), value.clone());
                touched.push(field.clone());
            }
        }
        touched
    }
}
