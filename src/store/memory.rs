//! MemoryTable - in-memory record store for testing and single-process use.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::config::TableConfig;

use super::error::StoreError;
use super::record::{Record, RecordKey};
use super::store::RecordStore;
use super::update::{ReturnValues, UpdateExpression};

/// In-memory table backed by an ordered map.
///
/// The table declares its key schema up front (partition attribute, optional
/// sort attribute); records are otherwise schemaless. Rows are kept in key
/// order, so `scan` and `query` hand back composite-keyed records sorted by
/// their sort attribute. Clone-friendly via `Arc`.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use storefront_rust::store::{MemoryTable, RecordKey, RecordStore};
///
/// let table = MemoryTable::new("product", "id");
/// table.put(json!({ "id": "p1", "name": "Shoe" }).as_object().unwrap().clone()).unwrap();
///
/// let record = table.get(&RecordKey::new("id", "p1")).unwrap().unwrap();
/// assert_eq!(record["name"], json!("Shoe"));
/// ```
#[derive(Clone)]
pub struct MemoryTable {
    name: String,
    key_schema: Vec<String>,
    rows: Arc<RwLock<BTreeMap<String, Record>>>,
}

impl MemoryTable {
    /// Create a table keyed by a single partition attribute.
    pub fn new(name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_schema: vec![partition_key.into()],
            rows: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a table keyed by a partition attribute plus a sort attribute.
    pub fn with_sort_key(
        name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key_schema: vec![partition_key.into(), sort_key.into()],
            rows: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a table from a config (table name plus key attribute names).
    pub fn from_config(config: &TableConfig) -> Self {
        match &config.sort_key {
            Some(sort_key) => Self::with_sort_key(&config.table_name, &config.primary_key, sort_key),
            None => Self::new(&config.table_name, &config.primary_key),
        }
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared key attribute names, partition attribute first.
    pub fn key_schema(&self) -> &[String] {
        &self.key_schema
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract a record's primary key according to the table's key schema.
    fn key_of(&self, record: &Record) -> Result<RecordKey, StoreError> {
        let mut parts = Vec::with_capacity(self.key_schema.len());
        for attribute in &self.key_schema {
            match record.get(attribute).and_then(Value::as_str) {
                Some(value) => parts.push((attribute.clone(), value.to_string())),
                None => return Err(StoreError::MissingKeyAttribute(attribute.clone())),
            }
        }
        let mut iter = parts.into_iter();
        let (attribute, value) = iter.next().expect("key schema is never empty");
        let mut key = RecordKey::new(attribute, value);
        for (attribute, value) in iter {
            key = key.and(attribute, value);
        }
        Ok(key)
    }
}

impl RecordStore for MemoryTable {
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;
        Ok(rows.get(&key.storage_key()).cloned())
    }

    fn put(&self, record: Record) -> Result<(), StoreError> {
        let key = self.key_of(&record)?;
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("put"))?;
        rows.insert(key.storage_key(), record);
        Ok(())
    }

    fn delete(&self, key: &RecordKey) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;
        rows.remove(&key.storage_key());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<Record>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("scan"))?;
        Ok(rows.values().cloned().collect())
    }

    fn query(&self, partition: &str) -> Result<Vec<Record>, StoreError> {
        let partition_attribute = &self.key_schema[0];
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("query"))?;
        Ok(rows
            .values()
            .filter(|record| {
                record.get(partition_attribute).and_then(Value::as_str) == Some(partition)
            })
            .cloned()
            .collect())
    }

    fn update(
        &self,
        key: &RecordKey,
        expression: &UpdateExpression,
        returns: ReturnValues,
    ) -> Result<Option<Record>, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        // Upsert: an absent key starts from a record holding only the key attrs.
        let mut record = rows
            .get(&key.storage_key())
            .cloned()
            .unwrap_or_else(|| key.to_record());

        let touched = expression.apply_to(&mut record);
        rows.insert(key.storage_key(), record.clone());

        Ok(match returns {
            ReturnValues::None => None,
            ReturnValues::AllNew => Some(record),
            ReturnValues::UpdatedNew => {
                let mut updated = Record::new();
                for field in touched {
                    if let Some(value) = record.get(&field) {
                        updated.insert(field, value.clone());
                    }
                }
                Some(updated)
            }
        })
    }
}
