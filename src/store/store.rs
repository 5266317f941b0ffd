//! RecordStore - abstract key-value storage for schemaless records.

use super::error::StoreError;
use super::record::{Record, RecordKey};
use super::update::{ReturnValues, UpdateExpression};

/// Abstract key-value storage for schemaless records.
///
/// Implementations might include:
/// - `MemoryTable` - in-memory table for testing and single-process use
/// - a DynamoDB-backed table
/// - a Redis-hash-backed table
///
/// Writes to a single key are serialized by the store itself; callers need
/// no locking of their own.
pub trait RecordStore: Send + Sync {
    /// Fetch a record by primary key. `None` when the key is absent.
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError>;

    /// Write a whole record, replacing any existing record with the same key.
    ///
    /// The record must carry a string value for every declared key attribute.
    fn put(&self, record: Record) -> Result<(), StoreError>;

    /// Remove a record by primary key. Deleting an absent key is not an error.
    fn delete(&self, key: &RecordKey) -> Result<(), StoreError>;

    /// Return every record in the table.
    fn scan(&self) -> Result<Vec<Record>, StoreError>;

    /// Return every record whose partition attribute equals `partition`,
    /// ordered by the sort attribute where the table has one.
    fn query(&self, partition: &str) -> Result<Vec<Record>, StoreError>;

    /// Apply an update expression to the record at `key`.
    ///
    /// Upsert semantics: when the key is absent the update is applied to a
    /// fresh record holding only the key attributes. `returns` selects the
    /// post-update snapshot handed back; `ReturnValues::None` yields `None`.
    fn update(
        &self,
        key: &RecordKey,
        expression: &UpdateExpression,
        returns: ReturnValues,
    ) -> Result<Option<Record>, StoreError>;
}

// Stores are typically shared between services and background consumers.
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, record: Record) -> Result<(), StoreError> {
        (**self).put(record)
    }

    fn delete(&self, key: &RecordKey) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn scan(&self) -> Result<Vec<Record>, StoreError> {
        (**self).scan()
    }

    fn query(&self, partition: &str) -> Result<Vec<Record>, StoreError> {
        (**self).query(partition)
    }

    fn update(
        &self,
        key: &RecordKey,
        expression: &UpdateExpression,
        returns: ReturnValues,
    ) -> Result<Option<Record>, StoreError> {
        (**self).update(key, expression, returns)
    }
}
