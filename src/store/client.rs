//! Process-wide table client.
//!
//! Request handlers are stateless and short-lived; the connection to the
//! store is not. The client is initialized lazily, once per process, and
//! reused across every invocation on the same worker. It is safe for
//! concurrent use without extra locking on the caller's side.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::config::TableConfig;

use super::memory::MemoryTable;

static TABLES: Lazy<RwLock<HashMap<String, Arc<MemoryTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Get the shared handle for a configured table, creating it on first use.
///
/// Every caller asking for the same table name receives the same underlying
/// table, so services and background consumers in one process observe each
/// other's writes.
pub fn table(config: &TableConfig) -> Arc<MemoryTable> {
    if let Some(existing) = TABLES
        .read()
        .unwrap()
        .get(&config.table_name)
    {
        return Arc::clone(existing);
    }

    let mut tables = TABLES.write().unwrap();
    Arc::clone(
        tables
            .entry(config.table_name.clone())
            .or_insert_with(|| Arc::new(MemoryTable::from_config(config))),
    )
}
