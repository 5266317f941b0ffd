//! Table configuration injected by the runtime environment.

use std::env;

/// Table name and key attribute names for one entity's table.
///
/// Each service receives its config from the environment
/// (`DYNAMODB_TABLE_NAME`, `PRIMARY_KEY`, `SORT_KEY`); the per-entity
/// constructors give the defaults used when nothing is injected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub primary_key: String,
    pub sort_key: Option<String>,
}

impl TableConfig {
    /// Create a config with a single-attribute key.
    pub fn new(table_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key: primary_key.into(),
            sort_key: None,
        }
    }

    /// Add a sort key attribute.
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    /// Default config for the product table.
    pub fn product() -> Self {
        Self::new("product", "id")
    }

    /// Default config for the basket table.
    pub fn basket() -> Self {
        Self::new("basket", "userName")
    }

    /// Default config for the order table.
    pub fn order() -> Self {
        Self::new("order", "userName").with_sort_key("orderDate")
    }

    /// Override fields from the environment where set.
    pub fn or_env(mut self) -> Self {
        if let Ok(table_name) = env::var("DYNAMODB_TABLE_NAME") {
            self.table_name = table_name;
        }
        if let Ok(primary_key) = env::var("PRIMARY_KEY") {
            self.primary_key = primary_key;
        }
        if let Ok(sort_key) = env::var("SORT_KEY") {
            self.sort_key = Some(sort_key);
        }
        self
    }
}
