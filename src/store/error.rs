use std::fmt;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An internal lock was poisoned during the named operation.
    LockPoisoned(&'static str),
    /// A record was written without a string value for a declared key attribute.
    MissingKeyAttribute(String),
    /// The store could not be reached (network, throttling, outage).
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::MissingKeyAttribute(attribute) => {
                write!(f, "record has no string value for key attribute \"{}\"", attribute)
            }
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
