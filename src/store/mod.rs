//! Record Store - schemaless key-value tables and safe partial updates.
//!
//! Each entity owns one table: products are keyed by `id`, baskets by
//! `userName`, orders by `userName` + `orderDate`. Records carry whatever
//! attributes callers put in them; only the key attributes are declared.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 RecordStore (per table)                      │
//! │  get / put / delete / scan / query / update                 │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                   ▲
//!          ▼                                   │
//! ┌─────────────────┐              ┌──────────────────────────┐
//! │   MemoryTable   │              │    UpdateExpression      │
//! │   (included)    │              │  patch → SET #f = :f     │
//! └─────────────────┘              └──────────────────────────┘
//! ```
//!
//! Partial updates never touch a table directly: they are built with
//! [`UpdateExpression::from_patch`], which strips primary-key attributes from
//! the settable field set and routes every attribute through placeholder
//! indirection so names cannot collide with store reserved words.

mod client;
mod error;
mod memory;
mod record;
mod store;
mod update;

pub use client::table;
pub use error::StoreError;
pub use memory::MemoryTable;
pub use record::{Record, RecordKey};
pub use store::RecordStore;
pub use update::{ReturnValues, UpdateError, UpdateExpression};
