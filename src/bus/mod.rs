//! Event Relay - pattern-matched, asynchronous event delivery.
//!
//! This module carries the checkout hand-off between services: the basket
//! service publishes an event, and the relay forwards it to every rule whose
//! pattern matches the event's `source` and `detail_type` exactly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   put_event    ┌──────────────────────────────┐
//! │  publisher  │ ─────────────▶ │       InMemoryEventBus       │
//! │ (basket svc)│   (ack only)   │  pending queue + rule table  │
//! └─────────────┘                └──────────────────────────────┘
//!                                               │ relay worker
//!                                               ▼
//!                                ┌──────────────────────────────┐
//!                                │  Rule: pattern → targets     │
//!                                │  (order service, ...)        │
//!                                └──────────────────────────────┘
//! ```
//!
//! Delivery is at-least-once and fire-and-forget: the publisher's own caller
//! is answered as soon as the bus accepts the event, and a failing consumer
//! never fails the publisher. The relay keeps no state of its own - it is a
//! stateless pattern-matching forwarder over the pending queue.

mod event;
mod memory;
mod rule;

pub use event::{BusEvent, PublishError};
pub use memory::{start_relay, EventPublisher, InMemoryEventBus, RelayHandle, RelayStats};
pub use rule::{EventPattern, Rule, Target, TargetResult};
