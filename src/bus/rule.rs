//! Rules - pattern-matched subscriptions on the bus.

use std::error::Error;
use std::sync::Arc;

use super::event::BusEvent;

/// Result type for target invocations.
pub type TargetResult = Result<(), Box<dyn Error + Send + Sync>>;

/// A downstream consumer invoked when a rule matches.
pub type Target = Arc<dyn Fn(&BusEvent) -> TargetResult + Send + Sync>;

/// An event pattern: exact string match on `source` AND `detail_type`.
///
/// Matching is exact, not prefix: `"checkout"` does not match events from
/// `"checkoutbasket"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern {
    source: String,
    detail_type: String,
}

impl EventPattern {
    /// Create a pattern matching the given source and detail type.
    pub fn new(source: impl Into<String>, detail_type: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            detail_type: detail_type.into(),
        }
    }

    /// Whether the event's tags match this pattern.
    pub fn matches(&self, event: &BusEvent) -> bool {
        event.source == self.source && event.detail_type == self.detail_type
    }
}

/// A named rule binding an event pattern to its targets.
///
/// ## Example
///
/// ```
/// use storefront_rust::bus::{EventPattern, Rule};
///
/// let rule = Rule::new("CheckoutBasketRule", EventPattern::new("checkoutbasket", "CheckoutBasketRule"))
///     .with_target(|event| {
///         println!("checkout for {}", event.detail["userName"]);
///         Ok(())
///     });
/// ```
#[derive(Clone)]
pub struct Rule {
    name: String,
    pattern: EventPattern,
    targets: Vec<Target>,
}

impl Rule {
    /// Create a rule with no targets yet.
    pub fn new(name: impl Into<String>, pattern: EventPattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            targets: Vec::new(),
        }
    }

    /// Add a target. Returns `self` for chaining.
    pub fn with_target(
        mut self,
        target: impl Fn(&BusEvent) -> TargetResult + Send + Sync + 'static,
    ) -> Self {
        self.targets.push(Arc::new(target));
        self
    }

    /// The rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's event pattern.
    pub fn pattern(&self) -> &EventPattern {
        &self.pattern
    }

    /// The rule's targets.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}
