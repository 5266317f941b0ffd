//! In-memory event bus and the background relay worker.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::event::{BusEvent, PublishError};
use super::rule::Rule;

/// Trait for handing events to a bus.
///
/// The `Ok` return means the bus accepted the event, nothing more. Delivery
/// to downstream targets is asynchronous; a publisher never learns whether
/// its consumers succeeded.
pub trait EventPublisher: Send + Sync {
    /// Put a single event on the bus.
    fn put_event(&self, event: BusEvent) -> Result<(), PublishError>;
}

impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    fn put_event(&self, event: BusEvent) -> Result<(), PublishError> {
        (**self).put_event(event)
    }
}

/// Counters from the relay worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayStats {
    /// Number of poll cycles completed.
    pub polls: usize,
    /// Successful target invocations.
    pub delivered: usize,
    /// Redelivery attempts after a failed invocation.
    pub retried: usize,
    /// Invocations abandoned after redelivery also failed.
    pub dead: usize,
    /// Events that matched no rule.
    pub unmatched: usize,
}

/// In-memory event bus with pattern-matched rules.
///
/// Publishing enqueues; a relay worker (see [`start_relay`]) drains the
/// queue and invokes every target of every matching rule. Delivery is
/// at-least-once: a failed target invocation is redelivered once before the
/// event is dropped for that target.
///
/// Thread-safe and clone-friendly; clones share the same queue and rules.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use storefront_rust::bus::{BusEvent, EventPattern, EventPublisher, InMemoryEventBus, Rule};
///
/// let bus = InMemoryEventBus::new("SwnEventBus");
/// bus.rule(
///     Rule::new("CheckoutBasketRule", EventPattern::new("checkoutbasket", "CheckoutBasketRule"))
///         .with_target(|event| {
///             assert_eq!(event.detail["userName"], json!("alice"));
///             Ok(())
///         }),
/// );
///
/// bus.put_event(BusEvent::new("checkoutbasket", "CheckoutBasketRule", json!({ "userName": "alice" }))).unwrap();
///
/// let stats = bus.deliver_pending();
/// assert_eq!(stats.delivered, 1);
/// ```
#[derive(Clone)]
pub struct InMemoryEventBus {
    name: String,
    rules: Arc<RwLock<Vec<Rule>>>,
    pending: Arc<Mutex<VecDeque<BusEvent>>>,
}

impl InMemoryEventBus {
    /// Create a named bus with no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Arc::new(RwLock::new(Vec::new())),
            pending: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// The bus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a rule.
    pub fn rule(&self, rule: Rule) {
        self.rules.write().unwrap().push(rule);
    }

    /// Number of events waiting for the relay.
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Deliver every pending event synchronously.
    ///
    /// The relay worker normally does this in the background; calling it
    /// directly makes tests deterministic.
    pub fn deliver_pending(&self) -> RelayStats {
        let mut stats = RelayStats::default();
        loop {
            // Take the lock only to pop; targets run with the queue unlocked.
            let next = self.pending.lock().unwrap().pop_front();
            match next {
                Some(event) => self.deliver(&event, &mut stats),
                None => break,
            }
        }
        stats
    }

    /// Pop the next pending event, waiting up to `timeout_ms`.
    fn next_event(&self, timeout_ms: u64) -> Option<BusEvent> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            if let Some(event) = self.pending.lock().unwrap().pop_front() {
                return Some(event);
            }

            if Instant::now() >= deadline {
                return None;
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Invoke every target of every rule matching the event.
    fn deliver(&self, event: &BusEvent, stats: &mut RelayStats) {
        let rules = self.rules.read().unwrap().clone();

        let mut matched = false;
        for rule in rules.iter().filter(|rule| rule.pattern().matches(event)) {
            matched = true;
            debug!(rule = rule.name(), event = %event.id, "delivering event");

            for target in rule.targets() {
                if let Err(error) = target(event) {
                    warn!(
                        rule = rule.name(),
                        event = %event.id,
                        %error,
                        "target failed, redelivering once"
                    );
                    stats.retried += 1;

                    if let Err(error) = target(event) {
                        warn!(
                            rule = rule.name(),
                            event = %event.id,
                            %error,
                            "redelivery failed, dropping event for this target"
                        );
                        stats.dead += 1;
                        continue;
                    }
                }
                stats.delivered += 1;
            }
        }

        if !matched {
            debug!(event = %event.id, source = %event.source, "event matched no rule");
            stats.unmatched += 1;
        }
    }
}

impl EventPublisher for InMemoryEventBus {
    fn put_event(&self, event: BusEvent) -> Result<(), PublishError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| PublishError::ConnectionFailed("pending queue lock poisoned".into()))?;
        pending.push_back(event);
        Ok(())
    }
}

/// Handle to a background relay thread. Drop or call `stop()` to shut down.
pub struct RelayHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<std::thread::JoinHandle<RelayStats>>,
}

impl RelayHandle {
    /// Stop the relay and wait for it to finish. Returns stats.
    ///
    /// Events still pending when the stop signal arrives are delivered
    /// before the worker exits.
    pub fn stop(mut self) -> RelayStats {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_default()
        } else {
            RelayStats::default()
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Start the relay worker for a bus.
///
/// Spawns a background thread that polls the pending queue and delivers
/// matched events. Publishers are never blocked by, and never observe,
/// target outcomes.
pub fn start_relay(bus: InMemoryEventBus, poll_interval: Duration) -> RelayHandle {
    let (stop_tx, stop_rx) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        let mut stats = RelayStats::default();

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
                Err(mpsc::TryRecvError::Empty) => {}
            }

            stats.polls += 1;

            if let Some(event) = bus.next_event(poll_interval.as_millis() as u64) {
                bus.deliver(&event, &mut stats);
            }
        }

        // Flush whatever arrived before the stop signal.
        let tail = bus.deliver_pending();
        stats.delivered += tail.delivered;
        stats.retried += tail.retried;
        stats.dead += tail.dead;
        stats.unmatched += tail.unmatched;

        stats
    });

    RelayHandle {
        stop_tx,
        handle: Some(handle),
    }
}
