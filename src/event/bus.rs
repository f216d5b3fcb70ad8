//! Event bus: the publish point every component fires through.
//!
//! The bus is an ordinary value injected into each controller, not a process
//! global. Subscribers are notified synchronously in subscription order.
//! A publish pass works on a snapshot of the subscriber list, so subscribing
//! or unsubscribing from inside a handler never disturbs the pass in flight.

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use tracing::{debug, trace};

use super::args::EventArgs;
use crate::component::node::ComponentId;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a handler or of a whole dispatch pass.
///
/// `Cancel` asks the firing component to skip its default action, which is
/// how "before" events are vetoed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[default]
    Continue,
    Cancel,
}

impl Outcome {
    /// Fold another outcome into this one. `Cancel` is sticky.
    pub fn merge(self, other: Outcome) -> Outcome {
        if self == Outcome::Cancel || other == Outcome::Cancel {
            Outcome::Cancel
        } else {
            Outcome::Continue
        }
    }

    /// Whether this outcome cancels the default action.
    pub fn is_cancel(self) -> bool {
        self == Outcome::Cancel
    }
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Outcome::Continue
    }
}

/// `false` cancels, `true` continues.
impl From<bool> for Outcome {
    fn from(proceed: bool) -> Self {
        if proceed {
            Outcome::Continue
        } else {
            Outcome::Cancel
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

/// Something that wants every event published on a bus.
pub trait Subscriber {
    /// Handle one published event.
    fn dispatch(&self, source: ComponentId, event: &str, args: &EventArgs) -> Outcome;
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    subscriber: Weak<dyn Subscriber>,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Ordered list of subscribers notified of every published event.
///
/// Subscribers are held weakly: the bus never keeps a controller alive, and
/// dead entries are skipped and pruned.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber. It is notified after all earlier subscribers.
    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions
            .borrow_mut()
            .push(Subscription { id, subscriber });
        debug!(subscription = id.0, "event bus subscribe");
        id
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        debug!(subscription = id.0, removed, "event bus unsubscribe");
        removed
    }

    /// Whether `id` is currently subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow().iter().any(|s| s.id == id)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.subscriber.strong_count() > 0)
            .count()
    }

    /// Publish an event fired by `source` to every subscriber.
    ///
    /// Returns `Cancel` if any subscriber's pass cancelled. Every subscriber
    /// in the snapshot is notified regardless.
    pub fn publish(&self, source: ComponentId, event: &str, args: &EventArgs) -> Outcome {
        let snapshot: Vec<Weak<dyn Subscriber>> = {
            let mut subscriptions = self.subscriptions.borrow_mut();
            subscriptions.retain(|s| s.subscriber.strong_count() > 0);
            subscriptions.iter().map(|s| s.subscriber.clone()).collect()
        };
        trace!(event, subscribers = snapshot.len(), "event bus publish");

        snapshot
            .iter()
            .filter_map(Weak::upgrade)
            .fold(Outcome::Continue, |outcome, subscriber| {
                outcome.merge(subscriber.dispatch(source, event, args))
            })
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use slotmap::SlotMap;

    use super::*;

    fn make_id() -> ComponentId {
        let mut sm: SlotMap<ComponentId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    /// Records every event it sees into a shared log and returns a fixed outcome.
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        outcome: Outcome,
    }

    impl Subscriber for Recorder {
        fn dispatch(&self, _source: ComponentId, event: &str, _args: &EventArgs) -> Outcome {
            self.log.borrow_mut().push(format!("{}:{event}", self.name));
            self.outcome
        }
    }

    fn recorder(
        name: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
        outcome: Outcome,
    ) -> Rc<dyn Subscriber> {
        Rc::new(Recorder {
            name,
            log: log.clone(),
            outcome,
        })
    }

    // ── Outcome ──────────────────────────────────────────────────────

    #[test]
    fn outcome_conversions() {
        assert_eq!(Outcome::from(()), Outcome::Continue);
        assert_eq!(Outcome::from(false), Outcome::Cancel);
        assert_eq!(Outcome::from(true), Outcome::Continue);
        assert_eq!(Outcome::default(), Outcome::Continue);
    }

    #[test]
    fn outcome_cancel_is_sticky() {
        assert_eq!(Outcome::Cancel.merge(Outcome::Continue), Outcome::Cancel);
        assert_eq!(Outcome::Continue.merge(Outcome::Cancel), Outcome::Cancel);
        assert_eq!(Outcome::Continue.merge(Outcome::Continue), Outcome::Continue);
        assert!(Outcome::Cancel.is_cancel());
    }

    // ── Subscribe / publish ──────────────────────────────────────────

    #[test]
    fn publish_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log, Outcome::Continue);
        let b = recorder("b", &log, Outcome::Continue);
        bus.subscribe(Rc::downgrade(&a));
        bus.subscribe(Rc::downgrade(&b));

        let outcome = bus.publish(make_id(), "click", &EventArgs::new());
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(*log.borrow(), vec!["a:click", "b:click"]);
    }

    #[test]
    fn publish_aggregates_cancel() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log, Outcome::Cancel);
        let b = recorder("b", &log, Outcome::Continue);
        bus.subscribe(Rc::downgrade(&a));
        bus.subscribe(Rc::downgrade(&b));

        let outcome = bus.publish(make_id(), "beforeclose", &EventArgs::new());
        assert_eq!(outcome, Outcome::Cancel);
        assert_eq!(log.borrow().len(), 2, "all subscribers still notified");
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log, Outcome::Continue);
        let id = bus.subscribe(Rc::downgrade(&a));
        assert!(bus.is_subscribed(id));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(!bus.is_subscribed(id));
        bus.publish(make_id(), "click", &EventArgs::new());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log, Outcome::Continue);
        bus.subscribe(Rc::downgrade(&a));
        assert_eq!(bus.subscriber_count(), 1);

        drop(a);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(make_id(), "click", &EventArgs::new()), Outcome::Continue);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn publish_with_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(make_id(), "click", &EventArgs::new()), Outcome::Continue);
    }

    /// Subscribes a second recorder while handling an event.
    struct Subscribing {
        bus: Rc<EventBus>,
        late: Rc<dyn Subscriber>,
    }

    impl Subscriber for Subscribing {
        fn dispatch(&self, _source: ComponentId, _event: &str, _args: &EventArgs) -> Outcome {
            self.bus.subscribe(Rc::downgrade(&self.late));
            Outcome::Continue
        }
    }

    #[test]
    fn subscribe_during_publish_waits_for_next_pass() {
        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let late = recorder("late", &log, Outcome::Continue);
        let first: Rc<dyn Subscriber> = Rc::new(Subscribing {
            bus: bus.clone(),
            late: late.clone(),
        });
        bus.subscribe(Rc::downgrade(&first));

        bus.publish(make_id(), "click", &EventArgs::new());
        assert!(log.borrow().is_empty());

        bus.publish(make_id(), "click", &EventArgs::new());
        assert_eq!(*log.borrow(), vec!["late:click"]);
    }
}
