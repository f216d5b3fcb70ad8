//! Named-event observers embedded in an owner.
//!
//! An owner (e.g. a controller) keeps an `Observable<Self>` field and fires
//! named notifications with itself as the payload.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

struct Observer<T: ?Sized> {
    id: ObserverId,
    event: String,
    callback: Callback<T>,
}

/// Ordered observers keyed by event name.
pub struct Observable<T: ?Sized> {
    observers: RefCell<Vec<Observer<T>>>,
    next_id: Cell<u64>,
}

impl<T: ?Sized> Observable<T> {
    /// Create an observable with no observers.
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Observe `event`. Observers run in registration order.
    pub fn on(&self, event: impl Into<String>, callback: impl Fn(&T) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push(Observer {
            id,
            event: event.into(),
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove one observer. Returns `false` if it was not registered.
    pub fn un(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    /// Whether anything observes `event`.
    pub fn has_observers(&self, event: &str) -> bool {
        self.observers.borrow().iter().any(|o| o.event == event)
    }

    /// Notify every observer of `event` with `payload`.
    ///
    /// Observers are snapshotted first, so they may register or remove
    /// observers while running. Returns how many were notified.
    pub fn fire(&self, event: &str, payload: &T) -> usize {
        let snapshot: Vec<Callback<T>> = self
            .observers
            .borrow()
            .iter()
            .filter(|o| o.event == event)
            .map(|o| o.callback.clone())
            .collect();
        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Remove every observer.
    pub fn clear(&self) {
        self.observers.borrow_mut().clear();
    }
}

impl<T: ?Sized> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
