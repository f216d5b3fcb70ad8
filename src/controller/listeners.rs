//! Selector-scoped event listeners.
//!
//! [`ListenerSet`] collects `(selector, event, handler)` triples in
//! registration order. The controller compiles them into its
//! [`ListenerTable`], which hands out per-event snapshots for dispatch.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::behavior::Behavior;
use super::error::{compile_selector, ControllerError};
use super::Controller;
use crate::component::node::ComponentId;
use crate::event::args::EventArgs;
use crate::event::bus::Outcome;
use crate::selector::SelectorList;

/// One published event, as seen by a handler.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The component that fired the event.
    pub source: ComponentId,
    /// Event name, e.g. `"click"`.
    pub name: &'a str,
    /// Arguments the component fired with.
    pub args: &'a EventArgs,
}

/// A handler with its return type erased to [`Outcome`].
pub(crate) trait Handler<B: Behavior> {
    fn call(&self, controller: &Controller<B>, event: &Event<'_>) -> Outcome;
}

struct Erased<F, O> {
    handler: F,
    _returns: PhantomData<fn() -> O>,
}

impl<B, F, O> Handler<B> for Erased<F, O>
where
    B: Behavior,
    F: Fn(&Controller<B>, &Event<'_>) -> O,
    O: Into<Outcome>,
{
    fn call(&self, controller: &Controller<B>, event: &Event<'_>) -> Outcome {
        (self.handler)(controller, event).into()
    }
}

// ---------------------------------------------------------------------------
// ListenerSet
// ---------------------------------------------------------------------------

struct PendingListener<B: Behavior> {
    selector: String,
    event: String,
    handler: Rc<dyn Handler<B>>,
}

/// Listeners to register in one [`Controller::listen`] call.
///
/// ```
/// use gilt_control::controller::ListenerSet;
///
/// let listeners: ListenerSet = ListenerSet::new()
///     .on("#submit", "click", |_controller, _event| {})
///     .on("form field", "beforechange", |_controller, _event| false);
/// assert_eq!(listeners.len(), 2);
/// ```
pub struct ListenerSet<B: Behavior = ()> {
    entries: Vec<PendingListener<B>>,
}

impl<B: Behavior> ListenerSet<B> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Handle `event` fired by components matching `selector` (builder).
    ///
    /// The handler may return `()`, a `bool` (`false` cancels) or an
    /// [`Outcome`].
    pub fn on<O: Into<Outcome> + 'static>(
        mut self,
        selector: impl Into<String>,
        event: impl Into<String>,
        handler: impl Fn(&Controller<B>, &Event<'_>) -> O + 'static,
    ) -> Self {
        self.entries.push(PendingListener {
            selector: selector.into(),
            event: event.into(),
            handler: Rc::new(Erased {
                handler,
                _returns: PhantomData,
            }),
        });
        self
    }

    /// Number of triples collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse every selector; fails without partial output.
    pub(crate) fn compile(self) -> Result<Vec<(String, Rc<ListenerBinding<B>>)>, ControllerError> {
        self.entries
            .into_iter()
            .map(|entry| {
                let binding = ListenerBinding {
                    selector: compile_selector(&entry.selector)?,
                    handler: entry.handler,
                };
                Ok((entry.event, Rc::new(binding)))
            })
            .collect()
    }
}

impl<B: Behavior> Default for ListenerSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Behavior> fmt::Debug for ListenerSet<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.selector, &e.event)))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ListenerTable
// ---------------------------------------------------------------------------

/// A compiled listener. Immutable once registered.
pub(crate) struct ListenerBinding<B: Behavior> {
    pub(crate) selector: SelectorList,
    pub(crate) handler: Rc<dyn Handler<B>>,
}

/// Event name → bindings in registration order. Append-only until cleared.
pub(crate) struct ListenerTable<B: Behavior> {
    by_event: HashMap<String, Vec<Rc<ListenerBinding<B>>>>,
}

impl<B: Behavior> ListenerTable<B> {
    pub(crate) fn new() -> Self {
        Self {
            by_event: HashMap::new(),
        }
    }

    pub(crate) fn extend(&mut self, compiled: Vec<(String, Rc<ListenerBinding<B>>)>) {
        for (event, binding) in compiled {
            self.by_event.entry(event).or_default().push(binding);
        }
    }

    /// Copy of the bindings for `event`, or `None` if there are none.
    ///
    /// Dispatch iterates the copy, so bindings added or cleared by a handler
    /// do not affect the pass in flight.
    pub(crate) fn snapshot(&self, event: &str) -> Option<Vec<Rc<ListenerBinding<B>>>> {
        self.by_event
            .get(event)
            .filter(|bindings| !bindings.is_empty())
            .cloned()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.by_event.get(event).map_or(0, Vec::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.by_event.values().map(Vec::len).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.by_event.clear();
    }
}
