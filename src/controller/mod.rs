//! Controllers: named refs and selector-scoped listeners over a view subtree.
//!
//! A [`Controller`] owns no components. It is bound to a *view* (the root of
//! the subtree it manages), looks components up through a
//! [`ComponentRegistry`], and receives every event published on an
//! [`EventBus`]. Each dispatch pass only considers events fired by the view
//! or one of its descendants.
//!
//! ```
//! use std::cell::{Cell, RefCell};
//! use std::rc::Rc;
//!
//! use gilt_control::component::{ComponentData, ComponentTree};
//! use gilt_control::controller::{Behavior, Controller, ControllerConfig, ControllerContext, ListenerSet};
//! use gilt_control::event::{EventArgs, EventBus};
//!
//! #[derive(Default)]
//! struct Clicks(Cell<u32>);
//! impl Behavior for Clicks {}
//!
//! let tree = Rc::new(RefCell::new(ComponentTree::new()));
//! let root = tree.borrow_mut().insert(ComponentData::new("window"));
//! let submit = tree
//!     .borrow_mut()
//!     .insert_child(root, ComponentData::new("button").with_id("submit"));
//!
//! let bus = Rc::new(EventBus::new());
//! let ctx = ControllerContext::new(tree.clone(), bus.clone());
//! let controller = Controller::new(&ctx, ControllerConfig::new().with_view(root), Clicks::default())?;
//! controller.listen(ListenerSet::<Clicks>::new().on("#submit", "click", |c, _| {
//!     c.behavior().0.set(c.behavior().0.get() + 1);
//! }))?;
//!
//! bus.publish(submit, "click", &EventArgs::new());
//! assert_eq!(controller.behavior().0.get(), 1);
//! # Ok::<(), gilt_control::controller::ControllerError>(())
//! ```

pub mod behavior;
pub mod config;
pub mod error;
pub mod listeners;
pub mod refs;
pub mod template;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

pub use behavior::Behavior;
pub use config::{ControllerConfig, ControllerContext};
pub use error::ControllerError;
pub use listeners::{Event, ListenerSet};
pub use refs::{GetRefOptions, RefSpec, Resolved};
pub use template::RefTemplate;

use crate::component::node::ComponentId;
use crate::component::registry::ComponentRegistry;
use crate::event::args::EventArgs;
use crate::event::bus::{EventBus, Outcome, Subscriber, SubscriptionId};
use crate::event::observable::{Observable, ObserverId};
use listeners::ListenerTable;
use refs::RefStore;

/// Name of the lifecycle notification fired by [`Controller::destroy`].
pub const DESTROY_EVENT: &str = "destroy";

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

/// Where a controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Built, `init` not finished yet.
    Constructed,
    /// `init` has run.
    Active,
    /// `destroy` has started. Terminal.
    Destroyed,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Binds application logic ([`Behavior`]) to a view subtree.
pub struct Controller<B: Behavior = ()> {
    id: String,
    view: ComponentId,
    behavior: B,
    registry: Rc<dyn ComponentRegistry>,
    bus: Rc<EventBus>,
    refs: RefCell<RefStore>,
    listeners: RefCell<ListenerTable<B>>,
    subscription: Cell<Option<SubscriptionId>>,
    state: Cell<LifecycleState>,
    observers: Observable<Controller<B>>,
    this: Weak<Controller<B>>,
}

impl<B: Behavior> Controller<B> {
    /// Build a controller, install `B::refs()`, then run `B::init`.
    ///
    /// Fails with [`ControllerError::MissingView`] when the config has no view,
    /// and with [`ControllerError::InvalidSelector`] when a declared ref
    /// does not parse.
    pub fn new(
        ctx: &ControllerContext,
        config: ControllerConfig,
        behavior: B,
    ) -> Result<Rc<Self>, ControllerError> {
        let id = config
            .id
            .unwrap_or_else(|| std::any::type_name::<B>().to_string());
        let view = config
            .view
            .ok_or_else(|| ControllerError::MissingView { controller: id.clone() })?;

        let controller = Rc::new_cyclic(|this| Self {
            id,
            view,
            behavior,
            registry: ctx.registry.clone(),
            bus: ctx.bus.clone(),
            refs: RefCell::new(RefStore::default()),
            listeners: RefCell::new(ListenerTable::new()),
            subscription: Cell::new(None),
            state: Cell::new(LifecycleState::Constructed),
            observers: Observable::new(),
            this: this.clone(),
        });
        controller.add_refs(B::refs().iter().map(|(name, spec)| (name, spec.clone())))?;
        debug!(controller = %controller.id, refs = B::refs().len(), "controller constructed");

        B::init(&controller);
        if controller.state.get() == LifecycleState::Constructed {
            controller.state.set(LifecycleState::Active);
        }
        Ok(controller)
    }

    /// Name used in errors and logs.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root of the managed subtree.
    pub fn view(&self) -> ComponentId {
        self.view
    }

    /// The application state attached to this controller.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The registry this controller queries.
    pub fn registry(&self) -> &Rc<dyn ComponentRegistry> {
        &self.registry
    }

    /// The bus this controller listens on.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.state.get() == LifecycleState::Destroyed
    }

    fn ensure_alive(&self) -> Result<(), ControllerError> {
        if self.is_destroyed() {
            return Err(ControllerError::Destroyed {
                controller: self.id.clone(),
            });
        }
        Ok(())
    }

    // ── Refs ─────────────────────────────────────────────────────────

    /// Register (or replace) the ref `name`.
    pub fn add_ref(&self, name: impl Into<String>, spec: impl Into<RefSpec>) -> Result<(), ControllerError> {
        self.add_refs([(name.into(), spec.into())])
    }

    /// Register many refs at once.
    ///
    /// Either every entry is written or, if a selector fails to parse, none
    /// is. Names not mentioned keep their bindings; mentioned names are
    /// replaced whole.
    pub fn add_refs<I, K, V>(&self, entries: I) -> Result<(), ControllerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RefSpec>,
    {
        self.ensure_alive()?;
        self.refs.borrow_mut().insert_all(entries)
    }

    /// Resolve a ref, reusing its cache when allowed.
    pub fn get_ref(&self, name: &str) -> Result<Resolved, ControllerError> {
        self.get_ref_with(name, GetRefOptions::default())
    }

    /// Resolve a ref with explicit options.
    ///
    /// Fails with [`ControllerError::UnknownRef`] if `name` was never added.
    pub fn get_ref_with(&self, name: &str, options: GetRefOptions) -> Result<Resolved, ControllerError> {
        self.refs
            .borrow_mut()
            .resolve(name, self.registry.as_ref(), self.view, options)
            .ok_or_else(|| ControllerError::UnknownRef {
                controller: self.id.clone(),
                name: name.to_string(),
            })
    }

    /// Whether a ref named `name` is registered.
    pub fn has_ref(&self, name: &str) -> bool {
        self.refs.borrow().contains(name)
    }

    /// Registered ref names, sorted.
    pub fn ref_names(&self) -> Vec<String> {
        self.refs.borrow().names()
    }

    /// The last resolved sequence of a ref, without querying.
    pub fn cached_ref(&self, name: &str) -> Option<Rc<[ComponentId]>> {
        self.refs.borrow().cached(name)
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Append listeners, subscribing to the bus on the first call.
    ///
    /// Nothing is appended if any selector fails to parse.
    pub fn listen(&self, listeners: ListenerSet<B>) -> Result<(), ControllerError> {
        self.ensure_alive()?;
        let compiled = listeners.compile()?;
        let added = compiled.len();
        self.listeners.borrow_mut().extend(compiled);

        if self.subscription.get().is_none() {
            let subscriber: Weak<dyn Subscriber> = self.this.clone();
            self.subscription.set(Some(self.bus.subscribe(subscriber)));
            debug!(controller = %self.id, "controller subscribed to event bus");
        }
        trace!(controller = %self.id, added, "listeners added");
        Ok(())
    }

    /// Shorthand for listening to a single `(selector, event)` pair.
    pub fn control<O: Into<Outcome> + 'static>(
        &self,
        selector: &str,
        event: &str,
        handler: impl Fn(&Controller<B>, &Event<'_>) -> O + 'static,
    ) -> Result<(), ControllerError> {
        self.listen(ListenerSet::new().on(selector, event, handler))
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().count(event)
    }

    /// Number of listeners across all events.
    pub fn total_listener_count(&self) -> usize {
        self.listeners.borrow().total()
    }

    /// Whether the controller currently holds a bus subscription.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.get().is_some()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Observe a lifecycle notification of this controller (e.g. [`DESTROY_EVENT`]).
    pub fn on(&self, event: &str, observer: impl Fn(&Controller<B>) + 'static) -> ObserverId {
        self.observers.on(event, observer)
    }

    /// Stop observing.
    pub fn un(&self, id: ObserverId) -> bool {
        self.observers.un(id)
    }

    /// Tear the controller down. Later calls do nothing.
    ///
    /// Order: `B::on_destroy`, then the [`DESTROY_EVENT`] notification, then
    /// listener and ref teardown, then bus unsubscription. The view is left
    /// alone.
    pub fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        self.state.set(LifecycleState::Destroyed);
        debug!(controller = %self.id, "destroying controller");

        B::on_destroy(self);
        self.observers.fire(DESTROY_EVENT, self);

        self.listeners.borrow_mut().clear();
        self.refs.borrow_mut().clear();
        self.observers.clear();
        if let Some(subscription) = self.subscription.take() {
            self.bus.unsubscribe(subscription);
        }
    }

    /// Whether `component` is the view or inside it.
    fn in_scope(&self, component: ComponentId) -> bool {
        component == self.view || self.registry.is_descendant_of(component, self.view)
    }
}

impl<B: Behavior> Subscriber for Controller<B> {
    /// One dispatch pass.
    ///
    /// Runs every binding for `event` whose selector matches `source`, in
    /// registration order, over a snapshot taken before the first handler
    /// runs. A single `Cancel` makes the whole pass return `Cancel`.
    fn dispatch(&self, source: ComponentId, event: &str, args: &EventArgs) -> Outcome {
        let snapshot = self.listeners.borrow().snapshot(event);
        let Some(bindings) = snapshot else {
            return Outcome::Continue;
        };
        if !self.in_scope(source) {
            trace!(controller = %self.id, event, "event outside view ignored");
            return Outcome::Continue;
        }

        let event = Event {
            source,
            name: event,
            args,
        };
        let mut outcome = Outcome::Continue;
        let mut invoked = 0_usize;
        for binding in &bindings {
            if !self.registry.matches(source, &binding.selector) {
                continue;
            }
            invoked += 1;
            outcome = outcome.merge(binding.handler.call(self, &event));
        }
        trace!(controller = %self.id, event = event.name, invoked, cancelled = outcome.is_cancel(), "dispatch pass");
        outcome
    }
}

impl<B: Behavior> Drop for Controller<B> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.bus.unsubscribe(subscription);
        }
    }
}

impl<B: Behavior + fmt::Debug> fmt::Debug for Controller<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("view", &self.view)
            .field("state", &self.state.get())
            .field("behavior", &self.behavior)
            .field("refs", &self.refs.borrow().len())
            .field("listeners", &self.listeners.borrow().total())
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::sync::LazyLock;

    use super::*;
    use crate::component::{ComponentData, ComponentTree};

    struct Fixture {
        tree: Rc<RefCell<ComponentTree>>,
        bus: Rc<EventBus>,
        ctx: ControllerContext,
        form: ComponentId,
        submit: ComponentId,
        outside: ComponentId,
    }

    fn fixture() -> Fixture {
        let mut tree = ComponentTree::new();
        let form = tree.insert(ComponentData::new("form"));
        let submit = tree.insert_child(form, ComponentData::new("button").with_id("submit"));
        let outside = tree.insert(ComponentData::new("button").with_id("submit"));
        let tree = Rc::new(RefCell::new(tree));
        let bus = Rc::new(EventBus::new());
        let ctx = ControllerContext::new(tree.clone(), bus.clone());
        Fixture {
            tree,
            bus,
            ctx,
            form,
            submit,
            outside,
        }
    }

    #[derive(Default)]
    struct Log(RefCell<Vec<String>>);

    impl Log {
        fn push(&self, entry: &str) {
            self.0.borrow_mut().push(entry.to_string());
        }

        fn entries(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl Behavior for Log {
        fn on_destroy(controller: &Controller<Self>) {
            controller.behavior().push("on_destroy");
        }
    }

    #[test]
    fn missing_view_is_an_error() {
        let f = fixture();
        let err = Controller::new(&f.ctx, ControllerConfig::new().with_id("login"), ()).unwrap_err();
        assert_eq!(
            err,
            ControllerError::MissingView {
                controller: "login".into()
            }
        );
    }

    #[test]
    fn id_defaults_to_type_name() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), Log::default()).unwrap();
        assert!(c.id().ends_with("Log"));
        assert_eq!(c.state(), LifecycleState::Active);
        assert_eq!(c.view(), f.form);
    }

    #[test]
    fn declared_refs_installed_before_init() {
        struct Declared(Cell<Option<ComponentId>>);
        static REFS: LazyLock<RefTemplate> =
            LazyLock::new(|| RefTemplate::new().with_ref("submit", "#submit"));
        impl Behavior for Declared {
            fn refs() -> &'static RefTemplate {
                &REFS
            }
            fn init(controller: &Controller<Self>) {
                assert_eq!(controller.state(), LifecycleState::Constructed);
                let found = controller.get_ref("submit").ok().and_then(|r| r.one());
                controller.behavior().0.set(found);
            }
        }

        let f = fixture();
        let c = Controller::new(
            &f.ctx,
            ControllerConfig::new().with_view(f.form),
            Declared(Cell::new(None)),
        )
        .unwrap();
        assert_eq!(c.behavior().0.get(), Some(f.submit));
        assert_eq!(c.ref_names(), vec!["submit"]);
    }

    #[test]
    fn unknown_ref_names_controller_and_ref() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_id("c").with_view(f.form), ()).unwrap();
        assert_eq!(
            c.get_ref("nope"),
            Err(ControllerError::UnknownRef {
                controller: "c".into(),
                name: "nope".into()
            })
        );
    }

    #[test]
    fn listen_subscribes_once() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), ()).unwrap();
        assert!(!c.is_subscribed());
        c.control("#submit", "click", |_, _| {}).unwrap();
        c.control("button", "click", |_, _| {}).unwrap();
        assert!(c.is_subscribed());
        assert_eq!(f.bus.subscriber_count(), 1);
        assert_eq!(c.listener_count("click"), 2);
        assert_eq!(c.total_listener_count(), 2);
    }

    #[test]
    fn dispatch_is_scoped_to_view() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), Log::default()).unwrap();
        c.listen(ListenerSet::<Log>::new().on("#submit", "click", |c, e| {
            assert_eq!(e.name, "click");
            c.behavior().push("click");
        }))
        .unwrap();

        f.bus.publish(f.outside, "click", &EventArgs::new());
        assert!(c.behavior().entries().is_empty());
        f.bus.publish(f.submit, "click", &EventArgs::new());
        assert_eq!(c.behavior().entries(), vec!["click"]);
    }

    #[test]
    fn destroy_runs_hooks_in_order_then_goes_quiet() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), Log::default()).unwrap();
        c.control("#submit", "click", |c: &Controller<Log>, _| c.behavior().push("click"))
            .unwrap();
        c.on(DESTROY_EVENT, |c| {
            assert_eq!(c.total_listener_count(), 1);
            c.behavior().push("observer");
        });

        c.destroy();
        c.destroy();
        assert_eq!(c.behavior().entries(), vec!["on_destroy", "observer"]);
        assert!(c.is_destroyed());
        assert!(!c.is_subscribed());
        assert_eq!(f.bus.subscriber_count(), 0);

        f.bus.publish(f.submit, "click", &EventArgs::new());
        assert_eq!(c.behavior().entries().len(), 2);
        assert!(matches!(
            c.add_ref("x", "form"),
            Err(ControllerError::Destroyed { .. })
        ));
        assert!(matches!(
            c.control("#submit", "click", |_, _| {}),
            Err(ControllerError::Destroyed { .. })
        ));
    }

    #[test]
    fn drop_unsubscribes() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), ()).unwrap();
        c.control("#submit", "click", |_, _| {}).unwrap();
        assert_eq!(f.bus.subscriber_count(), 1);
        drop(c);
        assert_eq!(f.bus.subscriber_count(), 0);
        assert_eq!(f.bus.publish(f.submit, "click", &EventArgs::new()), Outcome::Continue);
    }

    #[test]
    fn tree_borrow_released_between_calls() {
        let f = fixture();
        let c = Controller::new(&f.ctx, ControllerConfig::new().with_view(f.form), ()).unwrap();
        c.add_ref("buttons", RefSpec::new("button").multiple()).unwrap();
        let late = f
            .tree
            .borrow_mut()
            .insert_child(f.form, ComponentData::new("button"));
        let fresh = c.get_ref_with("buttons", GetRefOptions::force_query()).unwrap();
        assert_eq!(fresh.many().map(|m| m.to_vec()), Some(vec![f.submit, late]));
    }
}
