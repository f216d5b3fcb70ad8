//! The application-facing side of a controller.

use super::template::RefTemplate;
use super::Controller;

/// Application logic attached to a [`Controller`].
///
/// The implementing type is the controller's own state, reachable from every
/// handler through [`Controller::behavior`]. All methods have empty defaults.
pub trait Behavior: Sized + 'static {
    /// Refs every controller of this type starts with.
    ///
    /// Return a template built once per type (typically in a `static
    /// LazyLock`), extending the parent type's template where there is one.
    fn refs() -> &'static RefTemplate {
        static EMPTY: RefTemplate = RefTemplate::new();
        &EMPTY
    }

    /// Runs once after construction, with declared refs in place.
    /// The usual place to call [`Controller::listen`].
    fn init(_controller: &Controller<Self>) {}

    /// Runs first during [`Controller::destroy`], while listeners and refs
    /// are still intact.
    fn on_destroy(_controller: &Controller<Self>) {}
}

/// A controller with no state of its own.
impl Behavior for () {}
