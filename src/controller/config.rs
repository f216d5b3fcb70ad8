//! Controller configuration and shared collaborators.

use std::fmt;
use std::rc::Rc;

use crate::component::node::ComponentId;
use crate::component::registry::ComponentRegistry;
use crate::event::bus::EventBus;

// ---------------------------------------------------------------------------
// ControllerConfig
// ---------------------------------------------------------------------------

/// Per-instance controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Name used in errors and log fields. Defaults to the behavior's type name.
    pub id: Option<String>,
    /// Root of the subtree the controller manages. Required.
    pub view: Option<ComponentId>,
}

impl ControllerConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the view (builder).
    pub fn with_view(mut self, view: ComponentId) -> Self {
        self.view = Some(view);
        self
    }
}

// ---------------------------------------------------------------------------
// ControllerContext
// ---------------------------------------------------------------------------

/// The collaborators every controller of an application shares.
#[derive(Clone)]
pub struct ControllerContext {
    pub registry: Rc<dyn ComponentRegistry>,
    pub bus: Rc<EventBus>,
}

impl ControllerContext {
    /// Bundle a registry and a bus.
    pub fn new(registry: Rc<dyn ComponentRegistry>, bus: Rc<EventBus>) -> Self {
        Self { registry, bus }
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
