//! Type-erased event arguments.
//!
//! Components publish events with whatever arguments their type defines.
//! [`EventArgs`] carries them as an ordered list of `Any` values that
//! handlers downcast by position.

use std::any::Any;
use std::fmt;

/// Ordered, type-erased arguments of a published event.
#[derive(Default)]
pub struct EventArgs {
    values: Vec<Box<dyn Any>>,
}

impl EventArgs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument (builder).
    pub fn with(mut self, value: impl Any) -> Self {
        self.push(value);
        self
    }

    /// Append an argument.
    pub fn push(&mut self, value: impl Any) {
        self.values.push(Box::new(value));
    }

    /// Downcast the argument at `index`.
    ///
    /// Returns `None` if the index is out of range or the type differs.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventArgs")
            .field("len", &self.values.len())
            .finish()
    }
}
