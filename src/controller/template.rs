//! Per-type ref templates.
//!
//! A controller type declares its refs once, as a flat [`RefTemplate`].
//! Derived types start from their parent's template with
//! [`RefTemplate::extend`] and override entries by name. Building the template
//! inside a `static LazyLock` makes the merge happen once per type:
//!
//! ```
//! use std::sync::LazyLock;
//! use gilt_control::controller::{RefSpec, RefTemplate};
//!
//! static BASE: LazyLock<RefTemplate> =
//!     LazyLock::new(|| RefTemplate::new().with_ref("viewport", "viewport"));
//!
//! static LOGIN: LazyLock<RefTemplate> = LazyLock::new(|| {
//!     RefTemplate::extend(&BASE)
//!         .with_ref("submit", "#submit")
//!         .with_ref("fields", RefSpec::new("field").multiple())
//! });
//!
//! assert_eq!(LOGIN.len(), 3);
//! ```

use std::collections::BTreeMap;

use super::refs::RefSpec;

/// Immutable name → [`RefSpec`] map for one controller type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTemplate {
    refs: BTreeMap<String, RefSpec>,
}

impl RefTemplate {
    /// An empty template.
    pub const fn new() -> Self {
        Self {
            refs: BTreeMap::new(),
        }
    }

    /// Start from a parent type's template.
    pub fn extend(parent: &RefTemplate) -> Self {
        parent.clone()
    }

    /// Add or replace a ref (builder). Replacement is whole, never a field merge.
    pub fn with_ref(mut self, name: impl Into<String>, spec: impl Into<RefSpec>) -> Self {
        self.refs.insert(name.into(), spec.into());
        self
    }

    /// Look up a declared ref.
    pub fn get(&self, name: &str) -> Option<&RefSpec> {
        self.refs.get(name)
    }

    /// Number of declared refs.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether no refs are declared.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Declared refs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefSpec)> {
        self.refs.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}
