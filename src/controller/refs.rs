//! Named refs: selector bindings resolved lazily against the view subtree.
//!
//! Each binding remembers its last resolution. A cached sequence is reused
//! until the caller forces a query or the binding opts out of caching with
//! `no_cache`; in both cases the fresh result still overwrites the cache slot
//! so it stays available for introspection.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::error::{compile_selector, ControllerError};
use crate::component::node::ComponentId;
use crate::component::registry::ComponentRegistry;
use crate::selector::SelectorList;

// ---------------------------------------------------------------------------
// RefSpec
// ---------------------------------------------------------------------------

/// Declaration of a ref: selector plus resolution options.
///
/// A bare selector string converts into a spec with both options off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSpec {
    pub selector: String,
    /// Resolve to every match instead of the first one.
    pub multiple: bool,
    /// Query the registry on every resolution.
    pub no_cache: bool,
}

impl RefSpec {
    /// A single-component, cached ref.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            multiple: false,
            no_cache: false,
        }
    }

    /// Resolve to every match (builder).
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Re-query on every resolution (builder).
    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }
}

impl From<&str> for RefSpec {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

impl From<String> for RefSpec {
    fn from(selector: String) -> Self {
        Self::new(selector)
    }
}

// ---------------------------------------------------------------------------
// GetRefOptions / Resolved
// ---------------------------------------------------------------------------

/// Options for a single ref lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetRefOptions {
    /// Ignore any cached result and query the registry now.
    pub force_query: bool,
}

impl GetRefOptions {
    /// Options that force a fresh query.
    pub fn force_query() -> Self {
        Self { force_query: true }
    }
}

/// A resolved ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Non-multiple ref: the first match, or `None` when nothing matched.
    One(Option<ComponentId>),
    /// Multiple ref: every match in registry order, possibly empty.
    Many(Rc<[ComponentId]>),
}

impl Resolved {
    /// The component of a non-multiple ref. `None` for multiple refs.
    pub fn one(&self) -> Option<ComponentId> {
        match self {
            Self::One(component) => *component,
            Self::Many(_) => None,
        }
    }

    /// The sequence of a multiple ref. `None` for non-multiple refs.
    pub fn many(&self) -> Option<&Rc<[ComponentId]>> {
        match self {
            Self::One(_) => None,
            Self::Many(components) => Some(components),
        }
    }

    /// Whether this came from a multiple ref.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

// ---------------------------------------------------------------------------
// RefStore
// ---------------------------------------------------------------------------

/// A compiled ref. Only `cached` changes after creation.
#[derive(Debug)]
pub(crate) struct RefBinding {
    selector: SelectorList,
    multiple: bool,
    no_cache: bool,
    cached: Option<Rc<[ComponentId]>>,
}

impl RefBinding {
    pub(crate) fn compile(spec: &RefSpec) -> Result<Self, ControllerError> {
        Ok(Self {
            selector: compile_selector(&spec.selector)?,
            multiple: spec.multiple,
            no_cache: spec.no_cache,
            cached: None,
        })
    }
}

/// Ref name → binding for one controller.
#[derive(Debug, Default)]
pub(crate) struct RefStore {
    bindings: HashMap<String, RefBinding>,
}

impl RefStore {
    /// Compile every spec first, then write them all; nothing is written on error.
    pub(crate) fn insert_all<I, K, V>(&mut self, entries: I) -> Result<(), ControllerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RefSpec>,
    {
        let compiled = entries
            .into_iter()
            .map(|(name, spec)| Ok((name.into(), RefBinding::compile(&spec.into())?)))
            .collect::<Result<Vec<_>, ControllerError>>()?;
        self.bindings.extend(compiled);
        Ok(())
    }

    /// Resolve `name`, or `None` if it was never registered.
    pub(crate) fn resolve(
        &mut self,
        name: &str,
        registry: &dyn ComponentRegistry,
        view: ComponentId,
        options: GetRefOptions,
    ) -> Option<Resolved> {
        let binding = self.bindings.get_mut(name)?;
        let reusable = binding
            .cached
            .clone()
            .filter(|_| !binding.no_cache && !options.force_query);
        let components = match reusable {
            Some(cached) => {
                trace!(ref_name = name, "ref cache hit");
                cached
            }
            None => {
                let fresh: Rc<[ComponentId]> = registry.query(&binding.selector, view).into();
                trace!(ref_name = name, selector = %binding.selector, matched = fresh.len(), "ref queried");
                binding.cached = Some(fresh.clone());
                fresh
            }
        };

        Some(if binding.multiple {
            Resolved::Many(components)
        } else {
            Resolved::One(components.first().copied())
        })
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Registered names, sorted.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// The last resolved sequence of `name`, without querying.
    pub(crate) fn cached(&self, name: &str) -> Option<Rc<[ComponentId]>> {
        self.bindings.get(name)?.cached.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::component::{ComponentData, ComponentTree};

    /// Counts queries made through it.
    struct Spy {
        tree: ComponentTree,
        queries: Cell<usize>,
    }

    impl ComponentRegistry for Spy {
        fn query(&self, selector: &SelectorList, scope: ComponentId) -> Vec<ComponentId> {
            self.queries.set(self.queries.get() + 1);
            self.tree.query(selector, scope)
        }

        fn matches(&self, component: ComponentId, selector: &SelectorList) -> bool {
            ComponentRegistry::matches(&self.tree, component, selector)
        }

        fn is_descendant_of(&self, component: ComponentId, ancestor: ComponentId) -> bool {
            self.tree.is_descendant_of(component, ancestor)
        }
    }

    fn spy() -> (Spy, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let root = tree.insert(ComponentData::new("form"));
        let a = tree.insert_child(root, ComponentData::new("textfield").with_id("a"));
        let b = tree.insert_child(root, ComponentData::new("textfield").with_id("b"));
        let spy = Spy {
            tree,
            queries: Cell::new(0),
        };
        (spy, root, a, b)
    }

    #[test]
    fn spec_from_str_has_defaults() {
        let spec = RefSpec::from("#ok");
        assert_eq!(spec, RefSpec::new("#ok"));
        assert!(!spec.multiple);
        assert!(!spec.no_cache);
    }

    #[test]
    fn single_ref_resolves_first() {
        let (spy, root, a, _b) = spy();
        let mut store = RefStore::default();
        store.insert_all([("field", "textfield")]).unwrap();
        let resolved = store.resolve("field", &spy, root, GetRefOptions::default());
        assert_eq!(resolved, Some(Resolved::One(Some(a))));
    }

    #[test]
    fn multiple_ref_resolves_all() {
        let (spy, root, a, b) = spy();
        let mut store = RefStore::default();
        store
            .insert_all([("fields", RefSpec::new("textfield").multiple())])
            .unwrap();
        let resolved = store
            .resolve("fields", &spy, root, GetRefOptions::default())
            .unwrap();
        assert_eq!(resolved.many().map(|m| m.to_vec()), Some(vec![a, b]));
        assert_eq!(resolved.one(), None);
    }

    #[test]
    fn cache_reused_until_forced() {
        let (spy, root, ..) = spy();
        let mut store = RefStore::default();
        store.insert_all([("f", "textfield")]).unwrap();

        store.resolve("f", &spy, root, GetRefOptions::default());
        store.resolve("f", &spy, root, GetRefOptions::default());
        assert_eq!(spy.queries.get(), 1);

        store.resolve("f", &spy, root, GetRefOptions::force_query());
        assert_eq!(spy.queries.get(), 2);
    }

    #[test]
    fn no_cache_queries_every_time_but_remembers() {
        let (spy, root, a, _b) = spy();
        let mut store = RefStore::default();
        store
            .insert_all([("f", RefSpec::new("#a").no_cache())])
            .unwrap();
        assert!(store.cached("f").is_none());

        store.resolve("f", &spy, root, GetRefOptions::default());
        store.resolve("f", &spy, root, GetRefOptions::default());
        assert_eq!(spy.queries.get(), 2);
        assert_eq!(store.cached("f").map(|c| c.to_vec()), Some(vec![a]));
    }

    #[test]
    fn unknown_name_is_none() {
        let (spy, root, ..) = spy();
        let mut store = RefStore::default();
        assert!(store
            .resolve("nope", &spy, root, GetRefOptions::default())
            .is_none());
    }

    #[test]
    fn bulk_insert_is_atomic() {
        let mut store = RefStore::default();
        store.insert_all([("keep", "form")]).unwrap();
        let result = store.insert_all([("good", "button"), ("bad", "#")]);
        assert!(matches!(result, Err(ControllerError::InvalidSelector { .. })));
        assert_eq!(store.names(), vec!["keep"]);
    }

    #[test]
    fn overwrite_replaces_whole_binding() {
        let (spy, root, a, b) = spy();
        let mut store = RefStore::default();
        store
            .insert_all([("f", RefSpec::new("textfield").multiple())])
            .unwrap();
        store.resolve("f", &spy, root, GetRefOptions::default());

        store.insert_all([("f", "#b")]).unwrap();
        assert!(store.cached("f").is_none(), "cache dropped with the old binding");
        let resolved = store.resolve("f", &spy, root, GetRefOptions::default());
        assert_eq!(resolved, Some(Resolved::One(Some(b))));
        assert_ne!(Some(a), resolved.and_then(|r| r.one()));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut store = RefStore::default();
        store.insert_all([("a", "form"), ("b", "button")]).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        store.clear();
        assert_eq!(store.len(), 0);
        assert!(!store.contains("a"));
    }
}
