//! Component queries: selector lookups scoped to a subtree.

use super::node::{ComponentData, ComponentId};
use super::tree::ComponentTree;
use crate::selector::matcher;
use crate::selector::SelectorList;

impl ComponentTree {
    /// All components in `scope`'s subtree (inclusive) matching `selector`.
    ///
    /// Results come in depth-first pre-order, each component once. Ancestors
    /// outside the scope still take part in combinator matching.
    pub fn query(&self, selector: &SelectorList, scope: ComponentId) -> Vec<ComponentId> {
        self.walk_depth_first(scope)
            .into_iter()
            .filter(|&id| matcher::matches(self, id, selector))
            .collect()
    }

    /// The first match of `selector` in `scope`'s subtree, if any.
    pub fn query_first(&self, selector: &SelectorList, scope: ComponentId) -> Option<ComponentId> {
        self.walk_depth_first(scope)
            .into_iter()
            .find(|&id| matcher::matches(self, id, selector))
    }

    /// Find the first component with the given id anywhere in the tree.
    ///
    /// Iterates the arena, not a subtree.
    pub fn find_by_id(&self, id: &str) -> Option<ComponentId> {
        self.nodes
            .iter()
            .find(|(_, data)| data.id.as_deref() == Some(id))
            .map(|(component, _)| component)
    }

    /// All components in `scope`'s subtree satisfying an arbitrary predicate.
    pub fn query_all(
        &self,
        scope: ComponentId,
        predicate: impl Fn(&ComponentData) -> bool,
    ) -> Vec<ComponentId> {
        self.walk_depth_first(scope)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}
