//! The registry seam between controllers and the component graph.

use std::cell::RefCell;

use super::node::ComponentId;
use super::tree::ComponentTree;
use crate::selector::{matcher, SelectorList};

/// Read-only component lookups a controller needs.
///
/// [`ComponentTree`] implements this directly. `RefCell<R>` implements it by
/// borrowing for the duration of each call, so an application can keep
/// mutating a shared `Rc<RefCell<ComponentTree>>` between events and hand the
/// same `Rc` to its controllers as `Rc<dyn ComponentRegistry>`.
pub trait ComponentRegistry {
    /// Components in `scope`'s subtree (inclusive) matching `selector`, in
    /// document order.
    fn query(&self, selector: &SelectorList, scope: ComponentId) -> Vec<ComponentId>;

    /// Whether `component` matches `selector`.
    fn matches(&self, component: ComponentId, selector: &SelectorList) -> bool;

    /// Whether `component` is a strict descendant of `ancestor`.
    fn is_descendant_of(&self, component: ComponentId, ancestor: ComponentId) -> bool;
}

impl ComponentRegistry for ComponentTree {
    fn query(&self, selector: &SelectorList, scope: ComponentId) -> Vec<ComponentId> {
        ComponentTree::query(self, selector, scope)
    }

    fn matches(&self, component: ComponentId, selector: &SelectorList) -> bool {
        matcher::matches(self, component, selector)
    }

    fn is_descendant_of(&self, component: ComponentId, ancestor: ComponentId) -> bool {
        ComponentTree::is_descendant_of(self, component, ancestor)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for RefCell<R> {
    fn query(&self, selector: &SelectorList, scope: ComponentId) -> Vec<ComponentId> {
        self.borrow().query(selector, scope)
    }

    fn matches(&self, component: ComponentId, selector: &SelectorList) -> bool {
        self.borrow().matches(component, selector)
    }

    fn is_descendant_of(&self, component: ComponentId, ancestor: ComponentId) -> bool {
        self.borrow().is_descendant_of(component, ancestor)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::component::node::ComponentData;

    #[test]
    fn shared_tree_sees_later_mutations() {
        let tree = Rc::new(RefCell::new(ComponentTree::new()));
        let registry: Rc<dyn ComponentRegistry> = tree.clone();

        let root = tree.borrow_mut().insert(ComponentData::new("viewport"));
        let buttons = SelectorList::parse("button").unwrap();
        assert!(registry.query(&buttons, root).is_empty());

        let ok = tree.borrow_mut().insert_child(root, ComponentData::new("button"));
        assert_eq!(registry.query(&buttons, root), vec![ok]);
        assert!(registry.matches(ok, &buttons));
        assert!(registry.is_descendant_of(ok, root));
    }
}
