//! Component tree: insert, remove, reparent, ancestry, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ComponentData, ComponentId};

/// Empty slice constant for returning when a component has no children.
const EMPTY_CHILDREN: &[ComponentId] = &[];

/// The scene graph every controller queries, backed by a slotmap arena.
///
/// Parent back-references are used for ancestry checks and selector
/// combinators only. Nothing in the controller layer mutates the tree.
#[derive(Debug)]
pub struct ComponentTree {
    pub(crate) nodes: SlotMap<ComponentId, ComponentData>,
    children: SecondaryMap<ComponentId, Vec<ComponentId>>,
    parent: SecondaryMap<ComponentId, ComponentId>,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
        }
    }

    /// Insert a top-level component (no parent).
    pub fn insert(&mut self, data: ComponentData) -> ComponentId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a component as the last child of `parent`.
    ///
    /// If `parent` does not exist the component is inserted at top level.
    pub fn insert_child(&mut self, parent: ComponentId, data: ComponentData) -> ComponentId {
        let id = self.insert(data);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
            self.parent.insert(id, parent);
        }
        id
    }

    /// Remove a component and all of its descendants.
    ///
    /// Returns the data of the removed component, or `None` if it didn't exist.
    pub fn remove(&mut self, id: ComponentId) -> Option<ComponentData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        let mut to_remove = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Move `node` (with its subtree) under `new_parent`.
    ///
    /// Returns `false` and leaves the tree untouched if either component is
    /// missing, or if the move would make `node` its own ancestor.
    pub fn reparent(&mut self, node: ComponentId, new_parent: ComponentId) -> bool {
        if !self.contains(node)
            || !self.contains(new_parent)
            || node == new_parent
            || self.is_descendant_of(new_parent, node)
        {
            return false;
        }
        self.detach(node);
        self.parent.insert(node, new_parent);
        if let Some(siblings) = self.children.get_mut(new_parent) {
            siblings.push(node);
        }
        true
    }

    fn detach(&mut self, id: ComponentId) {
        if let Some(old_parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// The parent of a component, if it has one.
    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.parent.get(id).copied()
    }

    /// The children of a component, in insertion order.
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to its top-level ancestor.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, id: ComponentId, ancestor: ComponentId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Immutable access to a component's data.
    pub fn get(&self, id: ComponentId) -> Option<&ComponentData> {
        self.nodes.get(id)
    }

    /// Mutable access to a component's data.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentData> {
        self.nodes.get_mut(id)
    }

    /// Number of components in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains the given component.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from (and including) `start`.
    pub fn walk_depth_first(&self, start: ComponentId) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}
