//! Selector matching against a component tree.
//!
//! Matching runs right to left: the subject compound is tested against the
//! candidate, then each combinator walks parent back-references.

use crate::component::node::{ComponentData, ComponentId};
use crate::component::tree::ComponentTree;

use super::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorList, SelectorPart};

/// Whether `component` matches any selector in `list`.
///
/// Components missing from the tree never match.
pub fn matches(tree: &ComponentTree, component: ComponentId, list: &SelectorList) -> bool {
    list.selectors
        .iter()
        .any(|selector| matches_selector(tree, component, selector))
}

/// Whether `component` matches a single selector chain.
pub fn matches_selector(tree: &ComponentTree, component: ComponentId, selector: &Selector) -> bool {
    matches_parts(tree, component, &selector.parts)
}

fn matches_parts(tree: &ComponentTree, component: ComponentId, parts: &[SelectorPart]) -> bool {
    let Some((SelectorPart::Compound(subject), rest)) = parts.split_last() else {
        return false;
    };
    let Some(data) = tree.get(component) else {
        return false;
    };
    if !matches_compound(data, subject) {
        return false;
    }

    match rest.split_last() {
        None => true,
        Some((SelectorPart::Combinator(Combinator::Child), rest)) => tree
            .parent(component)
            .is_some_and(|parent| matches_parts(tree, parent, rest)),
        Some((SelectorPart::Combinator(Combinator::Descendant), rest)) => tree
            .ancestors(component)
            .into_iter()
            .any(|ancestor| matches_parts(tree, ancestor, rest)),
        // Two compounds in a row: malformed chain.
        Some((SelectorPart::Compound(_), _)) => false,
    }
}

/// Whether one component's data satisfies every part of a compound.
pub fn matches_compound(data: &ComponentData, compound: &CompoundSelector) -> bool {
    !compound.components.is_empty()
        && compound.components.iter().all(|component| match component {
            SelectorComponent::Type(name) => data.is_type(name),
            SelectorComponent::Universal => true,
            SelectorComponent::Id(id) => data.id.as_deref() == Some(id.as_str()),
            SelectorComponent::Class(class) => data.has_class(class),
            SelectorComponent::Attribute { name, value } => match (data.attribute(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        })
}
