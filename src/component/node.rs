//! Component node types: ComponentId, ComponentData.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Stable identity of a component in a [`ComponentTree`](super::ComponentTree).
    pub struct ComponentId;
}

/// Data carried by a single component node.
///
/// Only what selectors look at lives here. Widget state and rendering are
/// owned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentData {
    /// Concrete type tag (e.g. `"button"`, `"textfield"`).
    pub type_tag: String,
    /// Additional type aliases this component answers to (e.g. `"field"`).
    pub aliases: Vec<String>,
    /// Optional id (`#id` selector).
    pub id: Option<String>,
    /// Classes (`.class` selector).
    pub classes: Vec<String>,
    /// Free-form attributes (`[name]` / `[name=value]` selectors).
    pub attributes: BTreeMap<String, String>,
}

impl ComponentData {
    /// Create component data with the given type tag and nothing else.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            aliases: Vec::new(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a type alias (builder). Duplicates are ignored.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.type_tag && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Add a class (builder). Duplicates are ignored.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Whether this component is of the given type, directly or via an alias.
    pub fn is_type(&self, name: &str) -> bool {
        self.type_tag == name || self.aliases.iter().any(|a| a == name)
    }

    /// Whether this component has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}
