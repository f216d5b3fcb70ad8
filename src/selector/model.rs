//! Selector AST: SelectorList, Selector, CompoundSelector, SelectorComponent.

use std::fmt;
use std::str::FromStr;

use super::parser::{parse_selector_list, ParseError};

/// A single simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorComponent {
    /// Type selector: matches the type tag or any alias (e.g. `button`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Id selector: `#submit`.
    Id(String),
    /// Class selector: `.primary`.
    Class(String),
    /// Attribute selector: `[name]` or `[name=value]`.
    Attribute {
        /// Attribute name.
        name: String,
        /// Required value, or `None` to test presence only.
        value: Option<String>,
    },
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// Simple selectors applied to one component, e.g. `button#ok.primary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// Compound selectors joined by combinators.
///
/// `panel > button.primary` has parts
/// `[Compound(panel), Combinator(Child), Compound(button.primary)]`.
/// A well-formed selector starts and ends with a compound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rightmost compound, i.e. the one applied to the candidate itself.
    pub fn subject(&self) -> Option<&CompoundSelector> {
        match self.parts.last() {
            Some(SelectorPart::Compound(compound)) => Some(compound),
            _ => None,
        }
    }
}

/// A comma-separated union of selectors, keeping its source text.
///
/// This is the parsed form of every selector string handed to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
    source: String,
}

impl SelectorList {
    pub(crate) fn from_parts(selectors: Vec<Selector>, source: &str) -> Self {
        Self {
            selectors,
            source: source.trim().to_string(),
        }
    }

    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_selector_list(input)
    }

    /// The (trimmed) source text this list was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for SelectorList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
