//! Controller errors.

use crate::selector::{ParseError, SelectorList};

/// Errors raised by controller construction and the ref/listen API.
///
/// All of these signal a misconfigured controller. Empty matches are not
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("controller `{controller}` has no view component")]
    MissingView { controller: String },
    #[error("controller `{controller}` has no ref named `{name}`")]
    UnknownRef { controller: String, name: String },
    #[error("invalid selector `{selector}`: {source}")]
    InvalidSelector {
        selector: String,
        source: ParseError,
    },
    #[error("controller `{controller}` has been destroyed")]
    Destroyed { controller: String },
}

/// Parse a selector given to the controller API.
pub(crate) fn compile_selector(selector: &str) -> Result<SelectorList, ControllerError> {
    SelectorList::parse(selector).map_err(|source| ControllerError::InvalidSelector {
        selector: selector.to_string(),
        source,
    })
}
