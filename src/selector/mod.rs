//! Selector engine: tokenizer, parser, AST, matcher.

pub mod matcher;
pub mod model;
pub mod parser;
pub mod tokenizer;

pub use model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorList, SelectorPart};
pub use parser::{parse_selector_list, ParseError};
