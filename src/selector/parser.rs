//! Recursive descent selector parser.
//!
//! Parses selector strings into a [`SelectorList`]. Uses the logos-based
//! tokenizer from [`crate::selector::tokenizer`].

use logos::Logos;

use super::model::*;
use super::tokenizer::Token;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("invalid character {text:?} at byte {offset}")]
    InvalidCharacter { offset: usize, text: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("empty selector")]
    Empty,
}

/// A positioned token with byte spans for whitespace detection.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
    byte_start: usize,
    byte_end: usize,
}

fn tokenize_with_spans(input: &str) -> Result<Vec<PToken>, ParseError> {
    let mut tokens = Vec::new();
    for (idx, (result, span)) in Token::lexer(input).spanned().enumerate() {
        let text = input[span.clone()].to_string();
        match result {
            Ok(token) => tokens.push(PToken {
                token,
                text,
                pos: idx,
                byte_start: span.start,
                byte_end: span.end,
            }),
            Err(()) => {
                return Err(ParseError::InvalidCharacter {
                    offset: span.start,
                    text,
                })
            }
        }
    }
    Ok(tokens)
}

/// Parse a selector string into a [`SelectorList`].
pub fn parse_selector_list(input: &str) -> Result<SelectorList, ParseError> {
    let tokens = tokenize_with_spans(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let mut selectors = vec![parser.parse_selector()?];
    while let Some(t) = parser.peek() {
        if t.token != Token::Comma {
            return Err(ParseError::UnexpectedToken {
                position: t.pos,
                message: format!("expected ',' or end of selector, got '{}'", t.text),
            });
        }
        parser.advance();
        selectors.push(parser.parse_selector()?);
    }

    Ok(SelectorList::from_parts(selectors, input))
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<&PToken> {
        let tok = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(tok)
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Whether the current token directly follows the previous one (no whitespace).
    fn is_adjacent(&self) -> bool {
        let Some(prev) = self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return false;
        };
        self.peek().is_some_and(|curr| curr.byte_start == prev.byte_end)
    }

    /// Consume an identifier, naming what was expected in the error.
    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            Some(tok) if tok.token == Token::Ident => Ok(tok.text.clone()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {what}, got {:?} '{}'", tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {:?}, got {:?} '{}'", expected, tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    /// Parse compounds joined by `>` or whitespace, up to `,` or end of input.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound_selector()?)];

        loop {
            match self.peek() {
                Some(t) if t.token == Token::GreaterThan => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                // A compound start that was not absorbed by the previous
                // compound is separated by whitespace.
                Some(t)
                    if matches!(
                        t.token,
                        Token::Ident | Token::Hash | Token::Dot | Token::Star | Token::BracketOpen
                    ) =>
                {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    /// Parse one compound, e.g. `button#ok.primary[text=OK]`.
    ///
    /// Only a type or `*` may lead; `#`, `.` and `[` parts are appended while
    /// they stay adjacent to the previous token.
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();

        match self.peek().map(|t| t.token.clone()) {
            Some(Token::Ident) => {
                let name = self.expect_ident("type name")?;
                compound.push(SelectorComponent::Type(name));
            }
            Some(Token::Star) => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(Token::Hash | Token::Dot | Token::BracketOpen) => {
                compound.push(self.parse_simple()?);
            }
            Some(_) => {
                return Err(ParseError::UnexpectedToken {
                    position: self.current_pos(),
                    message: "expected selector part".into(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected selector part".into())),
        }

        while self.is_adjacent()
            && self
                .peek()
                .is_some_and(|t| matches!(t.token, Token::Hash | Token::Dot | Token::BracketOpen))
        {
            compound.push(self.parse_simple()?);
        }

        Ok(compound)
    }

    /// Parse one `#id`, `.class` or `[attr(=value)?]`.
    fn parse_simple(&mut self) -> Result<SelectorComponent, ParseError> {
        let Some(tok) = self.advance().cloned() else {
            return Err(ParseError::UnexpectedEof("expected selector part".into()));
        };
        match tok.token {
            Token::Hash => Ok(SelectorComponent::Id(self.expect_ident("id after '#'")?)),
            Token::Dot => Ok(SelectorComponent::Class(self.expect_ident("class after '.'")?)),
            Token::BracketOpen => self.parse_attribute(),
            _ => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected '#', '.' or '[', got '{}'", tok.text),
            }),
        }
    }

    /// Parse the rest of an attribute selector after `[`.
    fn parse_attribute(&mut self) -> Result<SelectorComponent, ParseError> {
        let name = self.expect_ident("attribute name")?;
        let value = match self.peek().map(|t| t.token.clone()) {
            Some(Token::Equals) => {
                self.advance();
                Some(self.parse_attribute_value()?)
            }
            _ => None,
        };
        self.expect(&Token::BracketClose)?;
        Ok(SelectorComponent::Attribute { name, value })
    }

    fn parse_attribute_value(&mut self) -> Result<String, ParseError> {
        let Some(tok) = self.advance() else {
            return Err(ParseError::UnexpectedEof("expected attribute value".into()));
        };
        match tok.token {
            Token::Ident | Token::Number => Ok(tok.text.clone()),
            Token::StringLiteral | Token::StringLiteralSingle => {
                Ok(tok.text[1..tok.text.len() - 1].to_string())
            }
            _ => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected attribute value, got '{}'", tok.text),
            }),
        }
    }
}
