//! logos-based selector tokenizer.
//!
//! Token priority in logos is determined by longest match first, then
//! definition order. Whitespace is skipped here; the parser recovers
//! descendant combinators from the byte spans of adjacent tokens.

use logos::Logos;

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Double-quoted string literal (attribute values).
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal (attribute values).
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative (attribute values).
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: type tags, ids, class and attribute names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    /// `#`
    #[token("#")]
    Hash,

    /// `.`
    #[token(".")]
    Dot,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `,`
    #[token(",")]
    Comma,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `=`
    #[token("=")]
    Equals,
}

/// Tokenize a selector string into `(Token, text)` pairs.
///
/// Characters that fail to lex are dropped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}
