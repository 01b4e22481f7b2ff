//! Tokens of the scope DSL.

use crate::span::Span;

/// A token with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token type and payload.
    pub kind: TokenKind,
    /// Where the token was found.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// An identifier, which may contain `:` `_` `-` and digits.
    Ident(String),
    /// `.`
    Dot,
    /// `+`
    Plus,
    /// `|`
    Pipe,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `!`
    Bang,
    /// `[]`
    Iterate,
    /// The raw JSON text between `[` and its matching `]`.
    FilterJson(String),
    /// End of input.
    Eof,
    /// A lexical error.
    Error(String),
}

impl TokenKind {
    /// Returns a short name for error messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::Dot => "`.`".into(),
            Self::Plus => "`+`".into(),
            Self::Pipe => "`|`".into(),
            Self::LParen => "`(`".into(),
            Self::RParen => "`)`".into(),
            Self::Bang => "`!`".into(),
            Self::Iterate => "`[]`".into(),
            Self::FilterJson(_) => "filter".into(),
            Self::Eof => "end of input".into(),
            Self::Error(message) => message.clone(),
        }
    }
}
