//! Parser for the scope DSL.
//!
//! ```text
//! expr    := path (('+' | '|') path)*
//! path    := primary step*
//! primary := 'actor' | 'location' | 'entities' '(' '!'? IDENT ')'
//!          | SCOPE-ID | '(' expr ')'
//! step    := '.' IDENT | '[]' | '[' JSON ']'
//! ```
//!
//! A bare identifier containing `:` is a reference to another scope.

use scopedsl_foundation::{Error, ErrorKind, Result};

use crate::ast::{AstNode, SourceKind};
use crate::filter::FilterExpr;
use crate::lexer::Lexer;
use crate::registry::ScopeId;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for scope DSL source.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses a complete scope expression.
    ///
    /// # Errors
    /// Returns a `Parse` error if the source is not a single valid expression.
    pub fn parse(&mut self) -> Result<AstNode> {
        let ast = self.parse_expr()?;
        match &self.current.kind {
            TokenKind::Eof => Ok(ast),
            other => Err(self.error(&format!("unexpected {} after expression", other.name()))),
        }
    }

    fn parse_expr(&mut self) -> Result<AstNode> {
        let mut left = self.parse_path()?;
        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Pipe) {
            self.advance();
            let right = self.parse_path()?;
            left = left.union(right);
        }
        Ok(left)
    }

    fn parse_path(&mut self) -> Result<AstNode> {
        let mut node = self.parse_primary()?;
        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident("field name after `.`")?;
                    node = node.field(&field);
                }
                TokenKind::Iterate => {
                    self.advance();
                    node = node.iterate();
                }
                TokenKind::FilterJson(text) => {
                    let expr = self.decode_filter(text, self.current.span)?;
                    self.advance();
                    node = node.filter(expr);
                }
                _ => return Ok(node),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, token.span, "unclosed `(`")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "actor" => Ok(AstNode::actor()),
                    "location" => Ok(AstNode::location()),
                    "entities" => self.parse_entities(token.span),
                    _ if name.contains(':') => ScopeId::parse(&name)
                        .map(AstNode::reference)
                        .map_err(|e| self.error_at(token.span, &e.to_string())),
                    _ => Err(self.error_at(token.span, &format!("unknown source `{name}`"))),
                }
            }
            TokenKind::Error(message) => Err(self.error_at(token.span, &message)),
            other => Err(self.error_at(
                token.span,
                &format!("expected a scope source, found {}", other.name()),
            )),
        }
    }

    fn parse_entities(&mut self, start: Span) -> Result<AstNode> {
        self.expect(&TokenKind::LParen, start, "expected `(` after `entities`")?;
        let negated = self.current.kind == TokenKind::Bang;
        if negated {
            self.advance();
        }
        let component = self.expect_ident("component type")?;
        self.expect(&TokenKind::RParen, start, "unclosed `entities(`")?;
        Ok(AstNode::Source(SourceKind::Entities {
            component: component.into(),
            negated,
        }))
    }

    fn decode_filter(&self, text: &str, span: Span) -> Result<FilterExpr> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| self.error_at(span, &format!("invalid filter JSON: {e}")))?;
        if !json.is_object() {
            return Err(self.error_at(span, "filter must be a JSON object"));
        }
        FilterExpr::from_json(&json).map_err(|e| self.error_at(span, &e.to_string()))
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, expected: &TokenKind, opened: Span, message: &str) -> Result<()> {
        if &self.current.kind == expected {
            self.advance();
            Ok(())
        } else if self.current.kind == TokenKind::Eof {
            Err(self.error_at(opened, message))
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            )))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(&format!(
                "expected {what}, found {}",
                self.current.kind.name()
            )))
        }
    }

    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    #[allow(clippy::unused_self)]
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::new(ErrorKind::Parse {
            message: message.to_string(),
            line: span.line,
            column: span.column,
        })
    }
}

/// Parses scope DSL source into an AST.
///
/// # Errors
/// Returns a `Parse` error if the source cannot be parsed.
pub fn parse_scope(source: &str) -> Result<AstNode> {
    Parser::new(source).parse()
}
