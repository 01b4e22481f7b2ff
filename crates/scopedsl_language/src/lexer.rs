//! Lexer for the scope DSL.
//!
//! Converts source text into tokens. Filter bodies are not tokenized here:
//! the lexer captures the balanced JSON between `[` and `]` verbatim and
//! leaves decoding to the parser.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer over scope DSL source.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token. After the end of input every call yields `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.position;
        let line = self.line;
        let column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::point(start, line, column));
        };

        let kind = match c {
            '.' => self.single(TokenKind::Dot),
            '+' => self.single(TokenKind::Plus),
            '|' => self.single(TokenKind::Pipe),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '!' => self.single(TokenKind::Bang),
            '[' => self.scan_bracket(),
            c if is_ident_start(c) => self.scan_ident(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(kind, Span::new(start, self.position, line, column))
    }

    /// Tokenizes all input, including the trailing `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some('/') if self.rest.starts_with("//") => {
                    while self.peek_char().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_ident(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if !is_ident_char(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Ident(text)
    }

    /// Scans `[]` or a bracketed JSON filter body.
    fn scan_bracket(&mut self) -> TokenKind {
        self.advance(); // '['
        self.skip_trivia();
        if self.peek_char() == Some(']') {
            self.advance();
            return TokenKind::Iterate;
        }

        let mut body = String::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        loop {
            let Some(c) = self.peek_char() else {
                return TokenKind::Error("unterminated filter".into());
            };
            self.advance();
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                body.push(c);
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' | '[' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                ']' if depth == 0 => return TokenKind::FilterJson(body.trim_end().to_string()),
                ']' => depth -= 1,
                _ => {}
            }
            body.push(c);
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}
