//! Token types for the calculator lexer.

/// Token kinds of the statement language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Float,
    Ident,
    /// Verbatim tail captured after `eq` or `import`.
    RawText,

    // Keywords
    Del,
    In,
    Si,
    Variables,
    Reset,
    Solve,
    Import,
    Eq,

    // Operators and punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Assign,
    Semicolon,
    Comma,

    // End of input
    Eof,
}

/// A token with its source text and the character position it started at.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Token {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Token {
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            position,
        }
    }
}
