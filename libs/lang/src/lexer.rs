//! Calculator lexer - tokenizes one input line.
//!
//! The lexer is a two-state machine. In the normal state it produces the
//! ordinary token stream; immediately after an `eq` or `import` keyword it
//! switches to raw-capture and returns the rest of the line, up to a `;`,
//! as one verbatim [`TokenKind::RawText`] token. Equation bodies and file
//! paths are opaque payloads for their own parsers, not expressions of the
//! calculator grammar.
//!
//! Unrecognized characters are never fatal: they are skipped and reported as
//! diagnostics alongside the token stream.

use crate::token::{Token, TokenKind};
use std::fmt;

/// A recoverable lexical error: the offending character was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct LexDiagnostic {
    pub character: char,
    pub position: usize,
}

impl fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "illegal character '{}' at column {} (skipped)",
            self.character,
            self.position + 1
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    RawCapture,
}

/// The calculator lexer.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    mode: Mode,
    diagnostics: Vec<LexDiagnostic>,
}

impl Lexer {
    pub fn new(input: &str) -> Lexer {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
            mode: Mode::Normal,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize a whole line. The returned stream always ends with `Eof`.
    pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexDiagnostic>) {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, lexer.diagnostics)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next_token(&mut self) -> Token {
        if self.mode == Mode::RawCapture {
            return self.capture_raw();
        }

        loop {
            while matches!(self.current(), Some(c) if c == ' ' || c == '\t') {
                self.advance();
            }

            let position = self.position;
            let Some(c) = self.current() else {
                return Token::eof(position);
            };

            match c {
                '#' => {
                    // Comment runs to end of line.
                    self.position = self.chars.len();
                    return Token::eof(self.position);
                }
                '0'..='9' => return self.read_number(),
                '.' if matches!(self.peek(), Some(d) if d.is_ascii_digit()) => {
                    return self.read_number()
                }
                c if c.is_ascii_alphabetic() || c == '_' => return self.read_identifier(),
                '+' => return self.single(TokenKind::Plus),
                '-' => return self.single(TokenKind::Minus),
                '*' => return self.single(TokenKind::Star),
                '/' => return self.single(TokenKind::Slash),
                '^' => return self.single(TokenKind::Caret),
                '(' => return self.single(TokenKind::LParen),
                ')' => return self.single(TokenKind::RParen),
                '=' => return self.single(TokenKind::Assign),
                ';' => return self.single(TokenKind::Semicolon),
                ',' => return self.single(TokenKind::Comma),
                other => {
                    self.diagnostics.push(LexDiagnostic {
                        character: other,
                        position,
                    });
                    self.advance();
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let position = self.position;
        let c = self.chars[position];
        self.advance();
        Token::new(kind, c.to_string(), position)
    }

    fn read_number(&mut self) -> Token {
        let start = self.position;
        while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.current() == Some('.') {
            self.advance();
            while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text: String = self.chars[start..self.position].iter().collect();
        Token::new(TokenKind::Float, text, start)
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while matches!(self.current(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.advance();
        }
        let text: String = self.chars[start..self.position].iter().collect();

        let kind = match text.as_str() {
            "del" => TokenKind::Del,
            "in" => TokenKind::In,
            "si" => TokenKind::Si,
            "variables" => TokenKind::Variables,
            "reset" => TokenKind::Reset,
            "solve" => TokenKind::Solve,
            "import" => TokenKind::Import,
            "eq" => TokenKind::Eq,
            _ => TokenKind::Ident,
        };

        // The payload of an equation definition or an import is taken verbatim.
        if kind == TokenKind::Eq || kind == TokenKind::Import {
            self.mode = Mode::RawCapture;
        }

        Token::new(kind, text, start)
    }

    fn capture_raw(&mut self) -> Token {
        self.mode = Mode::Normal;
        let start = self.position;
        while matches!(self.current(), Some(c) if c != ';') {
            self.advance();
        }
        let text: String = self.chars[start..self.position].iter().collect();
        Token::new(TokenKind::RawText, text.trim(), start)
    }
}
