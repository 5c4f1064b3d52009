//! Statement parser.
//!
//! Recursive descent over the token stream of one line. Expression precedence,
//! lowest to highest:
//!
//! 1. `in` conversion (non-associative)
//! 2. additive `+ -` (left)
//! 3. multiplicative `* /` (left)
//! 4. unary `+ -` (right)
//! 5. power `^` (right)
//!
//! Juxtaposition - a numeric literal directly followed by an identifier, as
//! in `9.8 meter` - is implicit multiplication that binds tighter than `*`
//! and `/`, so `2 km / 2000 m` is a ratio of two quantities.

use crate::ast::{BinaryOp, ConvertTarget, Expr, Statement, UnaryOp};
use crate::error::EvalError;
use crate::functions;
use crate::token::{Token, TokenKind};

/// Parser over the token stream of one line.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// The token stream must end with an `Eof` token, as produced by
    /// [`crate::lexer::Lexer::tokenize`].
    pub fn new(tokens: Vec<Token>) -> Parser {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::Eof,
                ..
            })
        ));
        Parser {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.position + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, EvalError> {
        if self.kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        let near = match self.kind() {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.current().text),
        };
        EvalError::Syntax {
            message: message.into(),
            near,
        }
    }

    /// Parse the whole line as one statement.
    pub fn parse_statement(mut self) -> Result<Statement, EvalError> {
        let statement = match self.kind() {
            TokenKind::Eof => return Ok(Statement::Empty),
            TokenKind::Del => {
                self.advance();
                let name = self.expect(TokenKind::Ident, "a variable name after 'del'")?;
                Statement::Delete(name.text)
            }
            TokenKind::Variables => {
                self.advance();
                Statement::ListVariables
            }
            TokenKind::Reset => {
                self.advance();
                Statement::Reset
            }
            TokenKind::Import => {
                self.advance();
                let raw = self.expect(TokenKind::RawText, "a file path after 'import'")?;
                if raw.text.is_empty() {
                    return Err(self.error("expected a file path after 'import'"));
                }
                Statement::Import(strip_quotes(&raw.text).to_string())
            }
            TokenKind::Eq => {
                self.advance();
                let raw = self.expect(TokenKind::RawText, "an equation after 'eq'")?;
                if raw.text.is_empty() {
                    return Err(self.error("expected an equation after 'eq'"));
                }
                Statement::DefineEquation(raw.text)
            }
            TokenKind::Solve => {
                self.advance();
                let mut names = Vec::new();
                let first = self.expect(TokenKind::Ident, "a variable name after 'solve'")?;
                names.push(first.text);
                while self.kind() == TokenKind::Comma {
                    self.advance();
                    let name = self.expect(TokenKind::Ident, "a variable name after ','")?;
                    if !names.contains(&name.text) {
                        names.push(name.text);
                    }
                }
                Statement::Solve(names)
            }
            TokenKind::Ident if self.peek_kind() == TokenKind::Assign => {
                let name = self.advance().text;
                self.advance(); // '='
                let expr = self.parse_expression()?;
                let print = !self.eat_semicolon();
                self.expect_end()?;
                return Ok(Statement::Assign { name, expr, print });
            }
            _ => {
                let expr = self.parse_expression()?;
                let print = !self.eat_semicolon();
                self.expect_end()?;
                return Ok(Statement::Expression { expr, print });
            }
        };

        // Commands accept an optional trailing ';'.
        self.eat_semicolon();
        self.expect_end()?;
        Ok(statement)
    }

    fn eat_semicolon(&mut self) -> bool {
        if self.kind() == TokenKind::Semicolon {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_end(&mut self) -> Result<(), EvalError> {
        if self.kind() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error("unexpected token after statement"))
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        self.parse_conversion()
    }

    // conversion: additive ('in' (additive | 'si'))?   (non-associative)
    fn parse_conversion(&mut self) -> Result<Expr, EvalError> {
        let value = self.parse_additive()?;
        if self.kind() != TokenKind::In {
            return Ok(value);
        }
        self.advance();
        let target = if self.kind() == TokenKind::Si {
            self.advance();
            ConvertTarget::Si
        } else {
            ConvertTarget::Unit(Box::new(self.parse_additive()?))
        };
        Ok(Expr::Convert {
            value: Box::new(value),
            target,
        })
    }

    // additive: multiplicative (('+' | '-') multiplicative)*
    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // multiplicative: unary (('*' | '/') unary)*
    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // unary: ('+' | '-') unary | power
    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    // power: primary ('^' unary)?   (right-associative, binds tightest)
    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.kind() != TokenKind::Caret {
            return Ok(base);
        }
        self.advance();
        let exponent = self.parse_unary()?;
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    // primary: FLOAT | IDENT | function '(' expression ')' | '(' expression ')'
    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.kind() {
            TokenKind::Float => {
                let token = self.advance();
                let value: f64 = token
                    .text
                    .parse()
                    .map_err(|_| EvalError::Syntax {
                        message: "invalid numeric literal".to_string(),
                        near: format!("'{}'", token.text),
                    })?;
                let number = Expr::Number(value);
                // Juxtaposition: a numeric literal directly followed by an
                // identifier multiplies, binding tighter than '*' and '/'
                // so `2 km / 2000 m` divides quantity by quantity. The
                // juxtaposed term keeps its own power (`2 second^2`).
                if self.kind() == TokenKind::Ident {
                    let unit_term = self.parse_power()?;
                    return Ok(Expr::Binary {
                        op: BinaryOp::Mul,
                        left: Box::new(number),
                        right: Box::new(unit_term),
                    });
                }
                Ok(number)
            }
            TokenKind::Ident => {
                let name = self.advance().text;
                if self.kind() == TokenKind::LParen && functions::is_function(&name) {
                    self.advance();
                    let arg = self.parse_expression()?;
                    self.expect(TokenKind::RParen, "')' after function argument")?;
                    return Ok(Expr::Call {
                        function: name,
                        arg: Box::new(arg),
                    });
                }
                Ok(Expr::Ident(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.error("expected an expression")),
        }
    }
}

fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed)
}
