#![forbid(unsafe_code)]

//! Symbolic equation solving for vernier.
//!
//! Implements the calculator's [`vernier_lang::EquationSolver`] capability:
//! relation text is parsed into a small expression tree, and systems are
//! solved by isolating unknowns that appear linearly, substituting, and
//! falling back to quadratic roots for the residual equation. Solutions may
//! stay symbolic in already-known variables; the calculator resolves those at
//! re-injection time.

mod error;
mod expr;
mod parser;
mod solve;

pub use error::{Error, Result};
pub use expr::SymExpr;
pub use parser::parse_relation;
pub use solve::{solve, Solver};
