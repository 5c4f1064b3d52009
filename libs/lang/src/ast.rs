//! Abstract syntax for one statement of the calculator language.

/// An expression; evaluation produces exactly one quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Variable, unit, or constant - resolved at evaluation time.
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `value in target` / `value in si`.
    Convert {
        value: Box<Expr>,
        target: ConvertTarget,
    },
    /// Unary function application, e.g. `log(x)`.
    Call {
        function: String,
        arg: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertTarget {
    /// Decompose into SI base units.
    Si,
    /// Convert into the unit of the evaluated target expression.
    Unit(Box<Expr>),
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Blank line or comment.
    Empty,
    /// Bare expression; `print` is false when a trailing `;` suppressed output.
    Expression { expr: Expr, print: bool },
    /// `name = expr`.
    Assign {
        name: String,
        expr: Expr,
        print: bool,
    },
    /// `del name`.
    Delete(String),
    /// `variables`.
    ListVariables,
    /// `reset`.
    Reset,
    /// `import <path>`.
    Import(String),
    /// `eq <relation text>`.
    DefineEquation(String),
    /// `solve a, b, ...` - duplicates collapsed, first-seen order kept.
    Solve(Vec<String>),
}
