//! Symbolic expression trees.
//!
//! The representation is deliberately small: binary nodes, numeric leaves,
//! free symbols, and opaque unary function calls. Simplification does
//! constant folding and identity removal only - enough for the solver's
//! elimination steps to recognize numeric coefficients.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SymExpr {
    Num(f64),
    Sym(String),
    Add(Box<SymExpr>, Box<SymExpr>),
    Sub(Box<SymExpr>, Box<SymExpr>),
    Mul(Box<SymExpr>, Box<SymExpr>),
    Div(Box<SymExpr>, Box<SymExpr>),
    Pow(Box<SymExpr>, Box<SymExpr>),
    Neg(Box<SymExpr>),
    /// Unary function application, kept opaque (e.g. `log(x)`).
    Call(String, Box<SymExpr>),
}

impl SymExpr {
    pub fn num(value: f64) -> SymExpr {
        SymExpr::Num(value)
    }

    pub fn sym(name: impl Into<String>) -> SymExpr {
        SymExpr::Sym(name.into())
    }

    pub fn add(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::Add(Box::new(a), Box::new(b))
    }

    pub fn sub(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::Sub(Box::new(a), Box::new(b))
    }

    pub fn mul(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::Mul(Box::new(a), Box::new(b))
    }

    pub fn div(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::Div(Box::new(a), Box::new(b))
    }

    pub fn pow(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::Pow(Box::new(a), Box::new(b))
    }

    pub fn neg(a: SymExpr) -> SymExpr {
        SymExpr::Neg(Box::new(a))
    }

    /// The numeric value, if this node is a literal.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            SymExpr::Num(v) => Some(*v),
            _ => None,
        }
    }

    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            SymExpr::Num(_) => {}
            SymExpr::Sym(name) => {
                out.insert(name.clone());
            }
            SymExpr::Add(a, b)
            | SymExpr::Sub(a, b)
            | SymExpr::Mul(a, b)
            | SymExpr::Div(a, b)
            | SymExpr::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
            SymExpr::Neg(a) | SymExpr::Call(_, a) => a.collect_symbols(out),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            SymExpr::Num(_) => false,
            SymExpr::Sym(s) => s == name,
            SymExpr::Add(a, b)
            | SymExpr::Sub(a, b)
            | SymExpr::Mul(a, b)
            | SymExpr::Div(a, b)
            | SymExpr::Pow(a, b) => a.contains(name) || b.contains(name),
            SymExpr::Neg(a) | SymExpr::Call(_, a) => a.contains(name),
        }
    }

    /// Replace every occurrence of the symbol `name` with `value`.
    pub fn substitute(&self, name: &str, value: &SymExpr) -> SymExpr {
        match self {
            SymExpr::Num(_) => self.clone(),
            SymExpr::Sym(s) => {
                if s == name {
                    value.clone()
                } else {
                    self.clone()
                }
            }
            SymExpr::Add(a, b) => {
                SymExpr::add(a.substitute(name, value), b.substitute(name, value))
            }
            SymExpr::Sub(a, b) => {
                SymExpr::sub(a.substitute(name, value), b.substitute(name, value))
            }
            SymExpr::Mul(a, b) => {
                SymExpr::mul(a.substitute(name, value), b.substitute(name, value))
            }
            SymExpr::Div(a, b) => {
                SymExpr::div(a.substitute(name, value), b.substitute(name, value))
            }
            SymExpr::Pow(a, b) => {
                SymExpr::pow(a.substitute(name, value), b.substitute(name, value))
            }
            SymExpr::Neg(a) => SymExpr::neg(a.substitute(name, value)),
            SymExpr::Call(f, a) => SymExpr::Call(f.clone(), Box::new(a.substitute(name, value))),
        }
    }

    /// Constant folding and identity removal, bottom-up.
    pub fn simplify(&self) -> SymExpr {
        match self {
            SymExpr::Num(_) | SymExpr::Sym(_) => self.clone(),
            SymExpr::Add(a, b) => match (a.simplify(), b.simplify()) {
                (SymExpr::Num(x), SymExpr::Num(y)) => SymExpr::Num(x + y),
                (SymExpr::Num(x), b) if x == 0.0 => b,
                (a, SymExpr::Num(y)) if y == 0.0 => a,
                (a, b) => SymExpr::add(a, b),
            },
            SymExpr::Sub(a, b) => match (a.simplify(), b.simplify()) {
                (SymExpr::Num(x), SymExpr::Num(y)) => SymExpr::Num(x - y),
                (a, SymExpr::Num(y)) if y == 0.0 => a,
                (SymExpr::Num(x), b) if x == 0.0 => SymExpr::neg(b).simplify(),
                (a, b) if a == b => SymExpr::Num(0.0),
                (a, b) => SymExpr::sub(a, b),
            },
            SymExpr::Mul(a, b) => match (a.simplify(), b.simplify()) {
                (SymExpr::Num(x), SymExpr::Num(y)) => SymExpr::Num(x * y),
                (SymExpr::Num(x), _) | (_, SymExpr::Num(x)) if x == 0.0 => SymExpr::Num(0.0),
                (SymExpr::Num(x), b) if x == 1.0 => b,
                (a, SymExpr::Num(y)) if y == 1.0 => a,
                (a, b) => SymExpr::mul(a, b),
            },
            SymExpr::Div(a, b) => match (a.simplify(), b.simplify()) {
                (SymExpr::Num(x), SymExpr::Num(y)) if y != 0.0 => SymExpr::Num(x / y),
                (a, SymExpr::Num(y)) if y == 1.0 => a,
                (SymExpr::Num(x), b) if x == 0.0 && !matches!(b, SymExpr::Num(_)) => {
                    SymExpr::Num(0.0)
                }
                (a, b) => SymExpr::div(a, b),
            },
            SymExpr::Pow(a, b) => match (a.simplify(), b.simplify()) {
                (SymExpr::Num(x), SymExpr::Num(y)) => SymExpr::Num(x.powf(y)),
                (a, SymExpr::Num(y)) if y == 1.0 => a,
                (_, SymExpr::Num(y)) if y == 0.0 => SymExpr::Num(1.0),
                (SymExpr::Num(x), _) if x == 1.0 => SymExpr::Num(1.0),
                (a, b) => SymExpr::pow(a, b),
            },
            SymExpr::Neg(a) => match a.simplify() {
                SymExpr::Num(x) => SymExpr::Num(-x),
                SymExpr::Neg(inner) => *inner,
                a => SymExpr::neg(a),
            },
            SymExpr::Call(f, a) => SymExpr::Call(f.clone(), Box::new(a.simplify())),
        }
    }
}

// Rendering precedence levels, lowest binds loosest.
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

impl SymExpr {
    fn precedence(&self) -> u8 {
        match self {
            SymExpr::Add(..) | SymExpr::Sub(..) => PREC_ADD,
            SymExpr::Mul(..) | SymExpr::Div(..) => PREC_MUL,
            SymExpr::Neg(_) => PREC_NEG,
            SymExpr::Num(v) if *v < 0.0 => PREC_NEG,
            SymExpr::Pow(..) => PREC_POW,
            _ => PREC_ATOM,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        let needs_parens = self.precedence() < min_prec;
        if needs_parens {
            write!(f, "(")?;
        }
        match self {
            SymExpr::Num(v) => write!(f, "{v}")?,
            SymExpr::Sym(name) => write!(f, "{name}")?,
            SymExpr::Add(a, b) => {
                a.render(f, PREC_ADD)?;
                write!(f, " + ")?;
                b.render(f, PREC_ADD)?;
            }
            SymExpr::Sub(a, b) => {
                a.render(f, PREC_ADD)?;
                write!(f, " - ")?;
                b.render(f, PREC_MUL)?;
            }
            SymExpr::Mul(a, b) => {
                a.render(f, PREC_MUL)?;
                write!(f, " * ")?;
                b.render(f, PREC_MUL)?;
            }
            SymExpr::Div(a, b) => {
                a.render(f, PREC_MUL)?;
                write!(f, " / ")?;
                b.render(f, PREC_NEG)?;
            }
            SymExpr::Neg(a) => {
                write!(f, "-")?;
                a.render(f, PREC_NEG)?;
            }
            SymExpr::Pow(a, b) => {
                a.render(f, PREC_ATOM)?;
                write!(f, "^")?;
                b.render(f, PREC_POW)?;
            }
            SymExpr::Call(name, a) => {
                write!(f, "{name}(")?;
                a.render(f, 0)?;
                write!(f, ")")?;
            }
        }
        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Renders in the calculator's own syntax (`^` for powers), so the output
/// can be re-parsed as the right-hand side of an assignment.
impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
