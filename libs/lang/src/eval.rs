//! Unit-aware expression evaluation.
//!
//! Evaluation is pure with respect to the session: it reads bindings but
//! commits nothing, so a failure mid-expression leaves no partial state.

use crate::ast::{BinaryOp, ConvertTarget, Expr, UnaryOp};
use crate::error::EvalError;
use crate::functions;
use crate::session::Session;
use vernier_units::{lookup, Quantity};

/// Mathematical constants, resolved after variables and units.
fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        "inf" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

pub fn evaluate(expr: &Expr, session: &Session) -> Result<Quantity, EvalError> {
    match expr {
        Expr::Number(value) => Ok(Quantity::dimensionless(*value)),
        Expr::Ident(name) => lookup_name(name, session),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, session)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Minus => value.neg(),
            })
        }
        Expr::Binary { op, left, right } => {
            let lhs = evaluate(left, session)?;
            let rhs = evaluate(right, session)?;
            apply_binary(*op, &lhs, &rhs)
        }
        Expr::Convert { value, target } => {
            let value = evaluate(value, session)?;
            match target {
                ConvertTarget::Si => Ok(value.to_base()),
                ConvertTarget::Unit(expr) => {
                    let target = evaluate(expr, session)?;
                    Ok(value.convert_to(&target.unit)?)
                }
            }
        }
        Expr::Call { function, arg } => {
            let arg = evaluate(arg, session)?;
            apply_function(function, &arg)
        }
    }
}

/// Identifier lookup precedence: session variable, then unit name, then
/// mathematical constant.
fn lookup_name(name: &str, session: &Session) -> Result<Quantity, EvalError> {
    if let Some(value) = session.variable(name) {
        return Ok(value.clone());
    }
    if let Some(unit) = lookup(name) {
        return Ok(Quantity::new(1.0, unit));
    }
    if let Some(value) = constant(name) {
        return Ok(Quantity::dimensionless(value));
    }
    Err(EvalError::UnknownName(name.to_string()))
}

fn apply_binary(op: BinaryOp, lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, EvalError> {
    match op {
        BinaryOp::Add => Ok(lhs.add(rhs)?),
        BinaryOp::Sub => Ok(lhs.sub(rhs)?),
        BinaryOp::Mul => Ok(lhs.mul(rhs)?),
        BinaryOp::Div => Ok(lhs.div(rhs)?),
        BinaryOp::Pow => pow(lhs, rhs),
    }
}

/// Exponentiation. The exponent must decompose to a dimensionless value. A
/// dimensionless base is raised directly; a dimensioned base requires an exact
/// integer exponent and is computed by repeated multiplication, which keeps
/// the result dimensionally consistent.
fn pow(base: &Quantity, exponent: &Quantity) -> Result<Quantity, EvalError> {
    let exponent_si = exponent.to_base();
    if !exponent_si.dims().is_dimensionless() {
        return Err(EvalError::DimensionedExponent(exponent.unit.to_string()));
    }
    let power = exponent_si.value;

    let base_si = base.to_base();
    if base_si.dims().is_dimensionless() {
        return Ok(Quantity::dimensionless(base_si.value.powf(power)));
    }

    if !power.is_finite() || power.fract() != 0.0 {
        return Err(EvalError::NonIntegerExponent(power));
    }
    let n = power as i64;
    let mut result = Quantity::dimensionless(1.0);
    for _ in 0..n.unsigned_abs() {
        result = result.mul(base)?;
    }
    if n < 0 {
        result = Quantity::dimensionless(1.0).div(&result)?;
    }
    Ok(result)
}

fn apply_function(name: &str, arg: &Quantity) -> Result<Quantity, EvalError> {
    let function =
        functions::lookup(name).ok_or_else(|| EvalError::UnknownName(name.to_string()))?;
    let arg_si = arg.to_base();
    if !arg_si.dims().is_dimensionless() {
        return Err(EvalError::FunctionArgument {
            function: name.to_string(),
            unit: arg.unit.to_string(),
        });
    }
    Ok(Quantity::dimensionless(function(arg_si.value)))
}
