//! Built-in unary functions.
//!
//! All functions take and return a dimensionless magnitude; the evaluator
//! rejects dimensioned arguments before dispatching here.

pub(crate) fn lookup(name: &str) -> Option<fn(f64) -> f64> {
    let function: fn(f64) -> f64 = match name {
        "exp" => f64::exp,
        // `log` is the natural logarithm.
        "log" | "ln" => f64::ln,
        "log10" => f64::log10,
        "log2" => f64::log2,
        "sqrt" => f64::sqrt,
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "asin" => f64::asin,
        "acos" => f64::acos,
        "atan" => f64::atan,
        "sinh" => f64::sinh,
        "cosh" => f64::cosh,
        "tanh" => f64::tanh,
        "abs" => f64::abs,
        "floor" => f64::floor,
        "ceil" => f64::ceil,
        _ => return None,
    };
    Some(function)
}

pub(crate) fn is_function(name: &str) -> bool {
    lookup(name).is_some()
}
