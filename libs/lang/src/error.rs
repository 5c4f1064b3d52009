//! Error types for statement evaluation.

use thiserror::Error;
use vernier_units::Error as UnitError;

/// Anything that can go wrong while executing one statement. Every variant is
/// recoverable: the engine reports it and the session continues.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("syntax error near {near}: {message}")]
    Syntax { message: String, near: String },

    #[error("name '{0}' is not a variable, unit, or constant")]
    UnknownName(String),

    #[error(transparent)]
    Dimension(#[from] UnitError),

    #[error("exponent must be an integer when the base has units, found {0}")]
    NonIntegerExponent(f64),

    #[error("exponent must be dimensionless, found '{0}'")]
    DimensionedExponent(String),

    #[error("argument to {function}() must be dimensionless, found '{unit}'")]
    FunctionArgument { function: String, unit: String },

    #[error("equation error: {0}")]
    Equation(String),

    #[error("solve error: {0}")]
    Solve(String),

    #[error("cannot import '{path}': {source}")]
    Import {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
