use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("incompatible units: '{from}' vs '{to}'")]
    Incompatible { from: String, to: String },

    #[error("affine unit '{0}' cannot be combined multiplicatively")]
    AffineCompose(String),

    #[error("dimension exponent overflow")]
    ExponentOverflow,
}
