use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("invalid relation at column {}: {message}", position + 1)]
    Parse { position: usize, message: String },
}
