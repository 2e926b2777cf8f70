use thiserror::Error;

/// Errors raised by the pure transformations in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed matrix at line {line}: {reason}")]
    MalformedMatrix { line: usize, reason: String },
}
