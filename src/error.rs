use thiserror::Error;

/// Errors raised by the statistical pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    /// The outcome matrix or the treatment names are malformed.
    ///
    /// Raised at construction time; the offending input is never partially
    /// accepted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A per-call parameter is out of range or unrecognized.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatError>;
