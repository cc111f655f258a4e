//! Error types for pointgrid

use thiserror::Error;

/// Main error type for pointgrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that cannot be gridded at all: empty point set, non-finite
    /// coordinates or values, missing projection.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Grid shape mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    ShapeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unknown attribute field: {0}")]
    UnknownField(String),

    #[error("Encoding error: {0}")]
    Encode(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`] built from a displayable value.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Encode(e.to_string())
    }
}

/// Result type alias for pointgrid operations
pub type Result<T> = std::result::Result<T, Error>;
