use std::path::{Path, PathBuf};

/// Result alias used throughout the crate.
pub type StripeResult<T> = Result<T, StripeError>;

/// Errors produced while loading inputs, compositing or encoding a strip.
///
/// Every variant is fatal for the run: there is no partial-success mode.
#[derive(thiserror::Error, Debug)]
pub enum StripeError {
    /// Settings document is absent or unreadable.
    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    /// Settings document exists but could not be understood.
    #[error("configuration malformed: {0}")]
    ConfigMalformed(String),

    /// A required source or mask file does not exist.
    #[error("input not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A codec could not parse an input file.
    #[error("decode error: {0}")]
    Decode(String),

    /// Caller supplied an argument outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Resampling or blending failed for a frame.
    #[error("composite error: {0}")]
    Composite(String),

    /// The output animation could not be produced or written.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripeError {
    pub fn config_missing(msg: impl Into<String>) -> Self {
        Self::ConfigMissing(msg.into())
    }

    pub fn config_malformed(msg: impl Into<String>) -> Self {
        Self::ConfigMalformed(msg.into())
    }

    pub fn source_not_found(path: impl AsRef<Path>) -> Self {
        Self::SourceNotFound(path.as_ref().to_path_buf())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
