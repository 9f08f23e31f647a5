/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Errors produced while configuring, preparing, or pulling frames from a slideshow.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or caller-supplied argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// A slide image could not be decoded or prepared.
    #[error("decode error: {0}")]
    Decode(String),

    /// Pixel composition failed.
    #[error("render error: {0}")]
    Render(String),

    /// Manifest (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A frame was requested after the show finished.
    #[error("frame source is already done")]
    AlreadyDone,

    /// A frame was requested from a source that is not set up, failed setup, or is closed.
    #[error("frame source not ready: {0}")]
    NotReady(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReelError::NotReady`].
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
