/// Convenience result type used across snapbooth.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by booth APIs.
///
/// Only total absence of input ([`BoothError::MissingTemplate`],
/// [`BoothError::EmptyCaptureBuffer`]) is escalated by the compositing pipeline. Stale indices,
/// failed decodes and out-of-range reorders are recovered where they happen.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// Invalid template, configuration or user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Compositing was requested without a selected template.
    #[error("no template selected")]
    MissingTemplate,

    /// Compositing was requested before any photo was captured.
    #[error("no photos captured")]
    EmptyCaptureBuffer,

    /// Capture buffer rejected an append (full, or capture already finished).
    #[error("capture error: {0}")]
    Capture(String),

    /// Image bytes could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Raster backend failure.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`BoothError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BoothError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Return `true` for errors that require the user to restart the session.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::MissingTemplate | Self::EmptyCaptureBuffer)
    }
}

impl From<serde_json::Error> for BoothError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
