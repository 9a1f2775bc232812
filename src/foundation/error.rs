/// Result alias used across the crate.
pub type ShotResult<T> = Result<T, ShotError>;

/// Crate-wide error type.
///
/// Conditions the compositor treats as non-fatal (an asset that has not finished decoding,
/// missing localized text, a failed mesh load) never surface as a `ShotError`; they are skipped
/// layers or state transitions instead.
#[derive(thiserror::Error, Debug)]
pub enum ShotError {
    /// Caller supplied data that cannot be used (unknown device, bad scale, bad color...).
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// The raster backend failed.
    #[error("render error: {0}")]
    Render(String),

    /// Scene (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShotError {
    /// Build a [`ShotError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShotError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ShotError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ShotError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ShotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
