/// Convenience result type used across dreamframe.
pub type DreamResult<T> = Result<T, DreamError>;

/// Caller-visible error taxonomy.
///
/// Remote backend failures never show up here: they are [`crate::BackendError`] values that the
/// orchestrators log and swallow while walking the fallback chain.
#[derive(thiserror::Error, Debug)]
pub enum DreamError {
    /// Invalid request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Placeholder rendering or encoding failed.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Writing or moving the artifact into its output directory failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DreamError {
    /// Build a [`DreamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DreamError::Synthesis`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build a [`DreamError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
