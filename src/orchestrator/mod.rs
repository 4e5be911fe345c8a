//! Prompt-to-artifact orchestration: ordered remote backends, then a deterministic placeholder.

/// Ordered fallback over remote backends.
pub mod chain;
/// Still image orchestration.
pub mod image;
/// Video orchestration.
pub mod video;
