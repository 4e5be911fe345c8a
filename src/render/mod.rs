//! CPU rendering of the deterministic placeholders.

/// Deterministic placeholder still image.
pub mod placeholder_image;
/// Deterministic placeholder video.
pub mod placeholder_video;
/// Pixel surface and frame readback.
pub mod surface;
/// Font database and text layers.
pub mod text;
