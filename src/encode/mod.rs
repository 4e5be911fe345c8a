//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are used by the placeholder video
//! renderer.

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
