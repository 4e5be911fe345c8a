use crate::foundation::error::{DreamError, DreamResult};

/// Zero-based frame index within a rendered clip.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> DreamResult<Self> {
        if width == 0 || height == 0 {
            return Err(DreamError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// The fixed 512x512 canvas used by both placeholder renderers.
    pub const fn square_512() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }

    /// Size of one tightly packed RGBA8 frame.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::square_512()
    }
}

/// Timing of a fixed-length clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClipTiming {
    /// Clip length in whole seconds.
    pub duration_secs: u32,
    /// Frames per second.
    pub fps: u32,
}

impl ClipTiming {
    /// Create a timing, rejecting zero duration or fps.
    pub fn new(duration_secs: u32, fps: u32) -> DreamResult<Self> {
        if duration_secs == 0 {
            return Err(DreamError::validation("clip duration must be > 0"));
        }
        if fps == 0 {
            return Err(DreamError::validation("clip fps must be > 0"));
        }
        Ok(Self { duration_secs, fps })
    }

    /// Total number of frames in the clip.
    pub fn frame_count(self) -> u64 {
        u64::from(self.duration_secs) * u64::from(self.fps)
    }

    /// Fraction of the clip elapsed at the start of `frame`, in `[0, 1)`.
    pub fn progress(self, frame: FrameIndex) -> f64 {
        let total = self.frame_count();
        if total == 0 {
            return 0.0;
        }
        frame.0 as f64 / total as f64
    }
}

impl Default for ClipTiming {
    fn default() -> Self {
        Self {
            duration_secs: 3,
            fps: 24,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
