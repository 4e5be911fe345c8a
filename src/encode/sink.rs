use std::path::Path;

use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::DreamResult;
use crate::render::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: u32,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order between
/// one `begin` and one `end`. When rendering fails after `begin`, `abort` is called instead of
/// `end` and must release any encoder resources.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DreamResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DreamResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> DreamResult<()>;
    /// Abandon the stream.
    fn abort(&mut self) {}
}

/// Opens a [`FrameSink`] that writes a container file at a given path.
pub trait SinkFactory: Send + Sync {
    /// Sink writing to `out_path`.
    fn open(&self, out_path: &Path) -> DreamResult<Box<dyn FrameSink>>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Whether `abort` was called.
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DreamResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DreamResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DreamResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}
