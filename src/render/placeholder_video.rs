//! Deterministic placeholder video.
//!
//! Frames are composed on the CPU in parallel chunks and streamed, in order, into a
//! [`FrameSink`] (MP4 via `ffmpeg` by default). A failed render never leaves a file behind.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::artifact::store::{ArtifactStore, MediaKind, TempFileGuard};
use crate::encode::ffmpeg::FfmpegSinkFactory;
use crate::encode::sink::{FrameSink, SinkConfig, SinkFactory};
use crate::foundation::core::{Canvas, ClipTiming, FrameIndex};
use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::ids::IdSource;
use crate::render::surface::{FrameRGBA, Surface};
use crate::render::text::{FontBook, TextSpan};

/// Caption drawn at the top of every frame.
pub const TITLE: &str = "AI Video Generation";
/// Vertical distance between wrapped prompt lines.
pub const LINE_HEIGHT: u32 = 25;
/// Per-character width estimate used for word wrapping.
pub const CHAR_WIDTH_ESTIMATE: usize = 8;
/// Horizontal space reserved around wrapped text (subtracted from the frame width).
pub const TEXT_MARGIN: u32 = 60;

const LINE_X: f32 = 30.0;
const LINE_FONT_SIZE: f32 = 16.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const COUNTER_FONT_SIZE: f32 = 12.0;
const SHADOW_OFFSET: f32 = 2.0;
const RING_WIDTH: f32 = 2.0;
const COUNTER_GRAY: [u8; 3] = [200, 200, 200];

/// Placeholder video renderer.
#[derive(Clone)]
pub struct PlaceholderVideoRenderer {
    fonts: FontBook,
    canvas: Canvas,
    timing: ClipTiming,
    chunk_size: usize,
    encoder: Arc<dyn SinkFactory>,
}

impl std::fmt::Debug for PlaceholderVideoRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderVideoRenderer")
            .field("fonts", &self.fonts)
            .field("canvas", &self.canvas)
            .field("timing", &self.timing)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl PlaceholderVideoRenderer {
    /// Renderer encoding MP4 through the system `ffmpeg`.
    pub fn new(fonts: FontBook, canvas: Canvas, timing: ClipTiming) -> Self {
        Self {
            fonts,
            canvas,
            timing,
            chunk_size: 24,
            encoder: Arc::new(FfmpegSinkFactory),
        }
    }

    /// Replace the encoder used by [`Self::render_to_file`].
    pub fn with_encoder(mut self, encoder: Arc<dyn SinkFactory>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Number of frames composed in parallel before being streamed.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Render into a fresh [`ArtifactStore::temp_path`] in the video directory and return it.
    pub fn render(
        &self,
        prompt: &str,
        store: &ArtifactStore,
        ids: &dyn IdSource,
    ) -> DreamResult<PathBuf> {
        let temp = store.temp_path(MediaKind::Video, ids)?;
        self.render_to_file(prompt, &temp)?;
        Ok(temp)
    }

    /// Render the clip into `out_path` using the configured encoder.
    ///
    /// On error `out_path` is removed before returning.
    #[tracing::instrument(skip(self, prompt), fields(out = %out_path.display()))]
    pub fn render_to_file(&self, prompt: &str, out_path: &Path) -> DreamResult<u64> {
        let guard = TempFileGuard::new(out_path);
        let mut sink = self.encoder.open(out_path)?;
        let frames = self.render_into(prompt, sink.as_mut())?;
        drop(sink);

        if !out_path.is_file() {
            return Err(DreamError::synthesis(format!(
                "encoder finished without producing '{}'",
                out_path.display()
            )));
        }
        let _ = guard.disarm();
        Ok(frames)
    }

    /// Stream every frame of the clip into `sink`. Returns the number of frames pushed.
    ///
    /// `sink.abort()` is called if anything fails after `begin`.
    pub fn render_into(&self, prompt: &str, sink: &mut dyn FrameSink) -> DreamResult<u64> {
        let lines = wrap_prompt(prompt, self.canvas.width.saturating_sub(TEXT_MARGIN));
        let cfg = SinkConfig {
            canvas: self.canvas,
            fps: self.timing.fps,
        };

        if let Err(e) = sink.begin(cfg) {
            sink.abort();
            return Err(e);
        }
        match self.stream_frames(&lines, sink) {
            Ok(frames) => {
                if let Err(e) = sink.end() {
                    sink.abort();
                    return Err(e);
                }
                tracing::debug!(frames, "placeholder video streamed");
                Ok(frames)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    fn stream_frames(&self, lines: &[String], sink: &mut dyn FrameSink) -> DreamResult<u64> {
        let total = self.timing.frame_count();
        let chunk = self.chunk_size as u64;
        let mut start = 0u64;
        while start < total {
            let end = (start + chunk).min(total);
            let frames = (start..end)
                .into_par_iter()
                .map(|f| self.compose_frame(lines, FrameIndex(f)))
                .collect::<DreamResult<Vec<_>>>()?;
            for (offset, frame) in frames.iter().enumerate() {
                sink.push_frame(FrameIndex(start + offset as u64), frame)?;
            }
            start = end;
        }
        Ok(total)
    }

    /// Compose a single frame from pre-wrapped prompt lines.
    pub fn compose_frame(&self, lines: &[String], idx: FrameIndex) -> DreamResult<FrameRGBA> {
        let canvas = self.canvas;
        let total = self.timing.frame_count();
        let progress = self.timing.progress(idx);

        let mut surface = Surface::new(canvas)?;
        surface.fill_rows(|y| background_row(progress, y, canvas.height));

        let (cx, cy) = ((canvas.width / 2) as f32, (canvas.height / 2) as f32);
        surface.stroke_circle(
            cx,
            cy,
            pulse_radius(progress) as f32,
            RING_WIDTH,
            [255, 255, 255, 255],
        );

        let counter = format!("Frame {}/{}", idx.0 + 1, total);
        let mut spans = Vec::with_capacity(lines.len() * 2 + 2);
        let block_top = (canvas.height / 2) as i64 - (lines.len() as i64 * LINE_HEIGHT as i64) / 2;
        for (i, line) in lines.iter().enumerate() {
            let top = (block_top + i as i64 * LINE_HEIGHT as i64) as f32;
            let fg = TextSpan::at_top(line, LINE_X, top, LINE_FONT_SIZE, [255, 255, 255])
                .with_opacity(line_opacity(progress, i));
            spans.push(fg.shadow(SHADOW_OFFSET, SHADOW_OFFSET, [0, 0, 0]).with_opacity(1.0));
            spans.push(fg);
        }
        spans.push(TextSpan::at_top(
            TITLE,
            cx - 80.0,
            30.0,
            TITLE_FONT_SIZE,
            [255, 255, 255],
        ));
        spans.push(TextSpan::at_top(
            &counter,
            canvas.width as f32 - 150.0,
            canvas.height as f32 - 20.0,
            COUNTER_FONT_SIZE,
            COUNTER_GRAY,
        ));

        if let Some(layer) = self.fonts.layout(canvas, &spans) {
            surface.draw_text(&layer, 0.0, 0.0);
        }

        Ok(surface.into_frame())
    }
}

/// Greedy word wrap: a line grows while its estimated width stays under `max_width_px`.
///
/// A single word wider than the budget gets a line of its own.
pub fn wrap_prompt(prompt: &str, max_width_px: u32) -> Vec<String> {
    let max_width = max_width_px as usize;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in prompt.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len * CHAR_WIDTH_ESTIMATE < max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Animated background row color.
///
/// Intensity `i = clamp(50 + 100 * sin(progress * 2pi + y / height * pi), 0, 255)`; the row is
/// `(i / 3, i / 2, i)`, a blue-dominant band that drifts down the frame as the clip plays.
pub fn background_row(progress: f64, y: u32, height: u32) -> [u8; 3] {
    let phase = if height == 0 {
        0.0
    } else {
        f64::from(y) / f64::from(height) * PI
    };
    let intensity = (50.0 + 100.0 * (progress * 2.0 * PI + phase).sin()).trunc();
    let i = intensity.clamp(0.0, 255.0) as u8;
    [i / 3, i / 2, i]
}

/// Ring radius: `50 + 20 * sin(3 * progress * 2pi)`.
pub fn pulse_radius(progress: f64) -> f64 {
    50.0 + 20.0 * (progress * 2.0 * PI * 3.0).sin()
}

/// Foreground opacity of wrapped line `line`: `0.7 + 0.3 * sin(progress * 2pi + line * 0.5)`.
pub fn line_opacity(progress: f64, line: usize) -> f32 {
    (0.7 + 0.3 * (progress * 2.0 * PI + line as f64 * 0.5).sin()) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder_video.rs"]
mod tests;
