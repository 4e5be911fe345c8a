//! Deterministic placeholder still image.
//!
//! Used when every remote backend fails. The output depends only on the prompt, the requested
//! size and the installed fonts: no clock, no randomness.

use crate::foundation::core::Canvas;
use crate::foundation::error::DreamResult;
use crate::render::surface::Surface;
use crate::render::text::{FontBook, TextLayer, TextSpan};

/// Gradient color of the first row.
pub const GRADIENT_TOP: [u8; 3] = [70, 130, 180];
/// Gradient color approached by the last row.
pub const GRADIENT_BOTTOM: [u8; 3] = [180, 100, 200];
/// Labels longer than this many characters are truncated.
pub const MAX_LABEL_CHARS: usize = 60;
/// Prompt characters kept when the label is truncated.
pub const TRUNCATED_PROMPT_CHARS: usize = 55;
/// Number of decorative dots.
pub const STAR_COUNT: u32 = 10;

const LABEL_FONT_SIZE: f32 = 28.0;
const MIN_LABEL_FONT_SIZE: f32 = 10.0;
const SHADOW_OFFSET: f32 = 2.0;
const OUTER_FRAME_INSET: f32 = 40.0;
const INNER_FRAME_INSET: f32 = 50.0;
const STAR_MARGIN: u32 = 60;
const STAR_RADIUS: f32 = 2.0;
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Placeholder image renderer.
#[derive(Clone, Debug)]
pub struct PlaceholderImageRenderer {
    fonts: FontBook,
}

impl PlaceholderImageRenderer {
    /// Renderer drawing text with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Render the placeholder for `prompt` at `canvas` size.
    ///
    /// Fails only if the pixel buffer cannot be allocated.
    #[tracing::instrument(skip(self, prompt), fields(w = canvas.width, h = canvas.height))]
    pub fn render(&self, prompt: &str, canvas: Canvas) -> DreamResult<image::RgbImage> {
        let mut surface = Surface::new(canvas)?;
        surface.fill_rows(|y| gradient_row(y, canvas.height));

        let label = label_for(prompt);
        match self.centered_label(&label, canvas) {
            Some((layer, dx, dy)) => surface.draw_text(&layer, dx, dy),
            None => tracing::warn!("label could not be shaped; placeholder rendered without text"),
        }

        let (w, h) = (canvas.width as f32, canvas.height as f32);
        surface.stroke_rect_inside(
            [
                OUTER_FRAME_INSET,
                OUTER_FRAME_INSET,
                w - OUTER_FRAME_INSET,
                h - OUTER_FRAME_INSET,
            ],
            3.0,
            WHITE,
        );
        surface.stroke_rect_inside(
            [
                INNER_FRAME_INSET,
                INNER_FRAME_INSET,
                w - INNER_FRAME_INSET,
                h - INNER_FRAME_INSET,
            ],
            1.0,
            WHITE,
        );

        for (x, y) in star_positions(canvas) {
            surface.fill_circle(x as f32, y as f32, STAR_RADIUS, WHITE);
        }

        surface.into_rgb_image()
    }

    /// Shadow + foreground label layer and the translation that centers it on the canvas.
    fn centered_label(&self, label: &str, canvas: Canvas) -> Option<(TextLayer, f32, f32)> {
        let max_width = (canvas.width as f32 - 2.0 * INNER_FRAME_INSET).max(1.0);

        let mut size = LABEL_FONT_SIZE;
        let mut fg = TextSpan::at_top(label, 0.0, 0.0, size, [255, 255, 255]);
        let mut bounds = self.fonts.layout(canvas, &[fg])?.bounds();
        if bounds.width > max_width {
            size = (size * max_width / bounds.width).max(MIN_LABEL_FONT_SIZE);
            fg = TextSpan::at_top(label, 0.0, 0.0, size, [255, 255, 255]);
            bounds = self.fonts.layout(canvas, &[fg])?.bounds();
        }

        let left = ((canvas.width as f32 - bounds.width) / 2.0).floor();
        let top = ((canvas.height as f32 - bounds.height) / 2.0).floor();
        let shadow = fg.shadow(SHADOW_OFFSET, SHADOW_OFFSET, [0, 0, 0]);
        let layer = self.fonts.layout(canvas, &[shadow, fg])?;
        Some((layer, left - bounds.x, top - bounds.y))
    }
}

/// Row color of the vertical background gradient.
///
/// Each channel is `start + (end - start) * y / height`, truncated toward zero.
pub fn gradient_row(y: u32, height: u32) -> [u8; 3] {
    let t = if height == 0 {
        0.0
    } else {
        f64::from(y) / f64::from(height)
    };
    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let start = f64::from(GRADIENT_TOP[c]);
        let end = f64::from(GRADIENT_BOTTOM[c]);
        *slot = (start + (end - start) * t).trunc().clamp(0.0, 255.0) as u8;
    }
    out
}

/// `"Dream: <prompt>"`, with the prompt cut to 55 characters plus `"..."` when the full label
/// would exceed 60 characters.
pub fn label_for(prompt: &str) -> String {
    let label = format!("Dream: {prompt}");
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label;
    }
    let head: String = prompt.chars().take(TRUNCATED_PROMPT_CHARS).collect();
    format!("Dream: {head}...")
}

/// Fixed scatter of decorative dots, kept inside a 60 px margin.
///
/// Returns nothing for canvases too small to hold the margin.
pub fn star_positions(canvas: Canvas) -> Vec<(u32, u32)> {
    let span_x = canvas.width.saturating_sub(2 * STAR_MARGIN);
    let span_y = canvas.height.saturating_sub(2 * STAR_MARGIN);
    if span_x == 0 || span_y == 0 {
        return Vec::new();
    }
    (0..STAR_COUNT)
        .map(|i| {
            (
                STAR_MARGIN + (i * 40) % span_x,
                STAR_MARGIN + (i * 37) % span_y,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder_image.rs"]
mod tests;
