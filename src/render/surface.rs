use resvg::tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::foundation::core::Canvas;
use crate::foundation::error::{DreamError, DreamResult};
use crate::render::text::TextLayer;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// CPU drawing surface used by both placeholder renderers.
///
/// Every surface starts from an opaque background written by [`Surface::fill_rows`], and all
/// later drawing is source-over, so pixels stay fully opaque.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(canvas: Canvas) -> DreamResult<Self> {
        let pixmap = Pixmap::new(canvas.width, canvas.height).ok_or_else(|| {
            DreamError::synthesis(format!(
                "failed to allocate {}x{} surface",
                canvas.width, canvas.height
            ))
        })?;
        Ok(Self { pixmap })
    }

    /// Paint each row with an opaque color chosen by `row_rgb(y)`.
    pub fn fill_rows(&mut self, mut row_rgb: impl FnMut(u32) -> [u8; 3]) {
        let stride = self.pixmap.width() as usize * 4;
        for (y, row) in self.pixmap.data_mut().chunks_exact_mut(stride).enumerate() {
            let [r, g, b] = row_rgb(y as u32);
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&[r, g, b, 255]);
            }
        }
    }

    /// Stroke the rectangle `[left, top, right, bottom]` so the stroke lies inside the bounds.
    pub fn stroke_rect_inside(&mut self, ltrb: [f32; 4], width: f32, rgba: [u8; 4]) {
        let half = width / 2.0;
        let [l, t, r, b] = ltrb;
        let Some(rect) = Rect::from_ltrb(l + half, t + half, r - half, b - half) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_rgba(rgba),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Fill a disc.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, rgba: [u8; 4]) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint_rgba(rgba),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Stroke a circle outline.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, rgba: [u8; 4]) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_rgba(rgba),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Composite a shaped text layer, translated by `(dx, dy)`.
    pub fn draw_text(&mut self, layer: &TextLayer, dx: f32, dy: f32) {
        resvg::render(
            layer.tree(),
            Transform::from_translate(dx, dy),
            &mut self.pixmap.as_mut(),
        );
    }

    /// Read back a single pixel as premultiplied RGBA8.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?;
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }

    /// Drop the alpha channel.
    pub fn into_rgb_image(self) -> DreamResult<image::RgbImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let rgba = self.pixmap.take();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| DreamError::synthesis("surface buffer size mismatch"))
    }

    /// Hand the pixels to an encoder sink.
    pub fn into_frame(self) -> FrameRGBA {
        FrameRGBA {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data: self.pixmap.take(),
            premultiplied: true,
        }
    }
}

fn paint_rgba(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
