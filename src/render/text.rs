//! Text shaping for the placeholder renderers.
//!
//! Text is expressed as a tiny SVG document and shaped by `usvg` against a shared font database,
//! then composited with `resvg`. A public-domain face (Tuffy) is compiled into the crate so hosts
//! without installed fonts still get the prompt text drawn.

use std::sync::Arc;

use crate::foundation::core::Canvas;

/// Approximate ascent as a fraction of font size, used to turn a top edge into a baseline.
pub const ASCENT_RATIO: f32 = 0.8;

/// Tuffy Regular, released into the public domain by its authors.
const BUNDLED_FACE: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");

/// Shared, immutable font database. Never empty.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    /// Fonts installed on the system, or the bundled face when there are none.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            tracing::info!("no system fonts found; using bundled face");
            db.load_font_data(BUNDLED_FACE.to_vec());
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self { db: Arc::new(db) }
    }

    /// Only the bundled face. Output does not depend on what the host has installed.
    pub fn bundled() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(BUNDLED_FACE.to_vec());
        Self { db: Arc::new(db) }
    }

    /// Number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Shape `spans` into one layer. Returns `None` when there is nothing to shape or the
    /// document is rejected by `usvg`.
    pub fn layout(&self, canvas: Canvas, spans: &[TextSpan<'_>]) -> Option<TextLayer> {
        if spans.is_empty() {
            return None;
        }

        let svg = spans_to_svg(canvas, spans);
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.db),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };

        let tree = match usvg::Tree::from_str(&svg, &opts) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(error = %e, "text layer failed to parse");
                return None;
            }
        };
        if tree.root().children().is_empty() {
            return None;
        }
        Some(TextLayer { tree })
    }
}

/// One run of single-line text.
#[derive(Clone, Copy, Debug)]
pub struct TextSpan<'a> {
    /// Text content (escaped when serialized).
    pub text: &'a str,
    /// Left edge.
    pub x: f32,
    /// Baseline position.
    pub baseline: f32,
    /// Font size in pixels.
    pub size: f32,
    /// Fill color.
    pub rgb: [u8; 3],
    /// Fill opacity in `[0, 1]`.
    pub opacity: f32,
}

impl<'a> TextSpan<'a> {
    /// Opaque span whose glyph tops sit at roughly `top`.
    pub fn at_top(text: &'a str, x: f32, top: f32, size: f32, rgb: [u8; 3]) -> Self {
        Self {
            text,
            x,
            baseline: top + size * ASCENT_RATIO,
            size,
            rgb,
            opacity: 1.0,
        }
    }

    /// Same span with a different opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Same span with a different color, shifted by `(dx, dy)`.
    pub fn shadow(self, dx: f32, dy: f32, rgb: [u8; 3]) -> Self {
        Self {
            x: self.x + dx,
            baseline: self.baseline + dy,
            rgb,
            ..self
        }
    }
}

/// Measured bounding box of a text layer, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Shaped text ready for compositing.
pub struct TextLayer {
    tree: usvg::Tree,
}

impl TextLayer {
    /// Bounding box of everything in the layer.
    pub fn bounds(&self) -> TextBounds {
        let bbox = self.tree.root().bounding_box();
        TextBounds {
            x: bbox.x(),
            y: bbox.y(),
            width: bbox.width(),
            height: bbox.height(),
        }
    }

    pub(crate) fn tree(&self) -> &usvg::Tree {
        &self.tree
    }
}

fn spans_to_svg(canvas: Canvas, spans: &[TextSpan<'_>]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height
    );
    for span in spans {
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{size}" fill="rgb({r},{g},{b})" fill-opacity="{a}" xml:space="preserve">{text}</text>"#,
            x = span.x,
            y = span.baseline,
            size = span.size,
            r = span.rgb[0],
            g = span.rgb[1],
            b = span.rgb[2],
            a = span.opacity,
            text = escape_xml(span.text),
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Escape the five XML special characters and drop control characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

// Generic families resolve through fontdb's defaults (e.g. "Arial" for sans-serif), which many
// Linux boxes lack; fall back to any installed face so text still renders.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
