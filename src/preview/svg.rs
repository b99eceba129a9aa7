//! Sample-text SVG rendering.
//!
//! Glyph outlines are pulled straight from the font with `ttf-parser` and
//! emitted as one SVG path, so previews are true vectors rather than
//! rasterized bitmaps. Coordinates are scaled to the preview font size and
//! flipped from the font's Y-up space into SVG's Y-down space, with the text
//! anchored at the top-left origin.

use crate::preview::PreviewError;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Preview font size in SVG user units.
pub const FONT_SIZE: f32 = 24.0;

/// Collects outline commands for one glyph into SVG path data, applying the
/// pen position, scale, and baseline flip.
struct PathSink {
    data: String,
    scale: f32,
    pen_x: f32,
    baseline: f32,
}

impl PathSink {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.pen_x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "M{x:.2} {y:.2}");
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "L{x:.2} {y:.2}");
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "Q{x1:.2} {y1:.2} {x:.2} {y:.2}");
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "C{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x:.2} {y:.2}");
    }

    fn close(&mut self) {
        self.data.push('Z');
    }
}

/// Render `text` with the font at `font_path` into standalone SVG markup.
pub fn render_sample(font_path: &Path, text: &str) -> Result<String, PreviewError> {
    let data = fs::read(font_path)?;
    render_sample_from_bytes(&data, text)
}

fn render_sample_from_bytes(data: &[u8], text: &str) -> Result<String, PreviewError> {
    let face = Face::parse(data, 0).map_err(|err| PreviewError::Rasterize(err.to_string()))?;
    let units_per_em = face.units_per_em();
    if units_per_em == 0 {
        return Err(PreviewError::Rasterize(
            "font reports zero units per em".to_string(),
        ));
    }
    let scale = FONT_SIZE / f32::from(units_per_em);
    let ascent = f32::from(face.ascender()) * scale;
    let descent = f32::from(face.descender()) * scale;

    let mut sink = PathSink {
        data: String::new(),
        scale,
        pen_x: 0.0,
        baseline: ascent,
    };
    let mut width = 0.0f32;
    for ch in text.chars() {
        // Characters the font cannot map fall back to .notdef so the sample
        // stays legible instead of silently shrinking.
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        sink.pen_x = width;
        face.outline_glyph(glyph, &mut sink);
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
        width += f32::from(advance) * scale;
    }

    let height = ascent - descent;
    Ok(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" "#,
            r#"viewBox="0 0 {w:.2} {h:.2}"><path fill="black" d="{d}"/></svg>"#
        ),
        w = width,
        h = height,
        d = sink.data,
    ))
}
