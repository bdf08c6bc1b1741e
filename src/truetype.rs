//! Single-line text layout from TrueType fonts, backed by `ttf-parser`.

use crate::float_types::Real;
use crate::glyph_source::{GlyphRun, GlyphSource, union_bounds};
use crate::outline::Outline;
use nalgebra::Vector2;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Errors raised while loading a font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("could not parse font: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
    #[error("font size must be positive and finite, got {0}")]
    InvalidSize(Real),
}

/// Lays out text on one baseline with one font at one size.
///
/// Glyph outlines are scaled from font units to `size` units per em and placed by
/// horizontal advance; the finished line is centred horizontally on `x = 0`.
/// Characters without an outline (spaces and other non-printing glyphs) advance
/// the pen but produce no outline. Kerning is not applied.
pub struct TrueTypeGlyphSource<'a> {
    face: Face<'a>,
    size: Real,
}

impl<'a> TrueTypeGlyphSource<'a> {
    pub fn new(font_data: &'a [u8], size: Real) -> Result<Self, FontError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(FontError::InvalidSize(size));
        }
        let face = Face::parse(font_data, 0)?;
        Ok(TrueTypeGlyphSource { face, size })
    }

    fn scale(&self) -> Real {
        self.size / Real::from(self.face.units_per_em())
    }
}

impl GlyphSource for TrueTypeGlyphSource<'_> {
    type Error = FontError;

    fn layout(&self, text: &str) -> Result<GlyphRun, FontError> {
        let scale = self.scale();
        let mut pen_x: Real = 0.0;
        let mut outlines = Vec::new();

        for ch in text.chars() {
            let glyph = self.face.glyph_index(ch).unwrap_or(GlyphId(0));
            let mut builder = OutlineCollector {
                outline: Outline::new(),
                scale,
                origin_x: pen_x,
            };
            if self.face.outline_glyph(glyph, &mut builder).is_some() && !builder.outline.is_empty() {
                outlines.push(builder.outline);
            }
            let advance = self.face.glyph_hor_advance(glyph).unwrap_or(0);
            pen_x += Real::from(advance) * scale;
        }

        let Some(ink) = union_bounds(outlines.iter().filter_map(Outline::bounds)) else {
            return Ok(GlyphRun::default());
        };

        // centre the line horizontally around x = 0
        let shift = Vector2::new(-(ink.min().x + ink.width() * 0.5), 0.0);
        let outlines: Vec<Outline> = outlines.iter().map(|o| o.translate(shift)).collect();
        log::debug!(
            "laid out {:?}: {} printing glyphs, advance width {pen_x}",
            text,
            outlines.len()
        );
        Ok(GlyphRun::from_outlines(outlines))
    }
}

struct OutlineCollector {
    outline: Outline,
    scale: Real,
    origin_x: Real,
}

impl OutlineCollector {
    fn map(&self, x: f32, y: f32) -> (Real, Real) {
        (
            self.origin_x + Real::from(x) * self.scale,
            Real::from(y) * self.scale,
        )
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.outline.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.outline.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (cx, cy) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.outline.quad_to(cx, cy, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1x, c1y) = self.map(x1, y1);
        let (c2x, c2y) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.outline.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn close(&mut self) {
        self.outline.close();
    }
}
