//! Where glyph outlines come from.

use crate::float_types::Real;
use crate::outline::Outline;
use geo::{Coord, Rect};

/// A laid out line of text: one positioned outline per printing glyph, all in a
/// shared 2D coordinate space, plus the bounds used for texture mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    pub outlines: Vec<Outline>,
    pub bounds: Option<Rect<Real>>,
}

impl GlyphRun {
    /// A run whose bounds enclose every outline.
    pub fn from_outlines(outlines: Vec<Outline>) -> Self {
        let bounds = union_bounds(outlines.iter().filter_map(Outline::bounds));
        GlyphRun { outlines, bounds }
    }

    /// A run with explicitly chosen texture-mapping bounds.
    pub const fn with_bounds(outlines: Vec<Outline>, bounds: Rect<Real>) -> Self {
        GlyphRun {
            outlines,
            bounds: Some(bounds),
        }
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}

pub(crate) fn union_bounds(rects: impl Iterator<Item = Rect<Real>>) -> Option<Rect<Real>> {
    rects.reduce(|a, b| {
        Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            },
        )
    })
}

/// Lays out a string with a single style into a [`GlyphRun`].
pub trait GlyphSource {
    type Error: std::error::Error;

    fn layout(&self, text: &str) -> Result<GlyphRun, Self::Error>;
}
