//! Per-glyph records, one type per pipeline stage.
//!
//! Each stage consumes or borrows the previous record and returns a new one, so a
//! glyph moves strictly forward: [`Outline`] → [`FlatGlyph`] → [`TessellatedGlyph`]
//! → [`ExtrudedGlyph`](crate::extrude::ExtrudedGlyph). `index` is the glyph's position
//! in the input run and survives every stage so failures can be reported against it.

use crate::config::{FlattenMode, UnclosedSubpathPolicy};
use crate::contour::{Contour, build_contours, orient_contours};
use crate::errors::GlyphError;
use crate::flatten::flatten;
use crate::outline::{FlattenedOutline, Outline};
use crate::tessellate::{Tessellation, Tessellator, tessellate_contours};

/// A glyph whose outline contains only straight segments.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatGlyph {
    pub index: usize,
    pub outline: FlattenedOutline,
}

impl FlatGlyph {
    pub fn new(index: usize, outline: &Outline, mode: FlattenMode) -> Result<Self, GlyphError> {
        Ok(FlatGlyph {
            index,
            outline: flatten(outline, mode)?,
        })
    }

    /// Build the glyph's contours, wind them by nesting depth (outer clockwise,
    /// holes counter-clockwise) and triangulate the face.
    pub fn tessellate<T: Tessellator + ?Sized>(
        self,
        tessellator: &T,
        policy: UnclosedSubpathPolicy,
    ) -> Result<TessellatedGlyph, GlyphError> {
        let mut contours = build_contours(&self.outline, policy)?;
        orient_contours(&mut contours);
        let tessellation = tessellate_contours(tessellator, &contours)
            .ok_or(GlyphError::TessellationFailed { glyph: self.index })?;
        log::debug!(
            "glyph {}: {} contours, {} face vertices, {} face triangles",
            self.index,
            contours.len(),
            tessellation.vertices.len(),
            tessellation.triangle_count()
        );
        Ok(TessellatedGlyph {
            index: self.index,
            contours,
            tessellation,
        })
    }
}

/// A glyph with its closed contours and the planar triangulation of its face.
#[derive(Debug, Clone, PartialEq)]
pub struct TessellatedGlyph {
    pub index: usize,
    pub contours: Vec<Contour>,
    pub tessellation: Tessellation,
}

impl TessellatedGlyph {
    /// Total number of points over all contours.
    pub fn ring_point_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }
}
