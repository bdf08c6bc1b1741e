//! Pipeline errors

use crate::float_types::Real;
use nalgebra::Point2;

/// Everything that can go wrong while turning one glyph outline into mesh geometry.
///
/// None of these are fatal to the process; whether a glyph error aborts the
/// batch is decided by [`GlyphErrorPolicy`](crate::config::GlyphErrorPolicy).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlyphError {
    /// (UnsupportedGeometry) The outline contains a segment type the flattener cannot handle
    #[error("(UnsupportedGeometry) Can't flatten outlines containing {command} segments")]
    UnsupportedGeometry { command: &'static str },

    /// (MalformedOutline) The command sequence breaks the move/line/close protocol
    #[error("(MalformedOutline) {0}")]
    MalformedOutline(String),

    /// (CurveNotFlattened) A curve reached the contour builder
    #[error("(CurveNotFlattened) Contour builder does not expect curve segments at {0}; flatten the outline first")]
    CurveNotFlattened(Point2<Real>),

    /// (TessellationFailed) The tessellator produced no triangles
    #[error("(TessellationFailed) Tessellator returned no result for glyph {glyph}")]
    TessellationFailed { glyph: usize },

    /// (InvalidParameter) A configuration value is out of range
    #[error("(InvalidParameter) {0}")]
    InvalidParameter(String),

    /// (InvalidMesh) Assembled buffers break the triangle-list contract
    #[error("(InvalidMesh) {0}")]
    InvalidMesh(String),

    /// (IndexOverflow) The mesh needs more vertices than a 32 bit index can address
    #[error("(IndexOverflow) Mesh needs {0} vertices, more than a u32 index can address")]
    IndexOverflow(usize),
}
