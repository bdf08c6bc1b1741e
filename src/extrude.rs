//! **Extrusion of tessellated glyphs into solid letterforms**
//!
//! Every glyph contributes two geometry blocks:
//!
//! - **Caps**: the tessellated face twice, front copy at `z = 0` then back copy at
//!   `z = −depth`, at the same 2D positions.
//! - **Walls**: per contour, its front ring (`z = 0`) then its back ring (`z = −depth`),
//!   stitched edge by edge with two triangles per edge.
//!
//! ## **Winding**
//! Tessellations arrive clockwise (y up). Front-cap triangles are emitted reversed
//! `(2, 1, 0)` so they face `+z`, back-cap triangles as `(0, 1, 2)` so they face `−z`.
//! For contour edge `i → i+1` of a ring of `n` points:
//! ```text
//! i0 = i          i1 = (i + 1) mod n
//! i2 = i + n      i3 = (i + 1) mod n + n
//! triangles (i0, i1, i2) and (i1, i3, i2)
//! ```
//! which faces outward for clockwise outer contours and counter-clockwise holes, the
//! winding [`FlatGlyph::tessellate`](crate::glyph::FlatGlyph::tessellate) leaves them in.
//!
//! ## **Texture coordinates**
//! `u` remaps `x` from `[min_x, max_x]` of the text bounds to `[0, 1]` and `v` remaps
//! `y` from `[min_y, max_y]` to `[1, 0]`.
//!
//! Indices in an [`ExtrudedGlyph`] are local to its cap block and wall block; the
//! assembler adds the running base-vertex offsets.

use crate::float_types::{EPSILON, Real};
use crate::glyph::TessellatedGlyph;
use crate::mesh::MeshVertex;
use geo::Rect;

/// Vertex and index counts needed for a set of glyphs.
///
/// `index_count` reserves `6 × (n + 1)` wall indices per contour of `n` points,
/// one wall quad more than is ever written; the emitted mesh holds `6 × n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferSizing {
    pub vertex_count: usize,
    pub index_count: usize,
}

impl BufferSizing {
    pub fn for_glyph(glyph: &TessellatedGlyph) -> Self {
        let mut vertex_count = 2 * glyph.tessellation.vertices.len();
        let mut index_count = 2 * glyph.tessellation.indices.len();
        for contour in &glyph.contours {
            vertex_count += 2 * contour.len();
            index_count += 6 * (contour.len() + 1);
        }
        BufferSizing {
            vertex_count,
            index_count,
        }
    }

    pub fn for_glyphs(glyphs: &[TessellatedGlyph]) -> Self {
        glyphs
            .iter()
            .map(Self::for_glyph)
            .fold(BufferSizing::default(), |acc, s| BufferSizing {
                vertex_count: acc.vertex_count + s.vertex_count,
                index_count: acc.index_count + s.index_count,
            })
    }
}

/// The extruded geometry of one glyph, with block-local indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudedGlyph {
    pub index: usize,
    /// Front cap copy followed by back cap copy.
    pub cap_vertices: Vec<MeshVertex>,
    /// Indices into `cap_vertices`.
    pub cap_indices: Vec<u32>,
    /// Front ring then back ring, contour after contour.
    pub wall_vertices: Vec<MeshVertex>,
    /// Indices into `wall_vertices`.
    pub wall_indices: Vec<u32>,
}

impl ExtrudedGlyph {
    pub fn vertex_count(&self) -> usize {
        self.cap_vertices.len() + self.wall_vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.cap_indices.len() + self.wall_indices.len()
    }
}

/// Remap `t` from `[a, b]` to `[c, d]`; a degenerate source range maps to `c`.
#[inline]
fn remap(a: Real, b: Real, c: Real, d: Real, t: Real) -> Real {
    let span = b - a;
    if span.abs() <= EPSILON {
        return c;
    }
    c + (t - a) / span * (d - c)
}

/// Texture coordinate of `(x, y)` within the text bounds.
pub fn uv_for(x: Real, y: Real, bounds: &Rect<Real>) -> [Real; 2] {
    let (min, max) = (bounds.min(), bounds.max());
    [
        remap(min.x, max.x, 0.0, 1.0, x),
        remap(min.y, max.y, 1.0, 0.0, y),
    ]
}

fn vertex_at(x: Real, y: Real, z: Real, bounds: &Rect<Real>) -> MeshVertex {
    MeshVertex::new([x, y, z], uv_for(x, y, bounds))
}

/// Extrude one tessellated glyph to `depth` behind the `z = 0` plane.
pub fn extrude_glyph(glyph: &TessellatedGlyph, bounds: &Rect<Real>, depth: Real) -> ExtrudedGlyph {
    let tess = &glyph.tessellation;
    let face_len = tess.vertices.len() as u32;

    let mut cap_vertices = Vec::with_capacity(2 * tess.vertices.len());
    for z in [0.0, -depth] {
        cap_vertices.extend(tess.vertices.iter().map(|p| vertex_at(p.x, p.y, z, bounds)));
    }

    let mut cap_indices = Vec::with_capacity(2 * tess.indices.len());
    for tri in tess.indices.chunks_exact(3) {
        cap_indices.extend_from_slice(&[tri[2], tri[1], tri[0]]);
    }
    for tri in tess.indices.chunks_exact(3) {
        cap_indices.extend_from_slice(&[tri[0] + face_len, tri[1] + face_len, tri[2] + face_len]);
    }

    let ring_points = glyph.ring_point_count();
    let mut wall_vertices = Vec::with_capacity(2 * ring_points);
    let mut wall_indices = Vec::with_capacity(6 * ring_points);
    let mut base = 0u32;
    for contour in &glyph.contours {
        let points = contour.points();
        for z in [0.0, -depth] {
            wall_vertices.extend(points.iter().map(|p| vertex_at(p.x, p.y, z, bounds)));
        }

        let n = points.len() as u32;
        for i in 0..n {
            let i0 = i;
            let i1 = (i + 1) % n;
            let i2 = i + n;
            let i3 = (i + 1) % n + n;
            wall_indices.extend_from_slice(&[
                base + i0,
                base + i1,
                base + i2,
                base + i1,
                base + i3,
                base + i2,
            ]);
        }
        base += 2 * n;
    }

    ExtrudedGlyph {
        index: glyph.index,
        cap_vertices,
        cap_indices,
        wall_vertices,
        wall_indices,
    }
}

impl TessellatedGlyph {
    /// Extrude this glyph, see [`extrude_glyph`].
    pub fn extrude(&self, bounds: &Rect<Real>, depth: Real) -> ExtrudedGlyph {
        extrude_glyph(self, bounds, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    #[test]
    fn remap_maps_range_endpoints() {
        assert_eq!(remap(2.0, 4.0, 0.0, 1.0, 2.0), 0.0);
        assert_eq!(remap(2.0, 4.0, 0.0, 1.0, 4.0), 1.0);
        assert_eq!(remap(2.0, 4.0, 1.0, 0.0, 3.0), 0.5);
    }

    #[test]
    fn remap_degenerate_range_returns_lower_target() {
        assert_eq!(remap(3.0, 3.0, 0.25, 1.0, 3.0), 0.25);
    }

    #[test]
    fn uv_flips_v() {
        let bounds = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 2.0 });
        assert_eq!(uv_for(0.0, 0.0, &bounds), [0.0, 1.0]);
        assert_eq!(uv_for(10.0, 2.0, &bounds), [1.0, 0.0]);
        assert_eq!(uv_for(5.0, 1.0, &bounds), [0.5, 0.5]);
    }

    #[test]
    fn zero_height_bounds_pin_v() {
        let bounds = Rect::new(Coord { x: 0.0, y: 1.0 }, Coord { x: 4.0, y: 1.0 });
        assert_eq!(uv_for(2.0, 1.0, &bounds), [0.5, 1.0]);
    }
}
