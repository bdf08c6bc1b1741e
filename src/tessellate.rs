//! Planar triangulation of glyph contours.
//!
//! The triangulation algorithm sits behind the [`Tessellator`] trait: contours go
//! in, a 2D vertex list plus a flat triangle index list comes out. [`tessellate_contours`]
//! wraps any implementation, rejects empty or out-of-range results and brings every
//! triangle to one winding (clockwise with y up, the orientation TrueType uses for
//! outer contours), which is what the extruder's cap winding relies on.
//!
//! [`GeoTessellator`] is the production implementation, backed by geo's constrained
//! Delaunay triangulation (`delaunay` feature) or ear clipping (`earcut` feature).

use crate::contour::{Contour, nesting};
use crate::float_types::{EPSILON, Real};
use geo::{Coord, Polygon as GeoPolygon};
use nalgebra::Point2;
use std::collections::HashMap;

/// Which regions enclosed by the contours count as filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingRule {
    /// Inside where the point is enclosed by an odd number of contours.
    #[default]
    Odd,
    /// Inside where the winding number is not zero.
    NonZero,
}

/// A planar triangle mesh: `indices` holds three entries per triangle into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    pub vertices: Vec<Point2<Real>>,
    pub indices: Vec<u32>,
}

impl Tessellation {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Twice the signed area of triangle `t`; positive when counter-clockwise.
    fn doubled_area(&self, t: &[u32]) -> Real {
        let [a, b, c] = [t[0], t[1], t[2]].map(|i| self.vertices[i as usize]);
        (b - a).perp(&(c - a))
    }

    fn push_vertex(&mut self, lookup: &mut HashMap<(u64, u64), u32>, c: Coord<Real>) -> u32 {
        let key = (u64::from(c.x.to_bits()), u64::from(c.y.to_bits()));
        *lookup.entry(key).or_insert_with(|| {
            self.vertices.push(Point2::new(c.x, c.y));
            (self.vertices.len() - 1) as u32
        })
    }
}

/// Black-box polygon tessellator.
pub trait Tessellator: Send + Sync {
    /// Triangulate the region bounded by `contours` under `rule`.
    ///
    /// Returns `None` when no triangulation could be produced.
    fn tessellate(&self, contours: &[Contour], rule: WindingRule) -> Option<Tessellation>;
}

impl<T: Tessellator + ?Sized> Tessellator for &T {
    fn tessellate(&self, contours: &[Contour], rule: WindingRule) -> Option<Tessellation> {
        (**self).tessellate(contours, rule)
    }
}

/// Run `tessellator` with the odd winding rule and sanitise its output.
///
/// Returns `None` on tessellator failure, on an empty result and on any index
/// outside the vertex list. Degenerate triangles are dropped and the rest wound
/// clockwise.
pub fn tessellate_contours<T: Tessellator + ?Sized>(
    tessellator: &T,
    contours: &[Contour],
) -> Option<Tessellation> {
    if contours.is_empty() {
        return None;
    }
    let raw = tessellator.tessellate(contours, WindingRule::Odd)?;
    if raw.indices.len() % 3 != 0
        || raw
            .indices
            .iter()
            .any(|&i| i as usize >= raw.vertices.len())
    {
        log::warn!(
            "tessellator returned {} indices for {} vertices; discarding",
            raw.indices.len(),
            raw.vertices.len()
        );
        return None;
    }

    let mut indices = Vec::with_capacity(raw.indices.len());
    for tri in raw.indices.chunks_exact(3) {
        let area = raw.doubled_area(tri);
        if area.abs() <= EPSILON * EPSILON {
            continue;
        }
        if area > 0.0 {
            indices.extend_from_slice(&[tri[0], tri[2], tri[1]]);
        } else {
            indices.extend_from_slice(tri);
        }
    }
    if indices.is_empty() {
        return None;
    }

    Some(Tessellation {
        vertices: raw.vertices,
        indices,
    })
}

/// Tessellator backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTessellator;

impl Tessellator for GeoTessellator {
    fn tessellate(&self, contours: &[Contour], rule: WindingRule) -> Option<Tessellation> {
        let polygons = group_contours(contours, rule);
        let mut out = Tessellation::default();
        let mut lookup = HashMap::new();

        for polygon in &polygons {
            #[cfg(feature = "delaunay")]
            {
                use geo::TriangulateSpade;
                let triangles = match polygon.constrained_triangulation(Default::default()) {
                    Ok(triangles) => triangles,
                    Err(e) => {
                        log::debug!("constrained triangulation failed: {e:?}");
                        return None;
                    },
                };
                for triangle in triangles {
                    for c in [triangle.0, triangle.1, triangle.2] {
                        let i = out.push_vertex(&mut lookup, c);
                        out.indices.push(i);
                    }
                }
            }

            #[cfg(feature = "earcut")]
            {
                use geo::TriangulateEarcut;
                let raw = polygon.earcut_triangles_raw();
                let remap: Vec<u32> = raw
                    .vertices
                    .chunks_exact(2)
                    .map(|xy| out.push_vertex(&mut lookup, Coord { x: xy[0], y: xy[1] }))
                    .collect();
                out.indices
                    .extend(raw.triangle_indices.iter().map(|&i| remap[i]));
            }
        }

        (!out.is_empty()).then_some(out)
    }
}

/// Split contours into shells with their holes.
///
/// Nesting comes from [`nesting`]. Under the odd rule even depths are shells and
/// odd depths are holes of their innermost enclosing contour. Under the non-zero
/// rule a contour is a hole when its winding direction is opposite to the
/// contour enclosing it.
fn group_contours(contours: &[Contour], rule: WindingRule) -> Vec<GeoPolygon<Real>> {
    let nesting = nesting(contours);
    let counter_clockwise: Vec<bool> = contours.iter().map(|c| c.signed_area() > 0.0).collect();
    let is_hole = |i: usize| match rule {
        WindingRule::Odd => nesting[i].depth % 2 == 1,
        WindingRule::NonZero => nesting[i]
            .parent
            .is_some_and(|p| counter_clockwise[p] != counter_clockwise[i]),
    };

    let mut shells: Vec<(usize, GeoPolygon<Real>)> = contours
        .iter()
        .enumerate()
        .filter(|&(i, c)| c.is_valid() && !is_hole(i))
        .map(|(i, c)| (i, GeoPolygon::new(c.to_line_string(), vec![])))
        .collect();
    for (i, contour) in contours.iter().enumerate() {
        if !contour.is_valid() || !is_hole(i) {
            continue;
        }
        let Some(owner) = nesting[i].parent else { continue };
        if let Some((_, shell)) = shells.iter_mut().find(|(s, _)| *s == owner) {
            shell.interiors_push(contour.to_line_string());
        }
    }

    shells.into_iter().map(|(_, polygon)| polygon).collect()
}

/// Triangulates every contour on its own as a fan around its first point.
///
/// Only correct for convex contours without holes; meant as a predictable
/// stand-in for the real tessellator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTessellator;

impl Tessellator for FanTessellator {
    fn tessellate(&self, contours: &[Contour], _rule: WindingRule) -> Option<Tessellation> {
        let mut out = Tessellation::default();
        for contour in contours.iter().filter(|c| c.is_valid()) {
            let base = out.vertices.len() as u32;
            out.vertices
                .extend(contour.points().iter().map(|p| Point2::new(p.x, p.y)));
            for k in 1..(contour.len() as u32 - 1) {
                out.indices.extend_from_slice(&[base, base + k, base + k + 1]);
            }
        }
        (!out.is_empty()).then_some(out)
    }
}
