//! Test support library
//! Provides outline fixtures and helpers shared by the integration tests.
#![allow(dead_code)]

use textrude::{
    contour::Contour,
    float_types::Real,
    outline::Outline,
    tessellate::{FanTessellator, Tessellation, Tessellator, WindingRule},
};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Clockwise (y up) axis-aligned square outline, the way TrueType winds outer contours.
pub fn square_outline(x0: Real, y0: Real, size: Real) -> Outline {
    let mut o = Outline::new();
    o.move_to(x0, y0)
        .line_to(x0, y0 + size)
        .line_to(x0 + size, y0 + size)
        .line_to(x0 + size, y0)
        .close();
    o
}

/// A 10×10 clockwise square with a 4×4 counter-clockwise hole in the middle.
pub fn square_with_hole(x0: Real) -> Outline {
    let mut o = square_outline(x0, 0.0, 10.0);
    o.move_to(x0 + 3.0, 3.0)
        .line_to(x0 + 7.0, 3.0)
        .line_to(x0 + 7.0, 7.0)
        .line_to(x0 + 3.0, 7.0)
        .close();
    o
}

/// A "D"-like glyph: a straight left edge and a quadratic bowl on the right.
pub fn bowl_outline(x0: Real) -> Outline {
    let mut o = Outline::new();
    o.move_to(x0, 0.0)
        .line_to(x0, 10.0)
        .quad_to(x0 + 10.0, 10.0, x0 + 10.0, 5.0)
        .quad_to(x0 + 10.0, 0.0, x0, 0.0)
        .close();
    o
}

/// Number of points in the closed contours of a mesh: a wall contributes two
/// vertices per ring point.
pub fn wall_vertex_count(contours: &[Contour]) -> usize {
    contours.iter().map(|c| 2 * c.len()).sum()
}

/// Fan tessellator that gives up on any glyph whose first contour starts at
/// `x = fail_at_x`, for exercising per-glyph failure handling.
pub struct FailingTessellator {
    pub fail_at_x: Real,
}

impl Tessellator for FailingTessellator {
    fn tessellate(&self, contours: &[Contour], rule: WindingRule) -> Option<Tessellation> {
        let first = contours.first()?.points().first()?;
        if approx_eq(first.x, self.fail_at_x, 1e-9) {
            return None;
        }
        FanTessellator.tessellate(contours, rule)
    }
}
