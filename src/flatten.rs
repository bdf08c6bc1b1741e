//! **Outline flattening**
//!
//! Replaces every quadratic Bézier segment of an [`Outline`] with an equivalent
//! run of straight segments, leaving move/line/close commands untouched.
//!
//! ## **Quadratic Bézier**
//! For a segment starting at the current point `a` with control `c` and end `b`:
//! ```text
//! B(t) = (1 − t)²·a + 2t(1 − t)·c + t²·b,   t ∈ [0, 1]
//! ```
//! evaluated here by de Casteljau (two rounds of linear interpolation).
//!
//! ## **Adaptive subdivision**
//! Starting at `t = 0` and `p = a`, each step proposes `t' = min(1, t + ½)` and
//! measures the squared distance between the chord midpoint `(p + B(t'))/2` and the
//! curve midpoint `B((t + t')/2)`. While that error exceeds `flatness²` the proposal
//! is pulled halfway back towards `t`, at most `max_subdivisions` times; then the
//! segment `p → B(t')` is emitted and the walk continues from `t'` until it reaches 1.
//! A step never falls below the shortest one the halving cap allows from `t = 0`:
//! ```text
//! t' − t ≥ ½^(max_subdivisions + 1)
//! ```
//! so the walk reaches `t = 1` even when the tolerance can never be met.
//!
//! Cubic segments are rejected with [`GlyphError::UnsupportedGeometry`] rather than
//! dropped, since dropping one leaves a gap in the contour.

use crate::config::FlattenMode;
use crate::errors::GlyphError;
use crate::float_types::{EPSILON, Real};
use crate::outline::{FlattenedOutline, Outline, PathCommand};
use nalgebra::Point2;

/// Flatten one glyph outline.
pub fn flatten(outline: &Outline, mode: FlattenMode) -> Result<FlattenedOutline, GlyphError> {
    mode.validate()?;

    let mut out = Vec::with_capacity(outline.len());
    let mut current: Option<Point2<Real>> = None;
    let mut subpath_start: Option<Point2<Real>> = None;

    for command in &outline.commands {
        match *command {
            PathCommand::MoveTo(p) => {
                current = Some(p);
                subpath_start = Some(p);
                out.push(*command);
            },
            PathCommand::LineTo(p) => {
                if current.is_none() {
                    return Err(no_current_point(command));
                }
                current = Some(p);
                out.push(*command);
            },
            PathCommand::QuadTo { ctrl, to } => {
                let from = current.ok_or_else(|| no_current_point(command))?;
                let emitted = match mode {
                    FlattenMode::Adaptive {
                        flatness,
                        max_subdivisions,
                    } => flatten_quad_adaptive(from, ctrl, to, flatness, max_subdivisions, &mut out),
                    FlattenMode::Fixed { segments } => {
                        flatten_quad_fixed(from, ctrl, to, segments, &mut out)
                    },
                };
                log::trace!("quadratic curve {from} -> {to} flattened into {emitted} segments");
                current = Some(to);
            },
            PathCommand::CubicTo { .. } => {
                return Err(GlyphError::UnsupportedGeometry {
                    command: command.name(),
                });
            },
            PathCommand::Close => {
                current = subpath_start;
                out.push(*command);
            },
        }
    }

    Ok(FlattenedOutline(Outline::from_commands(out)))
}

impl Outline {
    /// Flatten this outline, see [`flatten`].
    pub fn flatten(&self, mode: FlattenMode) -> Result<FlattenedOutline, GlyphError> {
        flatten(self, mode)
    }
}

fn no_current_point(command: &PathCommand) -> GlyphError {
    GlyphError::MalformedOutline(format!(
        "{} segment without a current point; outlines must start with move-to",
        command.name()
    ))
}

/// Evaluate the quadratic Bézier `a → c → b` at `t` by de Casteljau.
#[inline]
pub fn eval_quad(a: Point2<Real>, c: Point2<Real>, b: Point2<Real>, t: Real) -> Point2<Real> {
    let q0 = a + (c - a) * t;
    let q1 = c + (b - c) * t;
    q0 + (q1 - q0) * t
}

/// Emit line segments approximating `a → c → b` within `flatness`. Returns the
/// number of segments pushed.
///
/// No step is shorter than `½^(max_subdivisions + 1)` in `t`, the shortest step the
/// halving cap allows from `t = 0`, so a curve never yields more than
/// `2^(max_subdivisions + 1)` segments. `flatness` is floored at [`EPSILON`].
fn flatten_quad_adaptive(
    a: Point2<Real>,
    c: Point2<Real>,
    b: Point2<Real>,
    flatness: Real,
    max_subdivisions: u32,
    out: &mut Vec<PathCommand>,
) -> usize {
    let tolerance = flatness.max(EPSILON);
    let tolerance_sq = tolerance * tolerance;
    let step_floor = (0.5 as Real).powi(max_subdivisions as i32 + 1);
    let mut t: Real = 0.0;
    let mut p = a;
    let mut emitted = 0;

    while t < 1.0 {
        let mut candidate_t = (t + 0.5).min(1.0);
        let mut halvings = 0;

        loop {
            let candidate_p = eval_quad(a, c, b, candidate_t);
            let mid_curve = eval_quad(a, c, b, 0.5 * (t + candidate_t));
            let mid_chord = p + (candidate_p - p) * 0.5;
            let error_sq = (mid_chord - mid_curve).norm_squared();

            if error_sq <= tolerance_sq || halvings >= max_subdivisions {
                break;
            }
            candidate_t = t + 0.5 * (candidate_t - t);
            halvings += 1;
        }

        if candidate_t - t < step_floor {
            candidate_t = (t + step_floor).min(1.0);
        }

        // land exactly on the authored end point
        p = if candidate_t >= 1.0 {
            b
        } else {
            eval_quad(a, c, b, candidate_t)
        };
        t = candidate_t;
        out.push(PathCommand::LineTo(p));
        emitted += 1;
    }

    emitted
}

/// Emit `segments` equal-parameter line segments for `a → c → b`.
fn flatten_quad_fixed(
    a: Point2<Real>,
    c: Point2<Real>,
    b: Point2<Real>,
    segments: usize,
    out: &mut Vec<PathCommand>,
) -> usize {
    out.extend((1..=segments).map(|i| {
        if i == segments {
            PathCommand::LineTo(b)
        } else {
            PathCommand::LineTo(eval_quad(a, c, b, i as Real / segments as Real))
        }
    }));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_quad_hits_endpoints_and_midpoint() {
        let (a, c, b) = (Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), Point2::new(2.0, 0.0));
        assert_eq!(eval_quad(a, c, b, 0.0), a);
        assert_eq!(eval_quad(a, c, b, 1.0), b);
        assert_eq!(eval_quad(a, c, b, 0.5), Point2::new(0.5, 0.5));
    }

    #[test]
    fn straight_quad_needs_no_subdivision() {
        let mut out = Vec::new();
        let n = flatten_quad_adaptive(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            0.1,
            MAX_HALVINGS,
            &mut out,
        );
        // two half steps of t, each already flat
        assert_eq!(n, 2);
        assert_eq!(out.last(), Some(&PathCommand::LineTo(Point2::new(2.0, 0.0))));
    }

    #[test]
    fn halving_cap_bounds_the_step() {
        let mut out = Vec::new();
        let n = flatten_quad_adaptive(
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 100.0),
            Point2::new(100.0, 0.0),
            1e-12,
            0,
            &mut out,
        );
        assert_eq!(n, 2);
    }

    #[test]
    fn vanishing_flatness_still_terminates() {
        let mut out = Vec::new();
        let n = flatten_quad_adaptive(
            Point2::new(0.0, 0.0),
            Point2::new(500.0, 1000.0),
            Point2::new(1000.0, 0.0),
            Real::MIN_POSITIVE,
            8,
            &mut out,
        );
        assert!(n <= 1 << 9, "{n} segments");
        assert_eq!(out.last(), Some(&PathCommand::LineTo(Point2::new(1000.0, 0.0))));
    }

    const MAX_HALVINGS: u32 = crate::float_types::MAX_SUBDIVISIONS;
}
