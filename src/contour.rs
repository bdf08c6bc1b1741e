//! Closed polygon boundaries recovered from flattened outlines.

use crate::config::UnclosedSubpathPolicy;
use crate::errors::GlyphError;
use crate::float_types::{EPSILON, Real};
use crate::outline::{FlattenedOutline, Outline, PathCommand};
use geo::{Contains, Coord, LineString, Polygon as GeoPolygon};
use nalgebra::Point3;

const INITIAL_CAPACITY: usize = 32;

/// One closed boundary of a glyph, stored in authored order at z = 0.
///
/// The last point connects back to the first implicitly; a repeated closing
/// point is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point3<Real>>,
}

impl Contour {
    /// An empty contour; nothing is allocated until the first point arrives.
    pub const fn new() -> Self {
        Contour { points: Vec::new() }
    }

    /// Build a contour from 2D points, e.g. for tests or hand-made shapes.
    pub fn from_xy(points: &[[Real; 2]]) -> Self {
        let mut contour = Contour::new();
        for &[x, y] in points {
            contour.push(x, y);
        }
        contour.remove_closing_duplicate();
        contour
    }

    /// Append a point, skipping it when it repeats the previous one.
    ///
    /// Storage starts at 32 points and grows by ~1.61× when full.
    pub fn push(&mut self, x: Real, y: Real) {
        let p = Point3::new(x, y, 0.0);
        if let Some(last) = self.points.last() {
            if (last - p).norm_squared() <= EPSILON * EPSILON {
                return;
            }
        }
        if self.points.len() == self.points.capacity() {
            let grown = (self.points.capacity() as f64 * 1.61) as usize;
            self.points
                .reserve_exact(grown.max(INITIAL_CAPACITY) - self.points.len());
        }
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A contour needs at least three distinct points to enclose any area.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    /// Shoelace area in the XY plane; positive for counter-clockwise (y up).
    pub fn signed_area(&self) -> Real {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<Real>()
            * 0.5
    }

    /// Reverse the winding direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// The contour as a closed geo ring, z discarded.
    pub fn to_line_string(&self) -> LineString<Real> {
        let mut coords: Vec<Coord<Real>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        LineString::new(coords)
    }

    fn remove_closing_duplicate(&mut self) {
        while self.points.len() > 1 {
            let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
            if (first - last).norm_squared() > EPSILON * EPSILON {
                break;
            }
            self.points.pop();
        }
    }
}

/// Group the segments of a flattened outline into closed contours.
pub fn build_contours(
    outline: &FlattenedOutline,
    policy: UnclosedSubpathPolicy,
) -> Result<Vec<Contour>, GlyphError> {
    build_contours_from(outline.outline(), policy)
}

/// Same as [`build_contours`] for an arbitrary outline; curve commands are a
/// precondition violation and fail with [`GlyphError::CurveNotFlattened`].
pub fn build_contours_from(
    outline: &Outline,
    policy: UnclosedSubpathPolicy,
) -> Result<Vec<Contour>, GlyphError> {
    let mut contours = Vec::new();
    let mut current = Contour::new();

    for command in &outline.commands {
        match *command {
            PathCommand::MoveTo(p) => {
                if !current.is_empty() {
                    match policy {
                        UnclosedSubpathPolicy::Warn => {
                            log::warn!(
                                "open subpaths are not supported; all contours must be closed (move-to {p} while {} points are pending)",
                                current.len()
                            );
                        },
                        UnclosedSubpathPolicy::AutoClose => {
                            log::warn!("auto-closing open subpath of {} points", current.len());
                            finish(&mut contours, std::mem::take(&mut current));
                        },
                        UnclosedSubpathPolicy::Reject => {
                            return Err(GlyphError::MalformedOutline(format!(
                                "move-to {p} while a subpath of {} points is still open",
                                current.len()
                            )));
                        },
                    }
                }
                current.push(p.x, p.y);
            },
            PathCommand::LineTo(p) => current.push(p.x, p.y),
            PathCommand::QuadTo { to, .. } | PathCommand::CubicTo { to, .. } => {
                return Err(GlyphError::CurveNotFlattened(to));
            },
            PathCommand::Close => finish(&mut contours, std::mem::take(&mut current)),
        }
    }

    if !current.is_empty() {
        match policy {
            UnclosedSubpathPolicy::Warn => {
                log::warn!(
                    "dropping trailing open subpath of {} points",
                    current.len()
                );
            },
            UnclosedSubpathPolicy::AutoClose => finish(&mut contours, current),
            UnclosedSubpathPolicy::Reject => {
                return Err(GlyphError::MalformedOutline(format!(
                    "outline ends with an open subpath of {} points",
                    current.len()
                )));
            },
        }
    }

    Ok(contours)
}

fn finish(contours: &mut Vec<Contour>, mut contour: Contour) {
    contour.remove_closing_duplicate();
    if contour.is_valid() {
        contours.push(contour);
    } else {
        log::debug!("discarding degenerate contour with {} points", contour.len());
    }
}

/// Where a contour sits among the other contours of its glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nesting {
    /// Number of other contours enclosing this one.
    pub depth: usize,
    /// The smallest enclosing contour.
    pub parent: Option<usize>,
}

/// Nesting of every contour, tested at its first point. Contours with fewer than
/// three points get depth 0 and never enclose anything.
pub fn nesting(contours: &[Contour]) -> Vec<Nesting> {
    let rings: Vec<Option<GeoPolygon<Real>>> = contours
        .iter()
        .map(|c| {
            c.is_valid()
                .then(|| GeoPolygon::new(c.to_line_string(), vec![]))
        })
        .collect();
    let areas: Vec<Real> = contours.iter().map(|c| c.signed_area().abs()).collect();

    contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let mut nesting = Nesting::default();
            let (Some(_), Some(first)) = (&rings[i], contour.points().first()) else {
                return nesting;
            };
            let start = Coord {
                x: first.x,
                y: first.y,
            };
            let mut best_area = Real::MAX;
            for (j, ring) in rings.iter().enumerate() {
                let Some(ring) = ring else { continue };
                if i == j || !ring.contains(&start) {
                    continue;
                }
                nesting.depth += 1;
                if areas[j] < best_area {
                    best_area = areas[j];
                    nesting.parent = Some(j);
                }
            }
            nesting
        })
        .collect()
}

/// Wind contours at even nesting depth clockwise and at odd depth
/// counter-clockwise (y up), whatever direction they were authored in.
///
/// The extruder stitches walls in contour order, so this is what makes walls
/// face away from the filled region.
pub fn orient_contours(contours: &mut [Contour]) {
    let nesting = nesting(contours);
    for (contour, nesting) in contours.iter_mut().zip(nesting) {
        let clockwise = contour.signed_area() < 0.0;
        if clockwise != (nesting.depth % 2 == 0) {
            contour.reverse();
        }
    }
}

impl FlattenedOutline {
    /// Group this outline into closed contours, see [`build_contours`].
    pub fn contours(&self, policy: UnclosedSubpathPolicy) -> Result<Vec<Contour>, GlyphError> {
        build_contours(self, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_grows_past_initial_capacity() {
        let mut contour = Contour::new();
        for i in 0..100 {
            contour.push(i as Real, (i * i) as Real);
        }
        assert_eq!(contour.len(), 100);
        assert!(contour.points.capacity() >= 100);
    }

    #[test]
    fn empty_contour_does_not_allocate() {
        let mut contour = Contour::default();
        assert_eq!(contour.points.capacity(), 0);
        contour.push(1.0, 2.0);
        assert!(contour.points.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn push_skips_repeated_point() {
        let mut contour = Contour::new();
        contour.push(1.0, 1.0);
        contour.push(1.0, 1.0);
        contour.push(2.0, 1.0);
        assert_eq!(contour.len(), 2);
    }

    #[test]
    fn closing_duplicate_is_removed() {
        let contour = Contour::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        assert_eq!(contour.len(), 3);
        let ring = contour.to_line_string();
        assert_eq!(ring.0.len(), 4);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn signed_area_sign_follows_orientation() {
        let ccw = Contour::from_xy(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        let cw = Contour::from_xy(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]]);
        assert_eq!(ccw.signed_area(), 4.0);
        assert_eq!(cw.signed_area(), -4.0);
    }

    #[test]
    fn orientation_follows_nesting_depth() {
        let mut contours = vec![
            // counter-clockwise outer, clockwise hole, counter-clockwise island
            Contour::from_xy(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
            Contour::from_xy(&[[2.0, 2.0], [2.0, 8.0], [8.0, 8.0], [8.0, 2.0]]),
            Contour::from_xy(&[[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0]]),
        ];
        let depths: Vec<usize> = nesting(&contours).iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(nesting(&contours)[2].parent, Some(1));

        orient_contours(&mut contours);
        assert!(contours[0].signed_area() < 0.0);
        assert!(contours[1].signed_area() > 0.0);
        assert!(contours[2].signed_area() < 0.0);
    }
}
