//! Glyph outlines as move/line/curve/close command sequences.

use crate::flatten::eval_quad;
use crate::float_types::{EPSILON, Real};
use geo::{Coord, Rect};
use nalgebra::{Point2, Vector2};

/// One drawing command of an [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath at the point.
    MoveTo(Point2<Real>),
    /// Straight segment from the current point.
    LineTo(Point2<Real>),
    /// Quadratic Bézier from the current point via `ctrl` to `to`.
    QuadTo { ctrl: Point2<Real>, to: Point2<Real> },
    /// Cubic Bézier from the current point. Carried so it can be reported, never flattened.
    CubicTo {
        ctrl1: Point2<Real>,
        ctrl2: Point2<Real>,
        to: Point2<Real>,
    },
    /// Close the current subpath back to its first point.
    Close,
}

impl PathCommand {
    /// Name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            PathCommand::MoveTo(_) => "move-to",
            PathCommand::LineTo(_) => "line-to",
            PathCommand::QuadTo { .. } => "quadratic curve",
            PathCommand::CubicTo { .. } => "cubic curve",
            PathCommand::Close => "close",
        }
    }

    /// The point the pen ends up at after this command, if it moves the pen.
    pub const fn end_point(&self) -> Option<Point2<Real>> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadTo { to, .. } | PathCommand::CubicTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }

    fn map_points(self, f: impl Fn(Point2<Real>) -> Point2<Real>) -> Self {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                ctrl: f(ctrl),
                to: f(to),
            },
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// The vector outline of one positioned glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub commands: Vec<PathCommand>,
}

impl Outline {
    pub const fn new() -> Self {
        Outline {
            commands: Vec::new(),
        }
    }

    pub const fn from_commands(commands: Vec<PathCommand>) -> Self {
        Outline { commands }
    }

    pub fn move_to(&mut self, x: Real, y: Real) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point2::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: Real, y: Real) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point2::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: Real, cy: Real, x: Real, y: Real) -> &mut Self {
        self.commands.push(PathCommand::QuadTo {
            ctrl: Point2::new(cx, cy),
            to: Point2::new(x, y),
        });
        self
    }

    pub fn cubic_to(
        &mut self,
        c1x: Real,
        c1y: Real,
        c2x: Real,
        c2y: Real,
        x: Real,
        y: Real,
    ) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            ctrl1: Point2::new(c1x, c1y),
            ctrl2: Point2::new(c2x, c2y),
            to: Point2::new(x, y),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if no curve commands of any degree remain.
    pub fn is_flat(&self) -> bool {
        !self
            .commands
            .iter()
            .any(|c| matches!(c, PathCommand::QuadTo { .. } | PathCommand::CubicTo { .. }))
    }

    /// Number of `Close` commands, i.e. the number of contours a well-formed outline yields.
    pub fn close_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::Close))
            .count()
    }

    /// Returns a new outline with every point moved by `offset`.
    pub fn translate(&self, offset: Vector2<Real>) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Returns a new outline with every point scaled about the origin.
    pub fn scale(&self, sx: Real, sy: Real) -> Self {
        self.map_points(|p| Point2::new(p.x * sx, p.y * sy))
    }

    fn map_points(&self, f: impl Fn(Point2<Real>) -> Point2<Real> + Copy) -> Self {
        Outline {
            commands: self.commands.iter().map(|c| c.map_points(f)).collect(),
        }
    }

    /// Axis aligned bounds of the outline's ink.
    ///
    /// Quadratic curves contribute their end points and their axis extrema, not
    /// their control points, so the box is tight for the curve itself. Cubic curves
    /// are never flattened and contribute all their points.
    pub fn bounds(&self) -> Option<Rect<Real>> {
        let mut points: Vec<Point2<Real>> = Vec::with_capacity(self.commands.len());
        let mut current: Option<Point2<Real>> = None;
        let mut subpath_start: Option<Point2<Real>> = None;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    points.push(p);
                    current = Some(p);
                    subpath_start = Some(p);
                },
                PathCommand::LineTo(p) => {
                    points.push(p);
                    current = Some(p);
                },
                PathCommand::QuadTo { ctrl, to } => {
                    if let Some(from) = current {
                        points.extend(quad_extrema(from, ctrl, to).into_iter().flatten());
                    }
                    points.push(to);
                    current = Some(to);
                },
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    points.extend([ctrl1, ctrl2, to]);
                    current = Some(to);
                },
                PathCommand::Close => current = subpath_start,
            }
        }

        let (&first, rest) = points.split_first()?;
        let (mut min, mut max) = (first, first);
        for p in rest {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Rect::new(
            Coord { x: min.x, y: min.y },
            Coord { x: max.x, y: max.y },
        ))
    }
}

/// Interior points where the quadratic `a → c → b` turns in x or in y.
///
/// ```text
/// B'(t) = 0  ⇔  t = (a − c) / (a − 2c + b)
/// ```
fn quad_extrema(a: Point2<Real>, c: Point2<Real>, b: Point2<Real>) -> [Option<Point2<Real>>; 2] {
    [0usize, 1].map(|axis| {
        let denom = a[axis] - 2.0 * c[axis] + b[axis];
        if denom.abs() <= EPSILON {
            return None;
        }
        let t = (a[axis] - c[axis]) / denom;
        (t > 0.0 && t < 1.0).then(|| eval_quad(a, c, b, t))
    })
}

impl FromIterator<PathCommand> for Outline {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        Outline {
            commands: iter.into_iter().collect(),
        }
    }
}

/// An outline guaranteed to contain no curve commands.
///
/// Only [`flatten`](crate::flatten::flatten) produces one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedOutline(pub(crate) Outline);

impl FlattenedOutline {
    pub const fn outline(&self) -> &Outline {
        &self.0
    }

    pub fn into_outline(self) -> Outline {
        self.0
    }

    /// All points visited by the pen, in command order.
    pub fn points(&self) -> impl Iterator<Item = Point2<Real>> + '_ {
        self.0.commands.iter().filter_map(PathCommand::end_point)
    }
}

impl std::ops::Deref for FlattenedOutline {
    type Target = Outline;

    fn deref(&self) -> &Outline {
        &self.0
    }
}
