//! Pipeline configuration.

use crate::errors::GlyphError;
use crate::float_types::{
    DEFAULT_QUAD_CURVE_SUBDIVISIONS, FRAC_1_SQRT_2, MAX_SUBDIVISIONS, Real, flatness,
};

/// How quadratic curve segments are replaced by line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlattenMode {
    /// Subdivide until the chord midpoint is within `flatness` of the curve midpoint,
    /// halving each step at most `max_subdivisions` times (no more than
    /// [`MAX_SUBDIVISIONS`]). Tolerances below [`EPSILON`](crate::float_types::EPSILON)
    /// flatten as if they were `EPSILON`.
    Adaptive { flatness: Real, max_subdivisions: u32 },
    /// Split every curve into `segments` equal-parameter pieces.
    Fixed { segments: usize },
}

impl FlattenMode {
    /// Adaptive flattening with the given tolerance and the default halving cap.
    pub const fn adaptive(flatness: Real) -> Self {
        FlattenMode::Adaptive {
            flatness,
            max_subdivisions: MAX_SUBDIVISIONS,
        }
    }

    /// Fixed subdivision into `segments` pieces per curve.
    pub const fn fixed(segments: usize) -> Self {
        FlattenMode::Fixed { segments }
    }

    /// Fixed mode with [`DEFAULT_QUAD_CURVE_SUBDIVISIONS`] segments per curve.
    pub const fn fixed_default() -> Self {
        FlattenMode::fixed(DEFAULT_QUAD_CURVE_SUBDIVISIONS)
    }

    pub(crate) fn validate(&self) -> Result<(), GlyphError> {
        match *self {
            FlattenMode::Adaptive { flatness, .. } if !(flatness.is_finite() && flatness > 0.0) => {
                Err(GlyphError::InvalidParameter(format!(
                    "flatness must be positive and finite, got {flatness}"
                )))
            },
            FlattenMode::Adaptive {
                max_subdivisions, ..
            } if max_subdivisions > MAX_SUBDIVISIONS => Err(GlyphError::InvalidParameter(format!(
                "at most {MAX_SUBDIVISIONS} halvings per flattening step, got {max_subdivisions}"
            ))),
            FlattenMode::Fixed { segments: 0 } => Err(GlyphError::InvalidParameter(
                "fixed subdivision needs at least one segment per curve".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for FlattenMode {
    fn default() -> Self {
        FlattenMode::adaptive(flatness())
    }
}

/// What the contour builder does when a `MoveTo` arrives while a contour is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclosedSubpathPolicy {
    /// Log a warning and keep appending to the open contour.
    #[default]
    Warn,
    /// Register the open contour as if it had been closed, then start a new one.
    AutoClose,
    /// Fail the glyph with [`GlyphError::MalformedOutline`].
    Reject,
}

/// What the pipeline does with a glyph that fails any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphErrorPolicy {
    /// Drop the glyph, record it in the report and keep going.
    #[default]
    Skip,
    /// Stop at the first failing glyph and return its error.
    Abort,
}

/// All knobs of the text-to-mesh pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshConfig {
    pub flatten: FlattenMode,
    pub unclosed_subpath: UnclosedSubpathPolicy,
    pub on_glyph_error: GlyphErrorPolicy,
    /// Distance between the front cap (z = 0) and the back cap (z = -depth).
    pub extrusion_depth: Real,
    /// Cosine of the crease angle for the face-normal pass; `None` leaves normals zero.
    pub crease_threshold: Option<Real>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig {
            flatten: FlattenMode::default(),
            unclosed_subpath: UnclosedSubpathPolicy::default(),
            on_glyph_error: GlyphErrorPolicy::default(),
            extrusion_depth: 1.0,
            crease_threshold: Some(FRAC_1_SQRT_2),
        }
    }
}

impl MeshConfig {
    pub fn new(extrusion_depth: Real) -> Self {
        MeshConfig {
            extrusion_depth,
            ..Default::default()
        }
    }

    pub const fn with_flatten(mut self, flatten: FlattenMode) -> Self {
        self.flatten = flatten;
        self
    }

    pub const fn with_unclosed_subpath(mut self, policy: UnclosedSubpathPolicy) -> Self {
        self.unclosed_subpath = policy;
        self
    }

    pub const fn with_glyph_error_policy(mut self, policy: GlyphErrorPolicy) -> Self {
        self.on_glyph_error = policy;
        self
    }

    pub const fn with_extrusion_depth(mut self, depth: Real) -> Self {
        self.extrusion_depth = depth;
        self
    }

    pub const fn with_crease_threshold(mut self, threshold: Option<Real>) -> Self {
        self.crease_threshold = threshold;
        self
    }

    /// Check every value before any glyph is touched.
    pub fn validate(&self) -> Result<(), GlyphError> {
        self.flatten.validate()?;
        if !(self.extrusion_depth.is_finite() && self.extrusion_depth > 0.0) {
            return Err(GlyphError::InvalidParameter(format!(
                "extrusion depth must be positive and finite, got {}",
                self.extrusion_depth
            )));
        }
        if let Some(threshold) = self.crease_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(GlyphError::InvalidParameter(format!(
                    "crease threshold is a cosine and must lie in [-1, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }
}
