// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// A small epsilon for degenerate-geometry checks (zero-area triangles,
/// coincident points, zero-width bounds).
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-5;
/// A small epsilon for degenerate-geometry checks (zero-area triangles,
/// coincident points, zero-width bounds).
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-9;

/// Maximum number of interval halvings per adaptive flattening step.
pub const MAX_SUBDIVISIONS: u32 = 20;

/// Number of segments per quadratic curve in fixed subdivision mode.
pub const DEFAULT_QUAD_CURVE_SUBDIVISIONS: usize = 5;

/// Lazily-initialized default flatness used when flattening glyph outlines.
/// Defaults to `0.1` (in outline units), but can be overridden:
///  1) **Build-time**: set env var `TEXTRUDE_FLATNESS` (e.g. `TEXTRUDE_FLATNESS=0.05 cargo build`)
///  2) **Runtime**: call [`set_flatness`] once before using the library
static FLATNESS_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_flatness() -> Real {
    0.1
}

/// Returns the current default flatness.
/// If not set yet, it tries `TEXTRUDE_FLATNESS` (parsed as the active `Real`) and
/// falls back to `0.1`.
pub fn flatness() -> Real {
    *FLATNESS_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("TEXTRUDE_FLATNESS") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(EPSILON);
            }
        }
        default_flatness()
    })
}

/// Set the default flatness programmatically once (subsequent calls are ignored).
/// Call near program start: `textrude::float_types::set_flatness(0.05);`
pub fn set_flatness(value: Real) {
    let _ = FLATNESS_CELL.set(value.max(EPSILON));
}

/// cos(45°), the crease angle used by the face-normal pass unless configured otherwise.
#[cfg(feature = "f32")]
pub const FRAC_1_SQRT_2: Real = core::f32::consts::FRAC_1_SQRT_2;
/// cos(45°), the crease angle used by the face-normal pass unless configured otherwise.
#[cfg(feature = "f64")]
pub const FRAC_1_SQRT_2: Real = core::f64::consts::FRAC_1_SQRT_2;
