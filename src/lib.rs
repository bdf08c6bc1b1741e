//! Turns a line of outline-font text into one extruded, triangulated **3D mesh**:
//! every glyph gets a flat front cap, a flat back cap, and side walls stitching the
//! two together, with texture coordinates spread over the whole line.
//!
//! The pipeline runs glyph outlines through
//! [`flatten`] (quadratic curves to polylines) → [`contour`] (closed rings) →
//! [`tessellate`] (planar triangulation) → [`extrude`] (caps and walls) →
//! [`mesh`] (one vertex buffer and one `u32` index buffer), driven by
//! [`pipeline::TextMesher`].
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **delaunay**: use `geo`s `spade` feature for constrained Delaunay tessellation
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//! - **truetype-text**: lay out text from TrueType fonts `.ttf`
//! - **hashmap**: enables use of hashbrown for `TextMesh::open_edge_count`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to process glyphs in parallel
//! - **earcut**: use `geo`s `earcutr` feature for tessellation, this conflicts with delaunay

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod contour;
pub mod errors;
pub mod extrude;
pub mod flatten;
pub mod float_types;
pub mod glyph;
pub mod glyph_source;
pub mod io;
pub mod mesh;
pub mod outline;
pub mod pipeline;
pub mod tessellate;
pub mod triangulated;

#[cfg(feature = "truetype-text")]
pub mod truetype;

#[cfg(any(
    all(feature = "delaunay", feature = "earcut"),
    not(any(feature = "delaunay", feature = "earcut"))
))]
compile_error!("Either 'delaunay' or 'earcut' feature must be specified, but not both");

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::MeshConfig;
pub use errors::GlyphError;
pub use mesh::{MeshVertex, TextMesh};
pub use outline::Outline;
pub use pipeline::{MeshReport, TextMesher};
