//! Text to mesh, end to end.
//!
//! Every stage runs to completion over all glyphs before the next one starts:
//! flatten → contours and tessellation → extrusion → assembly → normals. A glyph
//! that fails a stage is dropped from every later stage; with
//! [`GlyphErrorPolicy::Skip`] it is recorded in the [`MeshReport`], with
//! [`GlyphErrorPolicy::Abort`] its error is returned.

use crate::config::{GlyphErrorPolicy, MeshConfig};
use crate::errors::GlyphError;
use crate::extrude::{BufferSizing, ExtrudedGlyph};
use crate::float_types::Real;
use crate::glyph::{FlatGlyph, TessellatedGlyph};
use crate::glyph_source::{GlyphRun, GlyphSource, union_bounds};
use crate::mesh::TextMesh;
use crate::outline::Outline;
use crate::tessellate::{GeoTessellator, Tessellator};
use geo::Rect;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A glyph left out of the mesh and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGlyph {
    /// Position of the glyph in the input run.
    pub glyph: usize,
    pub error: GlyphError,
}

/// What happened to the glyphs of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// Glyphs with a non-empty outline that entered the pipeline.
    pub glyph_count: usize,
    pub skipped: Vec<SkippedGlyph>,
}

impl MeshReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Glyphs that made it into the mesh.
    pub fn meshed_count(&self) -> usize {
        self.glyph_count - self.skipped.len()
    }
}

/// Errors from [`TextMesher::mesh_text`]: layout failed, or a glyph aborted the batch.
#[derive(Debug, thiserror::Error)]
pub enum MeshTextError<E: std::error::Error + 'static> {
    #[error("layout failed: {0}")]
    Layout(#[source] E),
    #[error(transparent)]
    Glyph(#[from] GlyphError),
}

/// Converts glyph outlines into one extruded [`TextMesh`].
#[derive(Debug, Clone)]
pub struct TextMesher<T: Tessellator = GeoTessellator> {
    tessellator: T,
    config: MeshConfig,
}

impl TextMesher<GeoTessellator> {
    pub fn new(config: MeshConfig) -> Self {
        TextMesher {
            tessellator: GeoTessellator,
            config,
        }
    }
}

impl Default for TextMesher<GeoTessellator> {
    fn default() -> Self {
        Self::new(MeshConfig::default())
    }
}

impl<T: Tessellator> TextMesher<T> {
    pub const fn with_tessellator(tessellator: T, config: MeshConfig) -> Self {
        TextMesher {
            tessellator,
            config,
        }
    }

    pub const fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Lay out `text` with `source` and mesh it.
    pub fn mesh_text<S: GlyphSource>(
        &self,
        source: &S,
        text: &str,
    ) -> Result<(TextMesh, MeshReport), MeshTextError<S::Error>>
    where
        S::Error: 'static,
    {
        let run = source.layout(text).map_err(MeshTextError::Layout)?;
        Ok(self.mesh_run(&run)?)
    }

    /// Mesh an already laid out run.
    ///
    /// A run without bounds has them computed from its outlines.
    pub fn mesh_run(&self, run: &GlyphRun) -> Result<(TextMesh, MeshReport), GlyphError> {
        let bounds = run
            .bounds
            .or_else(|| union_bounds(run.outlines.iter().filter_map(Outline::bounds)))
            .unwrap_or_else(|| Rect::new((0.0, 0.0), (0.0, 0.0)));
        self.mesh_outlines(&run.outlines, &bounds)
    }

    /// Mesh positioned outlines, remapping texture coordinates over `bounds`.
    ///
    /// Empty outlines are ignored without being reported.
    pub fn mesh_outlines(
        &self,
        outlines: &[Outline],
        bounds: &Rect<Real>,
    ) -> Result<(TextMesh, MeshReport), GlyphError> {
        self.config.validate()?;

        let inputs: Vec<(usize, &Outline)> = outlines
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_empty())
            .collect();
        let mut report = MeshReport {
            glyph_count: inputs.len(),
            skipped: Vec::new(),
        };

        let flattened = self.flatten_all(&inputs);
        let flat = self.settle(flattened, &mut report)?;

        let tessellated = self.tessellate_all(flat);
        let tessellated = self.settle(tessellated, &mut report)?;

        let sizing = BufferSizing::for_glyphs(&tessellated);
        log::debug!(
            "{} glyphs tessellated, reserving {} vertices and {} indices",
            tessellated.len(),
            sizing.vertex_count,
            sizing.index_count
        );

        let extruded = self.extrude_all(&tessellated, bounds);
        let mut mesh = TextMesh::assemble_with_sizing(&extruded, sizing)?;
        if let Some(threshold) = self.config.crease_threshold {
            mesh.compute_normals(threshold);
        }

        report.skipped.sort_by_key(|s| s.glyph);
        Ok((mesh, report))
    }

    /// Split stage results into survivors and skipped glyphs, or stop at the
    /// first failure under [`GlyphErrorPolicy::Abort`].
    fn settle<G>(
        &self,
        results: Vec<Result<G, SkippedGlyph>>,
        report: &mut MeshReport,
    ) -> Result<Vec<G>, GlyphError> {
        let mut ok = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(glyph) => ok.push(glyph),
                Err(skipped) => {
                    if self.config.on_glyph_error == GlyphErrorPolicy::Abort {
                        return Err(skipped.error);
                    }
                    log::warn!("skipping glyph {}: {}", skipped.glyph, skipped.error);
                    report.skipped.push(skipped);
                },
            }
        }
        Ok(ok)
    }

    #[cfg(not(feature = "parallel"))]
    fn flatten_all(&self, inputs: &[(usize, &Outline)]) -> Vec<Result<FlatGlyph, SkippedGlyph>> {
        inputs
            .iter()
            .map(|&(index, outline)| self.flatten_one(index, outline))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn flatten_all(&self, inputs: &[(usize, &Outline)]) -> Vec<Result<FlatGlyph, SkippedGlyph>> {
        inputs
            .par_iter()
            .map(|&(index, outline)| self.flatten_one(index, outline))
            .collect()
    }

    fn flatten_one(&self, index: usize, outline: &Outline) -> Result<FlatGlyph, SkippedGlyph> {
        FlatGlyph::new(index, outline, self.config.flatten)
            .map_err(|error| SkippedGlyph { glyph: index, error })
    }

    #[cfg(not(feature = "parallel"))]
    fn tessellate_all(&self, flat: Vec<FlatGlyph>) -> Vec<Result<TessellatedGlyph, SkippedGlyph>> {
        flat.into_iter().map(|g| self.tessellate_one(g)).collect()
    }

    #[cfg(feature = "parallel")]
    fn tessellate_all(&self, flat: Vec<FlatGlyph>) -> Vec<Result<TessellatedGlyph, SkippedGlyph>> {
        flat.into_par_iter().map(|g| self.tessellate_one(g)).collect()
    }

    fn tessellate_one(&self, glyph: FlatGlyph) -> Result<TessellatedGlyph, SkippedGlyph> {
        let index = glyph.index;
        glyph
            .tessellate(&self.tessellator, self.config.unclosed_subpath)
            .map_err(|error| SkippedGlyph { glyph: index, error })
    }

    #[cfg(not(feature = "parallel"))]
    fn extrude_all(&self, glyphs: &[TessellatedGlyph], bounds: &Rect<Real>) -> Vec<ExtrudedGlyph> {
        glyphs
            .iter()
            .map(|g| g.extrude(bounds, self.config.extrusion_depth))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn extrude_all(&self, glyphs: &[TessellatedGlyph], bounds: &Rect<Real>) -> Vec<ExtrudedGlyph> {
        glyphs
            .par_iter()
            .map(|g| g.extrude(bounds, self.config.extrusion_depth))
            .collect()
    }
}
