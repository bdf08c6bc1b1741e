//! The assembled text mesh handed to renderers and exporters.

use crate::errors::GlyphError;
use crate::extrude::{BufferSizing, ExtrudedGlyph};
use crate::float_types::Real;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

/// One vertex of the GPU-facing vertex buffer.
///
/// `#[repr(C)]`, 32 bytes: position, normal, texture coordinate, all `f32`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// A vertex with a zero normal.
    #[allow(clippy::unnecessary_cast)]
    pub fn new(position: [Real; 3], uv: [Real; 2]) -> Self {
        MeshVertex {
            position: position.map(|c| c as f32),
            normal: [0.0; 3],
            uv: uv.map(|c| c as f32),
        }
    }

    pub fn pos(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn normal(&self) -> Vector3<f32> {
        Vector3::from(self.normal)
    }
}

/// Vertex attribute slots of [`MeshVertex`], in buffer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexAttribute {
    Position,
    Normal,
    TexCoord,
}

/// Format and byte offset of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub attribute: VertexAttribute,
    /// Number of `f32` components.
    pub components: usize,
    pub offset: usize,
}

/// Interleaved layout of the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub attributes: [AttributeLayout; 3],
    pub stride: usize,
}

impl VertexLayout {
    pub const MESH_VERTEX: VertexLayout = VertexLayout {
        attributes: [
            AttributeLayout {
                attribute: VertexAttribute::Position,
                components: 3,
                offset: 0,
            },
            AttributeLayout {
                attribute: VertexAttribute::Normal,
                components: 3,
                offset: 12,
            },
            AttributeLayout {
                attribute: VertexAttribute::TexCoord,
                components: 2,
                offset: 24,
            },
        ],
        stride: std::mem::size_of::<MeshVertex>(),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    #[default]
    Uint32,
}

/// One indexed triangle mesh for the whole text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl TextMesh {
    /// Concatenate extruded glyphs into global buffers.
    ///
    /// Cap blocks of all glyphs come first, then wall blocks of all glyphs, each
    /// shifted by the running base-vertex offset. The offsets are a prefix sum and
    /// only depend on block sizes, so glyphs may be extruded in any order or in parallel.
    pub fn assemble(glyphs: &[ExtrudedGlyph]) -> Result<Self, GlyphError> {
        let sizing = BufferSizing {
            vertex_count: glyphs.iter().map(ExtrudedGlyph::vertex_count).sum(),
            index_count: glyphs.iter().map(ExtrudedGlyph::index_count).sum(),
        };
        Self::assemble_with_sizing(glyphs, sizing)
    }

    /// Like [`assemble`](Self::assemble), with buffers pre-allocated from `sizing`
    /// (usually [`BufferSizing::for_glyphs`] over the tessellated glyphs).
    pub fn assemble_with_sizing(
        glyphs: &[ExtrudedGlyph],
        sizing: BufferSizing,
    ) -> Result<Self, GlyphError> {
        let vertex_count: usize = glyphs.iter().map(ExtrudedGlyph::vertex_count).sum();
        if vertex_count > u32::MAX as usize {
            return Err(GlyphError::IndexOverflow(vertex_count));
        }

        let mut mesh = TextMesh {
            vertices: Vec::with_capacity(sizing.vertex_count.max(vertex_count)),
            indices: Vec::with_capacity(sizing.index_count),
        };
        for glyph in glyphs {
            mesh.append_block(&glyph.cap_vertices, &glyph.cap_indices);
        }
        for glyph in glyphs {
            mesh.append_block(&glyph.wall_vertices, &glyph.wall_indices);
        }

        log::debug!(
            "assembled {} glyphs into {} vertices and {} indices ({} indices reserved)",
            glyphs.len(),
            mesh.vertex_count(),
            mesh.index_count(),
            sizing.index_count
        );
        Ok(mesh)
    }

    fn append_block(&mut self, vertices: &[MeshVertex], indices: &[u32]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|&i| i + base));
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub const fn topology(&self) -> PrimitiveTopology {
        PrimitiveTopology::TriangleList
    }

    pub const fn index_format(&self) -> IndexFormat {
        IndexFormat::Uint32
    }

    pub const fn vertex_layout(&self) -> VertexLayout {
        VertexLayout::MESH_VERTEX
    }

    /// The vertex buffer as raw bytes in [`VertexLayout::MESH_VERTEX`] layout.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes, native-endian `u32`.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Iterate triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalised face normal (cross product of two edges) of triangle `tri`.
    pub fn face_normal(&self, tri: [u32; 3]) -> Vector3<f32> {
        let [a, b, c] = tri.map(|i| self.vertices[i as usize].pos());
        (b - a).cross(&(c - a))
    }

    /// Check index count and range.
    pub fn validate(&self) -> Result<(), GlyphError> {
        if self.indices.len() % 3 != 0 {
            return Err(GlyphError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&bad) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(GlyphError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                self.vertices.len()
            )));
        }
        Ok(())
    }

    /// **Face-normal pass with a crease threshold**
    ///
    /// For each vertex the area-weighted mean of its adjacent face normals is taken
    /// first; faces whose unit normal has a cosine below `crease_threshold` against
    /// that mean are then left out and the mean recomputed, so a vertex sitting on a
    /// sharp fold follows its dominant side instead of averaging across the fold.
    /// Vertices without faces keep a zero normal.
    pub fn compute_normals(&mut self, crease_threshold: Real) {
        #[allow(clippy::unnecessary_cast)]
        let threshold = crease_threshold as f32;
        let faces: Vec<([u32; 3], Vector3<f32>)> = self
            .triangles()
            .map(|tri| (tri, self.face_normal(tri)))
            .collect();

        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); self.vertices.len()];
        for (f, (tri, _)) in faces.iter().enumerate() {
            for &v in tri {
                incident[v as usize].push(f);
            }
        }

        for (v, faces_here) in incident.iter().enumerate() {
            let mean: Vector3<f32> = faces_here.iter().map(|&f| faces[f].1).sum();
            let Some(mean) = mean.try_normalize(f32::EPSILON) else {
                continue;
            };
            let kept: Vector3<f32> = faces_here
                .iter()
                .map(|&f| faces[f].1)
                .filter(|n| {
                    n.try_normalize(f32::EPSILON)
                        .is_some_and(|unit| unit.dot(&mean) >= threshold)
                })
                .sum();
            let normal = kept.try_normalize(f32::EPSILON).unwrap_or(mean);
            self.vertices[v].normal = normal.into();
        }
    }

    /// Number of undirected edges used by exactly one triangle, with vertices
    /// welded by exact position. Zero for a closed, watertight extrusion.
    #[cfg(feature = "hashmap")]
    pub fn open_edge_count(&self) -> usize {
        use hashbrown::HashMap;

        let mut welded: HashMap<[u32; 3], usize> = HashMap::new();
        let ids: Vec<usize> = self
            .vertices
            .iter()
            .map(|v| {
                let key = v.position.map(f32::to_bits);
                let next = welded.len();
                *welded.entry(key).or_insert(next)
            })
            .collect();

        let mut edges: HashMap<(usize, usize), usize> = HashMap::new();
        for tri in self.triangles() {
            let [a, b, c] = tri.map(|i| ids[i as usize]);
            for (p, q) in [(a, b), (b, c), (c, a)] {
                if p != q {
                    *edges.entry((p.min(q), p.max(q))).or_insert(0) += 1;
                }
            }
        }
        edges.values().filter(|&&count| count == 1).count()
    }
}
