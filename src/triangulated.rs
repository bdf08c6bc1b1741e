//! A trait for any shape which can be represented by triangles
use crate::mesh::{MeshVertex, TextMesh};

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]` in counter-clockwise order as seen from
    /// outside the surface.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([MeshVertex; 3]);
}

impl Triangulated3D for TextMesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([MeshVertex; 3]),
    {
        for tri in self.triangles() {
            f(tri.map(|i| self.vertices[i as usize]));
        }
    }
}
