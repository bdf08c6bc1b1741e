use crate::io::IoError;
use crate::mesh::{MeshVertex, TextMesh};
use crate::triangulated::Triangulated3D;
use core2::io::Cursor;
use nalgebra::Vector3;

/// Facet normal from the triangle's positions; STL readers expect per-face normals.
fn facet_normal(tri: &[MeshVertex; 3]) -> Vector3<f32> {
    let [a, b, c] = tri.map(|v| v.pos());
    (b - a)
        .cross(&(c - a))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Export to ASCII STL
/// Convert this shape to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use textrude::{mesh::TextMesh, io::to_stl_ascii};
/// let mesh = TextMesh::default();
/// let text = to_stl_ascii(&mesh, "empty");
/// assert!(text.starts_with("solid empty"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for v in &tri {
            let [x, y, z] = v.position;
            out.push_str(&format!("      vertex {x:.6} {y:.6} {z:.6}\n"));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The resulting `Vec<u8>` can then be written to a file or handled in memory.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T, _name: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        triangles.push(Triangle {
            normal: Normal::new([n.x, n.y, n.z]),
            vertices: tri.map(|v| Vertex::new(v.position)),
        });
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl TextMesh {
    /// ASCII STL of this mesh; the mesh is validated first.
    pub fn to_stl_ascii(&self, name: &str) -> Result<String, IoError> {
        self.validate()?;
        Ok(self::to_stl_ascii(self, name))
    }

    /// Binary STL of this mesh; the mesh is validated first.
    pub fn to_stl_binary(&self, name: &str) -> Result<Vec<u8>, IoError> {
        self.validate()?;
        Ok(self::to_stl_binary(self, name)?)
    }
}
