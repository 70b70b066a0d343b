//! The narrow mesh capability the topology builder consumes.

use nalgebra::Point3;

/// Anything that can hand out a vertex-position table and a triangle-index
/// table. The topology builder depends on nothing richer.
pub trait MeshSource {
    /// Vertex positions, indexed by the triangle table.
    fn positions(&self) -> &[Point3<f32>];

    /// Triangles as index triples into [`MeshSource::positions`].
    fn triangles(&self) -> &[[u32; 3]];
}

/// A plain owned triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Point3<f32>>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Point3<f32>>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some((min, max))
    }
}

impl MeshSource for TriangleMesh {
    fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mesh = TriangleMesh::new(
            vec![
                Point3::new(-1.0, 2.0, 0.5),
                Point3::new(3.0, -4.0, 1.5),
                Point3::new(0.0, 0.0, -2.0),
            ],
            vec![[0, 1, 2]],
        );
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-1.0, -4.0, -2.0));
        assert_eq!(max, Point3::new(3.0, 2.0, 1.5));
        assert_eq!(TriangleMesh::default().bounding_box(), None);
    }
}
