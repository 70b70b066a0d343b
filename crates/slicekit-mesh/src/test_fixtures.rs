//! Shared mesh fixtures for unit tests.

use nalgebra::Point3;

use crate::source::TriangleMesh;

/// Cube spanning -1..1 on each axis, two triangles per side.
pub fn unit_cube() -> TriangleMesh {
    TriangleMesh::new(
        vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ],
        vec![
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 2],
            [0, 2, 3],
            [0, 3, 7],
            [0, 7, 4],
            [1, 5, 6],
            [1, 6, 2],
            [3, 2, 6],
            [3, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
        ],
    )
}
