//! Adjacency reconstruction over a raw triangle soup.
//!
//! [`MeshTopology`] is built once per mesh and immutable afterwards. The
//! rebuilt adjacency is not guaranteed to be a complete manifold: triangles
//! with out-of-range or repeated indices are skipped, and an edge keeps at
//! most the first two faces that reference it (extra faces on a non-manifold
//! edge are dropped). [`MeshTopology::check_topo`] and
//! [`MeshTopology::euler_characteristic`] are the pre-flight diagnostics for
//! callers that want to reject degenerate input before slicing.

use std::collections::{HashMap, HashSet};

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::source::MeshSource;

/// A mesh vertex with back-references to everything incident on it.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub faces: Vec<usize>,
    pub edges: Vec<usize>,
}

/// An undirected edge between two vertices, referenced by at most two faces.
#[derive(Debug, Clone)]
pub struct Edge {
    pub vertices: [usize; 2],
    pub faces: [Option<usize>; 2],
}

impl Edge {
    /// An edge seen by fewer than two faces bounds an open surface (or a
    /// slicing artifact of a broken one).
    pub fn is_boundary(&self) -> bool {
        self.faces[1].is_none()
    }

    /// Attaches a face reference; the first two faces win, later ones on a
    /// non-manifold edge are dropped.
    fn attach_face(&mut self, face: usize) {
        if self.faces[0].is_none() {
            self.faces[0] = Some(face);
        } else if self.faces[1].is_none() {
            self.faces[1] = Some(face);
        }
    }
}

/// A triangle with resolved vertex and edge references.
#[derive(Debug, Clone)]
pub struct Face {
    pub vertices: [usize; 3],
    pub edges: [usize; 3],
    pub normal: Option<Vector3<f32>>,
}

/// Full face/edge/vertex adjacency rebuilt from a [`MeshSource`].
#[derive(Debug, Clone, Default)]
pub struct MeshTopology {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
}

impl MeshTopology {
    /// Rebuilds adjacency from the source's vertex and triangle tables.
    pub fn build(source: &impl MeshSource) -> Self {
        Self::build_inner(source, false)
    }

    /// Like [`MeshTopology::build`], additionally computing per-face normals.
    pub fn build_with_normals(source: &impl MeshSource) -> Self {
        Self::build_inner(source, true)
    }

    fn build_inner(source: &impl MeshSource, with_normals: bool) -> Self {
        let positions = source.positions();
        let mut topo = MeshTopology {
            vertices: positions
                .iter()
                .map(|p| Vertex {
                    position: *p,
                    faces: Vec::new(),
                    edges: Vec::new(),
                })
                .collect(),
            edges: Vec::new(),
            faces: Vec::new(),
        };

        // Hashed unordered vertex pair -> edge index, for O(1) edge reuse.
        let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::new();
        let mut skipped = 0usize;

        for tri in source.triangles() {
            let v = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let in_range = v.iter().all(|&i| i < positions.len());
            if !in_range || v[0] == v[1] || v[1] == v[2] || v[2] == v[0] {
                skipped += 1;
                continue;
            }

            let face_index = topo.faces.len();
            let mut face_edges = [0usize; 3];
            for (slot, (a, b)) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])]
                .into_iter()
                .enumerate()
            {
                let key = (a.min(b), a.max(b));
                let edge_index = match edge_lookup.get(&key) {
                    Some(&index) => {
                        topo.edges[index].attach_face(face_index);
                        index
                    }
                    None => {
                        let index = topo.edges.len();
                        topo.edges.push(Edge {
                            vertices: [a, b],
                            faces: [Some(face_index), None],
                        });
                        edge_lookup.insert(key, index);
                        topo.vertices[a].edges.push(index);
                        topo.vertices[b].edges.push(index);
                        index
                    }
                };
                face_edges[slot] = edge_index;
            }

            let normal = if with_normals {
                let e1 = positions[v[1]] - positions[v[0]];
                let e2 = positions[v[2]] - positions[v[0]];
                e1.cross(&e2).try_normalize(1e-12)
            } else {
                None
            };

            for &vi in &v {
                topo.vertices[vi].faces.push(face_index);
            }
            topo.faces.push(Face {
                vertices: v,
                edges: face_edges,
                normal,
            });
        }

        if skipped > 0 {
            debug!(skipped, "skipped degenerate or out-of-range triangles");
        }
        debug!(
            vertices = topo.vertices.len(),
            edges = topo.edges.len(),
            faces = topo.faces.len(),
            "rebuilt mesh topology"
        );
        topo
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub fn face(&self, index: usize) -> &Face {
        &self.faces[index]
    }

    /// Coverage check: every face and edge reference is in range, every
    /// vertex and edge is referenced by some face, and every edge carries
    /// two faces. This rejects obviously broken input; it is not a
    /// manifoldness proof.
    pub fn check_topo(&self) -> bool {
        let mut seen_vertices: HashSet<usize> = HashSet::new();
        let mut seen_edges: HashSet<usize> = HashSet::new();
        for face in &self.faces {
            for &v in &face.vertices {
                if v >= self.vertices.len() {
                    return false;
                }
                seen_vertices.insert(v);
            }
            for &e in &face.edges {
                if e >= self.edges.len() {
                    return false;
                }
                seen_edges.insert(e);
            }
        }
        if seen_vertices.len() != self.vertices.len() || seen_edges.len() != self.edges.len() {
            return false;
        }

        let mut seen_faces: HashSet<usize> = HashSet::new();
        for edge in &self.edges {
            if edge.vertices.iter().any(|&v| v >= self.vertices.len()) {
                return false;
            }
            match (edge.faces[0], edge.faces[1]) {
                (Some(f0), Some(f1)) if f0 < self.faces.len() && f1 < self.faces.len() => {
                    seen_faces.insert(f0);
                    seen_faces.insert(f1);
                }
                _ => return false,
            }
        }
        seen_faces.len() == self.faces.len()
    }

    /// `|V| - |E| + |F|`; 2 for a sphere-like closed surface. Diagnostic
    /// only, no topological completeness is implied.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - self.edges.len() as i64 + self.faces.len() as i64
    }

    /// Exports the rebuilt topology back to flat vertex and triangle tables.
    pub fn triangle_mesh(&self) -> (Vec<Point3<f32>>, Vec<[u32; 3]>) {
        let positions = self.vertices.iter().map(|v| v.position).collect();
        let triangles = self
            .faces
            .iter()
            .map(|f| [f.vertices[0] as u32, f.vertices[1] as u32, f.vertices[2] as u32])
            .collect();
        (positions, triangles)
    }
}
