//! Planar slicing of a rebuilt mesh topology.
//!
//! Each face contributes one straight chord where the plane crosses it;
//! chord endpoints are quantized onto the fixed-point grid so coincident
//! points from adjacent faces merge into one graph node. Loop assembly then
//! walks the resulting adjacency multigraph: well-formed manifold slices
//! have local degree two, so the walk either returns to its start (a closed
//! contour) or dead-ends (an open chain from a boundary or defect).
//!
//! [`MeshTopology::slice`] keeps closed contours only;
//! [`MeshTopology::unsafe_slice`] preserves open chains with an explicit
//! `closed` flag, which wire-deposition style processes can still use.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;
use tracing::debug;

use slicekit_geom2d::kernel;
use slicekit_geom2d::{
    FillRule, Point2, PointLocation, Polygon, Polygons, UnsafePolygon, UnsafePolygons,
};

use crate::source::MeshSource;
use crate::topology::MeshTopology;

/// Crossing of one edge with the plane `z = height`, quantized.
///
/// An edge lying entirely in the plane yields no point; a face whose rim
/// touches the plane that way can lose its contribution at razor-thin
/// seams, which is the accepted reference behavior.
fn edge_plane_crossing(a: &Point3<f32>, b: &Point3<f32>, height: f32) -> Option<Point2> {
    if (a.z > height && b.z > height) || (a.z < height && b.z < height) {
        return None;
    }
    if a.z == height && b.z == height {
        return None;
    }
    let t = (height - a.z) / (b.z - a.z);
    Some(Point2::quantize(
        a.x + t * (b.x - a.x),
        a.y + t * (b.y - a.y),
    ))
}

/// Flips each closed loop so contours at even nesting depth wind positive
/// and holes wind negative.
fn orient_closed_loops(loops: &mut [Polygon]) {
    let snapshots: Vec<Polygon> = loops.to_vec();
    for (i, poly) in loops.iter_mut().enumerate() {
        let Some(&probe) = poly.points.first() else {
            continue;
        };
        let mut depth = 0usize;
        for (j, other) in snapshots.iter().enumerate() {
            if i == j {
                continue;
            }
            if kernel::point_in_region(probe, std::slice::from_ref(other), FillRule::EvenOdd)
                == PointLocation::Inside
            {
                depth += 1;
            }
        }
        let want_positive = depth % 2 == 0;
        if (poly.signed_area() > 0.0) != want_positive {
            poly.reverse();
        }
    }
}

impl MeshTopology {
    /// Chords contributed by every face crossed by the plane.
    fn plane_chords(&self, height: f32) -> Vec<(Point2, Point2)> {
        let mut chords = Vec::new();
        for face in self.faces() {
            let [v0, v1, v2] = face.vertices;
            let p0 = &self.vertex(v0).position;
            let p1 = &self.vertex(v1).position;
            let p2 = &self.vertex(v2).position;

            let mut points: Vec<Point2> = Vec::with_capacity(3);
            for crossing in [
                edge_plane_crossing(p0, p1, height),
                edge_plane_crossing(p1, p2, height),
                edge_plane_crossing(p2, p0, height),
            ]
            .into_iter()
            .flatten()
            {
                if !points.contains(&crossing) {
                    points.push(crossing);
                }
            }
            // A face normally yields exactly two distinct crossing points;
            // grazing contacts collapse to fewer and are dropped.
            if points.len() == 2 {
                chords.push((points[0], points[1]));
            }
        }
        chords
    }

    /// Assembles plane chords into chains, flagging the ones that closed.
    fn assemble_chains(&self, height: f32) -> Vec<(Vec<Point2>, bool)> {
        let chords = self.plane_chords(height);
        debug!(height, chords = chords.len(), "assembling slice chains");

        let mut adjacency: HashMap<Point2, Vec<Point2>> = HashMap::new();
        for &(a, b) in &chords {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        for neighbors in adjacency.values_mut() {
            neighbors.sort_unstable();
        }

        let mut keys: Vec<Point2> = adjacency.keys().copied().collect();
        keys.sort_unstable();

        let mut visited: HashSet<Point2> = HashSet::new();
        let mut chains = Vec::new();

        // Walk chain ends before interior nodes so open chains come out
        // whole instead of fragmented.
        let endpoint_pass = keys.iter().copied().filter(|k| adjacency[k].len() != 2);
        let interior_pass = keys.iter().copied();
        for start in endpoint_pass.chain(interior_pass) {
            if visited.contains(&start) {
                continue;
            }
            let mut chain = vec![start];
            visited.insert(start);
            let mut prev: Option<Point2> = None;
            let mut current = start;
            let mut closed = false;
            loop {
                let neighbors = &adjacency[&current];
                let next = neighbors
                    .iter()
                    .copied()
                    .find(|n| Some(*n) != prev && !visited.contains(n));
                match next {
                    Some(next) => {
                        chain.push(next);
                        visited.insert(next);
                        prev = Some(current);
                        current = next;
                    }
                    None => {
                        closed = chain.len() >= 3
                            && prev != Some(start)
                            && neighbors.contains(&start);
                        break;
                    }
                }
            }
            chains.push((chain, closed));
        }
        chains
    }

    /// Slices at `height`, keeping only chains that closed into loops of at
    /// least three points. Repeated calls on the same topology return the
    /// same polygon set.
    pub fn slice(&self, height: f32) -> Polygons {
        let mut loops: Polygons = self
            .assemble_chains(height)
            .into_iter()
            .filter(|(chain, closed)| *closed && chain.len() >= 3)
            .map(|(chain, _)| Polygon::from_points(chain))
            .collect();
        orient_closed_loops(&mut loops);
        loops
    }

    /// Slices at `height`, preserving every chain of at least two points
    /// with an explicit `closed` flag.
    pub fn unsafe_slice(&self, height: f32) -> UnsafePolygons {
        let mut result: UnsafePolygons = self
            .assemble_chains(height)
            .into_iter()
            .filter(|(chain, _)| chain.len() >= 2)
            .map(|(chain, closed)| UnsafePolygon {
                path: Polygon::from_points(chain),
                closed,
            })
            .collect();

        let mut closed_loops: Polygons = result
            .iter()
            .filter(|u| u.closed)
            .map(|u| u.path.clone())
            .collect();
        orient_closed_loops(&mut closed_loops);
        let mut replacements = closed_loops.into_iter();
        for entry in result.iter_mut().filter(|u| u.closed) {
            if let Some(oriented) = replacements.next() {
                entry.path = oriented;
            }
        }
        result
    }
}

/// Builds the topology and slices in one call.
pub fn slice(source: &impl MeshSource, height: f32) -> Polygons {
    MeshTopology::build(source).slice(height)
}

/// Builds the topology and slices in one call, keeping open chains.
pub fn unsafe_slice(source: &impl MeshSource, height: f32) -> UnsafePolygons {
    MeshTopology::build(source).unsafe_slice(height)
}
