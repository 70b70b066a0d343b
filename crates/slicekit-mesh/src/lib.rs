//! # slicekit mesh
//!
//! Rebuilds full face/edge/vertex adjacency from a raw triangle soup and
//! intersects it with horizontal planes to produce per-layer contours.
//!
//! ## Components
//!
//! - **Mesh source**: the narrow [`MeshSource`] capability (vertex positions
//!   plus triangle indices) and the plain [`TriangleMesh`] container
//! - **Topology builder**: [`MeshTopology`] with coverage checking and the
//!   Euler-characteristic diagnostic
//! - **Planar slicer**: safe ([`MeshTopology::slice`]) and open-chain
//!   preserving ([`MeshTopology::unsafe_slice`]) slicing

pub mod slice;
pub mod source;
pub mod topology;

#[cfg(test)]
mod test_fixtures;

pub use slice::{slice, unsafe_slice};
pub use source::{MeshSource, TriangleMesh};
pub use topology::{Edge, Face, MeshTopology, Vertex};
