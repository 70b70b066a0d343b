//! # slicekit
//!
//! Turns a triangulated surface into a stack of 2D cross-sections and, for
//! each cross-section, synthesizes deposition/raster toolpaths.
//!
//! ## Crates
//!
//! - `slicekit-geom2d`: fixed-point 2D polygon types and the polygon-kernel
//!   adapter (boolean ops, offsets, point location)
//! - `slicekit-mesh`: triangle-soup topology reconstruction and planar
//!   slicing
//! - `slicekit-fill`: raster, zigzag and offset-shell toolpath generation
//!
//! This crate re-exports the public surface of all three and adds the layer
//! pipeline that drives them per slice height.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slicekit::{plan_layers, PlanParams, TriangleMesh};
//!
//! let mesh = TriangleMesh::new(positions, triangles);
//! let layers = plan_layers(&mesh, &PlanParams::default())?;
//! for layer in &layers {
//!     emit(layer.height, &layer.paths);
//! }
//! ```

pub mod pipeline;

pub use pipeline::{plan_layers, Layer, PlanError, PlanParams};

pub use slicekit_geom2d::{
    kernel, FillRule, Point2, PointF, PointLocation, Polygon, Polygons, UnsafePolygon,
    UnsafePolygons, FIXED_SCALE,
};

pub use slicekit_mesh::{
    slice, unsafe_slice, Edge, Face, MeshSource, MeshTopology, TriangleMesh, Vertex,
};

pub use slicekit_fill::{
    composite_offset_fill, hybrid_fill, line_fill, offset_fill, scan_rows, simple_zigzag_fill,
    zigzag_fill, Chord, FillMode, RasterParams, ScanRow, ShellFillParams,
};
