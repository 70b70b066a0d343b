//! Layer pipeline: build the topology once, slice per height, fill each
//! layer's region with the selected raster mode.
//!
//! The mesh and region subsystems stay independently usable; this module is
//! the thin orchestration most callers want.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use slicekit_fill::{line_fill, simple_zigzag_fill, zigzag_fill, FillMode, RasterParams};
use slicekit_geom2d::Polygons;
use slicekit_mesh::{MeshSource, MeshTopology};

/// Errors produced while validating a layer plan request.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The source mesh contributed no usable triangles.
    #[error("mesh has no usable triangles")]
    EmptyMesh,

    /// A parameter failed validation.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Parameters for [`plan_layers`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Distance between slice planes.
    pub layer_height: f32,
    /// Distance between raster rows (user units).
    pub spacing: f64,
    /// Raster direction in degrees.
    pub angle_deg: f64,
    /// Nominal deposited line thickness (user units).
    pub line_thickness: f64,
    /// Raster strategy applied to every layer.
    pub mode: FillMode,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            spacing: 2.0,
            angle_deg: 45.0,
            line_thickness: 0.5,
            mode: FillMode::Zigzag,
        }
    }
}

/// One sliced and filled layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub index: usize,
    pub height: f32,
    /// Closed slice contours at this height.
    pub contours: Polygons,
    /// Generated toolpaths for the layer region.
    pub paths: Polygons,
}

fn validate(params: &PlanParams) -> Result<(), PlanError> {
    if !(params.layer_height.is_finite() && params.layer_height > 0.0) {
        return Err(PlanError::InvalidParameters(format!(
            "layer_height must be positive, got {}",
            params.layer_height
        )));
    }
    if !(params.spacing.is_finite() && params.spacing > 0.0) {
        return Err(PlanError::InvalidParameters(format!(
            "spacing must be positive, got {}",
            params.spacing
        )));
    }
    if !(params.line_thickness.is_finite() && params.line_thickness > 0.0) {
        return Err(PlanError::InvalidParameters(format!(
            "line_thickness must be positive, got {}",
            params.line_thickness
        )));
    }
    Ok(())
}

/// Slices the mesh into layers and fills each layer's region.
pub fn plan_layers(
    source: &impl MeshSource,
    params: &PlanParams,
) -> Result<Vec<Layer>, PlanError> {
    validate(params)?;

    let topo = MeshTopology::build(source);
    if topo.faces().is_empty() {
        return Err(PlanError::EmptyMesh);
    }
    if !topo.check_topo() {
        warn!("mesh topology is incomplete; open chains will be discarded per layer");
    }

    let mut z_min = f32::INFINITY;
    let mut z_max = f32::NEG_INFINITY;
    for vertex in topo.vertices() {
        z_min = z_min.min(vertex.position.z);
        z_max = z_max.max(vertex.position.z);
    }

    let raster = RasterParams {
        spacing: params.spacing,
        angle_deg: params.angle_deg,
        line_thickness: params.line_thickness,
    };

    info!(z_min, z_max, layer_height = params.layer_height, "planning layers");

    let mut layers = Vec::new();
    let mut index = 0usize;
    loop {
        // Planes sit mid-layer: a plane coinciding exactly with a flat rim
        // of the mesh would lose those faces' contributions.
        let height = z_min + params.layer_height * (index as f32 + 0.5);
        if height >= z_max {
            break;
        }
        let contours = topo.slice(height);
        let paths = match params.mode {
            FillMode::Line => line_fill(&contours, &raster),
            FillMode::SimpleZigzag => simple_zigzag_fill(&contours, &raster),
            FillMode::Zigzag => zigzag_fill(&contours, &raster),
        };
        debug!(
            index,
            height,
            contours = contours.len(),
            paths = paths.len(),
            "layer planned"
        );
        layers.push(Layer {
            index,
            height,
            contours,
            paths,
        });
        index += 1;
    }

    info!(layers = layers.len(), "layer planning complete");
    Ok(layers)
}
