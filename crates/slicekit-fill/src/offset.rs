//! Offset-driven fill composition.
//!
//! Three strategies over repeated kernel offsets: pure contour shells
//! ("vase" style), composite fills that raster every ring, and the hybrid
//! shell+core fill that rasters only the innermost surviving region.

use serde::{Deserialize, Serialize};
use tracing::debug;

use slicekit_geom2d::kernel;
use slicekit_geom2d::{Polygon, Polygons, FIXED_SCALE};

use crate::raster::{line_fill, simple_zigzag_fill, zigzag_fill, FillMode, RasterParams};

/// Safety cap on offset iteration; a shrinking region normally vanishes
/// long before this.
const MAX_OFFSET_RINGS: usize = 10_000;

/// Insets the region repeatedly by multiples of `spacing` until nothing
/// survives, returning every ring force-closed. No rastering happens.
pub fn offset_fill(region: &[Polygon], spacing: f64) -> Polygons {
    let mut shells = Polygons::new();
    if spacing <= 0.0 {
        return shells;
    }
    for step in 1..=MAX_OFFSET_RINGS {
        let rings = kernel::offset_region(region, -spacing * step as f64);
        if rings.is_empty() {
            break;
        }
        shells.extend(rings.into_iter().map(Polygon::closed));
    }
    debug!(rings = shells.len(), "offset fill complete");
    shells
}

/// Parameters for the offset-composed fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellFillParams {
    pub raster: RasterParams,
    /// Distance between successive shells (user units).
    pub offset_step: f64,
    /// Shells grown outward from the region boundary.
    pub outward_count: u32,
    /// Shells inset from the region boundary.
    pub inward_count: u32,
    pub mode: FillMode,
}

impl Default for ShellFillParams {
    fn default() -> Self {
        Self {
            raster: RasterParams::default(),
            offset_step: 0.5,
            outward_count: 0,
            inward_count: 1,
            mode: FillMode::default(),
        }
    }
}

fn fill_one(region: &[Polygon], mode: FillMode, raster: &RasterParams) -> Polygons {
    match mode {
        FillMode::Line => line_fill(region, raster),
        FillMode::SimpleZigzag => simple_zigzag_fill(region, raster),
        FillMode::Zigzag => zigzag_fill(region, raster),
    }
}

/// Rasters the base region plus every outward and inward shell ring,
/// each ring filled independently, all results concatenated.
pub fn composite_offset_fill(region: &[Polygon], params: &ShellFillParams) -> Polygons {
    let mut out = fill_one(region, params.mode, &params.raster);

    for i in 1..=params.outward_count {
        let rings = kernel::offset_region(region, params.offset_step * i as f64);
        for ring in rings {
            out.extend(fill_one(
                std::slice::from_ref(&ring),
                params.mode,
                &params.raster,
            ));
        }
    }

    for i in 1..=params.inward_count {
        let rings = kernel::offset_region(region, -params.offset_step * i as f64);
        for ring in rings {
            out.extend(fill_one(
                std::slice::from_ref(&ring),
                params.mode,
                &params.raster,
            ));
        }
    }

    debug!(paths = out.len(), "composite offset fill complete");
    out
}

/// Emits outward shells, insets shells until the region degenerates, then
/// rasters only the innermost surviving islands: N shells plus exactly one
/// filled core, where the composite fill would raster every ring.
pub fn hybrid_fill(region: &[Polygon], params: &ShellFillParams) -> Polygons {
    let mut out = Polygons::new();

    for i in 1..=params.outward_count {
        let rings = kernel::offset_region(region, params.offset_step * i as f64);
        out.extend(rings.into_iter().map(Polygon::closed));
    }

    // Area floor for a ring worth keeping, in fixed-point units squared.
    let min_area = (params.raster.line_thickness * FIXED_SCALE).powi(2);

    let mut deepest = 0u32;
    for i in 1..params.inward_count {
        let rings = kernel::offset_region(region, -params.offset_step * i as f64);
        let Some(front) = rings.first() else {
            break;
        };
        if front.len() < 3 || front.signed_area().abs() < min_area {
            break;
        }
        deepest = i;
        out.extend(rings.into_iter().map(Polygon::closed));
    }

    let core = kernel::offset_region(region, -params.offset_step * (deepest + 1) as f64);
    for island in core {
        if island.len() < 3 || island.signed_area().abs() < min_area {
            continue;
        }
        out.extend(fill_one(
            std::slice::from_ref(&island),
            params.mode,
            &params.raster,
        ));
    }

    debug!(paths = out.len(), deepest_shell = deepest, "hybrid fill complete");
    out
}
