//! # slicekit fill
//!
//! Turns an arbitrary 2D region (multi-contour, possibly holed) into
//! deposition/raster toolpaths.
//!
//! ## Components
//!
//! - **Scanline generator**: [`scanline::scan_rows`] produces per-row chord
//!   tables for a scan direction and spacing
//! - **Raster connector**: [`raster::line_fill`],
//!   [`raster::simple_zigzag_fill`] and [`raster::zigzag_fill`] turn chord
//!   tables into continuous polyline toolpaths, the last with island
//!   analysis and boundary-following bridges
//! - **Offset compositor**: [`offset::offset_fill`],
//!   [`offset::composite_offset_fill`] and [`offset::hybrid_fill`] drive
//!   repeated insetting/outsetting and hand the resulting rings to the
//!   raster connector
//!
//! Toolpaths come back as open point sequences in fixed-point coordinates;
//! contour shells are explicitly closed by repeating their first point.

pub mod offset;
pub mod raster;
pub mod scanline;

pub use offset::{composite_offset_fill, hybrid_fill, offset_fill, ShellFillParams};
pub use raster::{line_fill, simple_zigzag_fill, zigzag_fill, FillMode, RasterParams};
pub use scanline::{scan_rows, Chord, ScanRow};
