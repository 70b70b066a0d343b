//! End-to-end fill behavior over holed and disjoint regions.

use slicekit_fill::{
    composite_offset_fill, line_fill, offset_fill, simple_zigzag_fill, zigzag_fill, FillMode,
    RasterParams, ShellFillParams,
};
use slicekit_geom2d::{kernel, FillRule, PointF, PointLocation, Polygon, Polygons};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::from_float(&[
        PointF::new(x0, y0),
        PointF::new(x1, y0),
        PointF::new(x1, y1),
        PointF::new(x0, y1),
    ])
}

fn holed_region() -> Polygons {
    vec![rect(0.0, 0.0, 20.0, 20.0), rect(8.0, 8.0, 12.0, 12.0)]
}

fn params() -> RasterParams {
    RasterParams {
        spacing: 1.0,
        angle_deg: 0.0,
        line_thickness: 0.3,
    }
}

#[test]
fn line_fill_endpoints_never_leave_region() {
    let region = holed_region();
    let chords = line_fill(&region, &params());
    assert!(!chords.is_empty());
    for chord in &chords {
        assert_eq!(chord.len(), 2);
        for &p in &chord.points {
            assert_ne!(
                kernel::point_in_region(p, &region, FillRule::EvenOdd),
                PointLocation::Outside,
                "chord endpoint escaped the region"
            );
        }
    }
}

#[test]
fn zigzag_paths_avoid_hole_interior() {
    let region = holed_region();
    for paths in [
        simple_zigzag_fill(&region, &params()),
        zigzag_fill(&region, &params()),
    ] {
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.len() >= 2);
            for &p in &path.points {
                let f = p.to_float();
                let in_hole_interior =
                    f.x > 8.3 && f.x < 11.7 && f.y > 8.3 && f.y < 11.7;
                assert!(!in_hole_interior, "toolpath point landed inside the hole");
            }
        }
    }
}

#[test]
fn zigzag_is_deterministic() {
    let region = holed_region();
    let first = zigzag_fill(&region, &params());
    let second = zigzag_fill(&region, &params());
    assert_eq!(first, second);
}

#[test]
fn offset_then_fill_composes() {
    let region = holed_region();
    let shells = offset_fill(&region, 2.0);
    assert!(!shells.is_empty());

    let composite = composite_offset_fill(
        &region,
        &ShellFillParams {
            raster: params(),
            offset_step: 0.5,
            outward_count: 2,
            inward_count: 2,
            mode: FillMode::SimpleZigzag,
        },
    );
    assert!(!composite.is_empty());
}
