//! Polygon-kernel adapter: boolean ops, offsetting, area and point location.
//!
//! The clipping engine itself is supplied by `geo` (boolean operations,
//! point location, simplification) and `cavalier_contours` (parallel
//! offsetting); this module only adapts the fixed-point [`Polygon`] types to
//! those backends and composes multi-contour regions under a [`FillRule`].
//!
//! Coordinates cross into the backends in floating user units and are
//! rounded back onto the fixed grid on the way out. Offset deltas and
//! simplification tolerances are user units; areas are fixed-point units
//! squared, matching [`Polygon::signed_area`].
//!
//! A failed or empty backend call is reported as an empty result, never an
//! error: offset iteration treats it as its natural termination signal.

use std::panic::{self, AssertUnwindSafe};

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon, Simplify};
use tracing::warn;

use crate::point::{Point2, PointF};
use crate::polygon::{FillRule, PointLocation, Polygon, Polygons};

/// Segments used to flatten one arc bulge coming back from the offsetter.
const ARC_SEGMENTS: usize = 8;

fn ring_coords(ring: &Polygon) -> Vec<Coord<f64>> {
    let mut pts = ring.points.as_slice();
    // Drop an explicit closing duplicate; geo closes rings itself.
    if pts.len() > 1 && pts.first() == pts.last() {
        pts = &pts[..pts.len() - 1];
    }
    pts.iter()
        .map(|p| {
            let f = p.to_float();
            Coord { x: f.x, y: f.y }
        })
        .collect()
}

fn ring_to_geo(ring: &Polygon) -> GeoPolygon<f64> {
    GeoPolygon::new(LineString::new(ring_coords(ring)), Vec::new())
}

fn line_string_to_polygon(ls: &LineString<f64>, positive: bool) -> Polygon {
    let mut coords = ls.0.as_slice();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords = &coords[..coords.len() - 1];
    }
    let mut poly = Polygon::from_points(
        coords
            .iter()
            .map(|c| Point2::from_float(PointF::new(c.x, c.y)))
            .collect(),
    );
    if (poly.signed_area() > 0.0) != positive {
        poly.reverse();
    }
    poly
}

fn multipolygon_to_polygons(mp: &MultiPolygon<f64>) -> Polygons {
    let mut out = Polygons::new();
    for gp in &mp.0 {
        let outer = line_string_to_polygon(gp.exterior(), true);
        if outer.len() >= 3 {
            out.push(outer);
        }
        for hole in gp.interiors() {
            let ring = line_string_to_polygon(hole, false);
            if ring.len() >= 3 {
                out.push(ring);
            }
        }
    }
    out
}

fn union_fold(rings: Vec<GeoPolygon<f64>>) -> MultiPolygon<f64> {
    let mut acc: Option<MultiPolygon<f64>> = None;
    for gp in rings {
        let mp = MultiPolygon::new(vec![gp]);
        acc = Some(match acc {
            None => mp,
            Some(prev) => prev.union(&mp),
        });
    }
    acc.unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

fn xor_fold(rings: Vec<GeoPolygon<f64>>) -> MultiPolygon<f64> {
    let mut acc: Option<MultiPolygon<f64>> = None;
    for gp in rings {
        let mp = MultiPolygon::new(vec![gp]);
        acc = Some(match acc {
            None => mp,
            Some(prev) => prev.xor(&mp),
        });
    }
    acc.unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

/// Resolves a flat contour list into a filled region under the fill rule.
///
/// Even-odd regions are the symmetric difference of their contour
/// interiors; non-zero regions are the union of positively wound contours
/// minus the union of negatively wound ones.
fn region_to_multipolygon(region: &[Polygon], fill_rule: FillRule) -> MultiPolygon<f64> {
    let rings: Vec<&Polygon> = region.iter().filter(|r| r.len() >= 3).collect();
    match rings.len() {
        0 => MultiPolygon::new(Vec::new()),
        1 => MultiPolygon::new(vec![ring_to_geo(rings[0])]),
        _ => match fill_rule {
            FillRule::EvenOdd => xor_fold(rings.into_iter().map(ring_to_geo).collect()),
            FillRule::NonZero => {
                let (pos, neg): (Vec<&Polygon>, Vec<&Polygon>) =
                    rings.into_iter().partition(|r| r.signed_area() >= 0.0);
                let pos_mp = union_fold(pos.into_iter().map(ring_to_geo).collect());
                if neg.is_empty() {
                    pos_mp
                } else {
                    let neg_mp = union_fold(neg.into_iter().map(ring_to_geo).collect());
                    pos_mp.difference(&neg_mp)
                }
            }
        },
    }
}

/// Boolean union of two regions.
pub fn union(left: &[Polygon], right: &[Polygon], fill_rule: FillRule) -> Polygons {
    let a = region_to_multipolygon(left, fill_rule);
    let b = region_to_multipolygon(right, fill_rule);
    multipolygon_to_polygons(&a.union(&b))
}

/// Boolean intersection of two regions.
pub fn intersection(left: &[Polygon], right: &[Polygon], fill_rule: FillRule) -> Polygons {
    let a = region_to_multipolygon(left, fill_rule);
    let b = region_to_multipolygon(right, fill_rule);
    multipolygon_to_polygons(&a.intersection(&b))
}

/// Boolean difference `left \ right`.
pub fn difference(left: &[Polygon], right: &[Polygon], fill_rule: FillRule) -> Polygons {
    let a = region_to_multipolygon(left, fill_rule);
    let b = region_to_multipolygon(right, fill_rule);
    multipolygon_to_polygons(&a.difference(&b))
}

/// Boolean symmetric difference of two regions.
pub fn xor(left: &[Polygon], right: &[Polygon], fill_rule: FillRule) -> Polygons {
    let a = region_to_multipolygon(left, fill_rule);
    let b = region_to_multipolygon(right, fill_rule);
    multipolygon_to_polygons(&a.xor(&b))
}

/// Reduces each contour's vertex count within `epsilon` (user units).
pub fn make_simple(region: &[Polygon], epsilon: f64) -> Polygons {
    let mut out = Polygons::new();
    for ring in region {
        if ring.len() < 3 {
            continue;
        }
        let mut coords = ring_coords(ring);
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
        let simplified = LineString::new(coords).simplify(&epsilon);
        let positive = ring.signed_area() >= 0.0;
        let reduced = line_string_to_polygon(&simplified, positive);
        if reduced.len() >= 3 {
            out.push(reduced);
        }
    }
    out
}

/// Sum of signed contour areas in fixed-point units squared.
pub fn area(region: &[Polygon]) -> f64 {
    region.iter().map(Polygon::signed_area).sum()
}

/// Locates a fixed-point coordinate relative to a multi-contour region.
pub fn point_in_region(point: Point2, region: &[Polygon], fill_rule: FillRule) -> PointLocation {
    let f = point.to_float();
    let coord = Coord { x: f.x, y: f.y };
    let mut inside_count = 0usize;
    let mut winding = 0i64;
    for ring in region {
        if ring.len() < 3 {
            continue;
        }
        match ring_to_geo(ring).coordinate_position(&coord) {
            CoordPos::OnBoundary => return PointLocation::OnBoundary,
            CoordPos::Inside => {
                inside_count += 1;
                winding += if ring.signed_area() >= 0.0 { 1 } else { -1 };
            }
            CoordPos::Outside => {}
        }
    }
    let inside = match fill_rule {
        FillRule::EvenOdd => inside_count % 2 == 1,
        FillRule::NonZero => winding != 0,
    };
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

fn contour_to_pline(contour: &Polygon) -> Polyline<f64> {
    let mut pts = contour.points.clone();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    // The offsetter convention used here expects clockwise winding, with a
    // positive delta growing the contour and a negative one shrinking it.
    if contour.signed_area() > 0.0 {
        pts.reverse();
    }
    let mut pline = Polyline::new();
    for p in pts {
        let f = p.to_float();
        pline.add_vertex(PlineVertex::new(f.x, f.y, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

fn append_arc_points(
    start: &PlineVertex<f64>,
    end_x: f64,
    end_y: f64,
    out: &mut Vec<Point2>,
) {
    let theta = 4.0 * start.bulge.atan();
    let chord_len = (end_x - start.x).hypot(end_y - start.y);
    if chord_len <= 1e-9 {
        return;
    }
    let radius = (chord_len / (2.0 * (theta / 2.0).sin())).abs();
    let dist_to_center = radius * (theta.abs() / 2.0).cos();
    let side = if start.bulge > 0.0 { 1.0 } else { -1.0 };
    let cx = (start.x + end_x) / 2.0 - (end_y - start.y) / chord_len * dist_to_center * side;
    let cy = (start.y + end_y) / 2.0 + (end_x - start.x) / chord_len * dist_to_center * side;
    let start_angle = (start.y - cy).atan2(start.x - cx);
    let mut end_angle = (end_y - cy).atan2(end_x - cx);
    if start.bulge > 0.0 {
        if end_angle <= start_angle {
            end_angle += 2.0 * std::f64::consts::PI;
        }
    } else if end_angle >= start_angle {
        end_angle -= 2.0 * std::f64::consts::PI;
    }
    for j in 1..ARC_SEGMENTS {
        let t = j as f64 / ARC_SEGMENTS as f64;
        let angle = start_angle + (end_angle - start_angle) * t;
        out.push(Point2::from_float(PointF::new(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
        )));
    }
}

fn pline_to_polygon(pline: &Polyline<f64>) -> Polygon {
    let verts = &pline.vertex_data;
    let mut points = Vec::with_capacity(verts.len());
    for (i, v) in verts.iter().enumerate() {
        points.push(Point2::from_float(PointF::new(v.x, v.y)));
        if v.bulge.abs() > 1e-9 {
            let next = &verts[(i + 1) % verts.len()];
            append_arc_points(v, next.x, next.y, &mut points);
        }
    }
    let mut poly = Polygon::from_points(points);
    if poly.signed_area() < 0.0 {
        poly.reverse();
    }
    poly
}

/// Parallel offset of a single contour; positive deltas grow, negative
/// deltas shrink (user units). A shrink past extinction returns an empty
/// set, which offset-iteration loops use as their stop condition.
pub fn offset(contour: &Polygon, delta: f64) -> Polygons {
    if contour.len() < 3 {
        return Polygons::new();
    }
    let pline = contour_to_pline(contour);
    let result = panic::catch_unwind(AssertUnwindSafe(|| pline.parallel_offset(delta)));
    match result {
        Ok(plines) => plines
            .iter()
            .map(pline_to_polygon)
            .filter(|p| p.len() >= 3)
            .collect(),
        Err(_) => {
            warn!("offset backend panicked; treating contour as vanished");
            Polygons::new()
        }
    }
}

/// Parallel offset of a multi-contour region.
///
/// Hole contours (negative area) are offset with the opposite delta so an
/// inset shrinks the filled area from both sides; overlaps between the
/// independently offset rings are resolved with a boolean difference.
pub fn offset_region(region: &[Polygon], delta: f64) -> Polygons {
    let mut grown_outers = Polygons::new();
    let mut grown_holes = Polygons::new();
    for ring in region {
        if ring.len() < 3 {
            continue;
        }
        let is_hole = ring.signed_area() < 0.0;
        let d = if is_hole { -delta } else { delta };
        let pieces = offset(ring, d);
        if is_hole {
            grown_holes.extend(pieces);
        } else {
            grown_outers.extend(pieces);
        }
    }
    if grown_outers.is_empty() {
        return Polygons::new();
    }
    if grown_holes.is_empty() && grown_outers.len() == 1 {
        return grown_outers;
    }
    let outers = region_to_multipolygon(&grown_outers, FillRule::NonZero);
    if grown_holes.is_empty() {
        return multipolygon_to_polygons(&outers);
    }
    let holes = region_to_multipolygon(&grown_holes, FillRule::NonZero);
    multipolygon_to_polygons(&outers.difference(&holes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::FIXED_SCALE;

    fn square(origin: f64, side: f64) -> Polygon {
        Polygon::from_float(&[
            PointF::new(origin, origin),
            PointF::new(origin + side, origin),
            PointF::new(origin + side, origin + side),
            PointF::new(origin, origin + side),
        ])
    }

    fn fixed_area(user_area: f64) -> f64 {
        user_area * FIXED_SCALE * FIXED_SCALE
    }

    #[test]
    fn test_intersection_of_overlapping_squares() {
        let a = vec![square(0.0, 10.0)];
        let b = vec![square(5.0, 10.0)];
        let result = intersection(&a, &b, FillRule::EvenOdd);
        assert_eq!(result.len(), 1);
        let got = area(&result);
        assert!((got - fixed_area(25.0)).abs() < fixed_area(1e-3));
    }

    #[test]
    fn test_union_and_xor_areas() {
        let a = vec![square(0.0, 10.0)];
        let b = vec![square(5.0, 10.0)];
        let union_area = area(&union(&a, &b, FillRule::EvenOdd));
        assert!((union_area - fixed_area(175.0)).abs() < fixed_area(1e-3));
        let xor_area = area(&xor(&a, &b, FillRule::EvenOdd));
        assert!((xor_area - fixed_area(150.0)).abs() < fixed_area(1e-3));
    }

    #[test]
    fn test_difference_cuts_hole() {
        let outer = vec![square(0.0, 10.0)];
        let inner = vec![square(4.0, 2.0)];
        let result = difference(&outer, &inner, FillRule::EvenOdd);
        // One outer contour plus one hole contour.
        assert_eq!(result.len(), 2);
        let got = area(&result);
        assert!((got - fixed_area(96.0)).abs() < fixed_area(1e-3));
    }

    #[test]
    fn test_point_in_region_square_with_hole() {
        // Even-odd region: outer 10x10 square with a 2x2 hole in the middle.
        let region = vec![square(0.0, 10.0), square(4.0, 2.0)];
        let probe = |x: f64, y: f64| {
            point_in_region(
                Point2::from_float(PointF::new(x, y)),
                &region,
                FillRule::EvenOdd,
            )
        };
        assert_eq!(probe(1.0, 1.0), PointLocation::Inside);
        assert_eq!(probe(5.0, 5.0), PointLocation::Outside);
        assert_eq!(probe(15.0, 5.0), PointLocation::Outside);
        assert_eq!(probe(0.0, 5.0), PointLocation::OnBoundary);
        assert_eq!(probe(5.0, 4.0), PointLocation::OnBoundary);
    }

    #[test]
    fn test_offset_grows_and_shrinks() {
        let contour = square(0.0, 10.0);
        let grown = offset(&contour, 1.0);
        assert_eq!(grown.len(), 1);
        assert!(area(&grown) > fixed_area(100.0));

        let shrunk = offset(&contour, -1.0);
        assert_eq!(shrunk.len(), 1);
        assert!((area(&shrunk) - fixed_area(64.0)).abs() < fixed_area(1e-2));

        // Shrinking past extinction terminates with an empty set.
        assert!(offset(&contour, -6.0).is_empty());
    }

    #[test]
    fn test_offset_region_insets_holes_outward() {
        let mut hole = square(4.0, 2.0);
        hole.reverse();
        let region = vec![square(0.0, 10.0), hole];
        let inset = offset_region(&region, -0.5);
        // Outer shrinks to 9x9; the hole grows to roughly 3x3, minus the
        // rounding the offsetter puts on its corners.
        let got = area(&inset);
        assert!((got - fixed_area(81.0 - 9.0)).abs() < fixed_area(0.5));
        assert!(got < fixed_area(81.0 - 8.0));
    }

    #[test]
    fn test_make_simple_drops_collinear_points() {
        let ring = Polygon::from_float(&[
            PointF::new(0.0, 0.0),
            PointF::new(5.0, 0.0),
            PointF::new(10.0, 0.0),
            PointF::new(10.0, 10.0),
            PointF::new(0.0, 10.0),
        ]);
        let simple = make_simple(&vec![ring], 1e-3);
        assert_eq!(simple.len(), 1);
        assert_eq!(simple[0].len(), 4);
    }
}
