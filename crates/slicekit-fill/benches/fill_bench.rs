use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slicekit_fill::{line_fill, zigzag_fill, RasterParams};
use slicekit_geom2d::{PointF, Polygon};

fn bench_region() -> Vec<Polygon> {
    vec![
        Polygon::from_float(&[
            PointF::new(0.0, 0.0),
            PointF::new(40.0, 0.0),
            PointF::new(40.0, 40.0),
            PointF::new(0.0, 40.0),
        ]),
        Polygon::from_float(&[
            PointF::new(15.0, 15.0),
            PointF::new(25.0, 15.0),
            PointF::new(25.0, 25.0),
            PointF::new(15.0, 25.0),
        ]),
    ]
}

fn bench_fills(c: &mut Criterion) {
    let region = bench_region();
    let params = RasterParams {
        spacing: 1.0,
        angle_deg: 45.0,
        line_thickness: 0.4,
    };

    c.bench_function("line_fill_40x40_holed", |b| {
        b.iter(|| line_fill(black_box(&region), black_box(&params)))
    });

    c.bench_function("zigzag_fill_40x40_holed", |b| {
        b.iter(|| zigzag_fill(black_box(&region), black_box(&params)))
    });
}

criterion_group!(benches, bench_fills);
criterion_main!(benches);
