mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use maf_layout::prelude::{CoordinateFrame, ShapeRasterizer, TileCoord};

fn raster_boundary_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster/boundary");

    for &n in &[4usize, 32, 256, 2048] {
        let ring = common::geo_polygon(n, 60.0);
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let frame = CoordinateFrame::setup(black_box(&ring), 1.0);
                let shape = ShapeRasterizer::rasterize(&frame, &ring);
                black_box(shape.zone_matrix());
            });
        });
    }

    group.finish();
}

fn raster_containment_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster/contains_tile");

    for &n in &[4usize, 64, 512] {
        let ring = common::geo_polygon(n, 40.0);
        let frame = CoordinateFrame::setup(&ring, 1.0);
        let shape = ShapeRasterizer::rasterize(&frame, &ring);
        let (w, h) = (shape.bounds.max_x as i32, shape.bounds.max_y as i32);
        group.throughput(common::elements_throughput((w * h) as usize));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut inside = 0usize;
                for y in 0..h {
                    for x in 0..w {
                        if shape.boundary.contains_tile(TileCoord::new(x, y)) {
                            inside += 1;
                        }
                    }
                }
                black_box(inside);
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = raster_boundary_benches,
              raster_containment_benches
}
criterion_main!(benches);
