mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use maf_layout::prelude::{BrushPainter, CoordinateFrame, ShapeRasterizer, TileCoord, Zone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_stroke(count: usize, extent: i32, seed: u64) -> Vec<TileCoord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = (rng.random::<f32>() * extent as f32) as i32;
            let y = (rng.random::<f32>() * extent as f32) as i32;
            TileCoord::new(x, y)
        })
        .collect()
}

fn paint_stroke_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint/stroke");

    let ring = common::geo_polygon(24, 50.0);
    let frame = CoordinateFrame::setup(&ring, 1.0);
    let shape = ShapeRasterizer::rasterize(&frame, &ring);
    let extent = shape.bounds.max_x.max(shape.bounds.max_y) as i32;

    for &radius in &[0u32, 1, 3] {
        let stroke = random_stroke(256, extent, 0xC0FFEE + radius as u64);
        group.throughput(common::elements_throughput(stroke.len()));

        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, &r| {
            b.iter_batched(
                || shape.zone_matrix(),
                |mut matrix| {
                    for (i, tile) in stroke.iter().enumerate() {
                        let zone = Zone::PAINTABLE[i % Zone::PAINTABLE.len()];
                        let result =
                            BrushPainter::paint(&mut matrix, &shape.boundary, *tile, r, zone);
                        black_box(result.changed.len());
                    }
                    black_box(matrix);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn paint_noop_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint/repaint_same_zone");

    let ring = common::geo_polygon(8, 30.0);
    let frame = CoordinateFrame::setup(&ring, 1.0);
    let shape = ShapeRasterizer::rasterize(&frame, &ring);
    let mut matrix = shape.zone_matrix();
    let center = TileCoord::new(30, 30);
    BrushPainter::paint(&mut matrix, &shape.boundary, center, 3, Zone::Sport);

    group.bench_function("radius_3", |b| {
        b.iter(|| {
            let center = black_box(center);
            let result = BrushPainter::paint(&mut matrix, &shape.boundary, center, 3, Zone::Sport);
            black_box(result.unchanged);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = paint_stroke_benches,
              paint_noop_benches
}
criterion_main!(benches);
