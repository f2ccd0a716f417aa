use glam::DVec2;
use maf_layout::prelude::*;
use maf_layout_examples::{init_tracing, render_zone_matrix_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // L-shaped site described in local metres, rasterized with 0.5 m tiles.
    let base = CoordinateFrame::new(GeoCoord::new(13.4049, 52.52), 1.0);
    let local = [
        DVec2::new(0.0, 0.0),
        DVec2::new(20.0, 0.0),
        DVec2::new(20.0, 8.0),
        DVec2::new(8.0, 8.0),
        DVec2::new(8.0, 16.0),
        DVec2::new(0.0, 16.0),
    ];
    let ring: Vec<GeoCoord> = local.iter().map(|p| base.to_geo(*p)).collect();

    let frame = CoordinateFrame::setup(&ring, 0.5);
    let shape = ShapeRasterizer::rasterize(&frame, &ring);
    let mut matrix = shape.zone_matrix();
    tracing::info!(
        "{} x {} tiles, rotation {:.3} rad.",
        matrix.width(),
        matrix.height(),
        frame.rotation()
    );

    let mut painter = BrushPainter::default();
    let strokes = [
        (Brush::Sport, 3, DVec2::new(3.0, 3.0), DVec2::new(18.0, 4.0)),
        (Brush::Child, 2, DVec2::new(4.0, 6.0), DVec2::new(4.0, 15.0)),
        (Brush::Relax, 1, DVec2::new(0.0, 0.0), DVec2::new(19.0, 7.0)),
        (Brush::Erase, 1, DVec2::new(10.0, 2.0), DVec2::new(14.0, 2.0)),
    ];
    for (brush, radius, from, to) in strokes {
        painter.set_brush(Some(brush));
        painter.set_radius(radius);
        painter.begin_stroke();
        let mut changed = 0;
        for i in 0..=40 {
            let p = from.lerp(to, i as f64 / 40.0);
            painter.set_cursor(frame.to_tile(p));
            if let Some(stamp) = painter.stamp(&mut matrix, &shape.boundary) {
                changed += stamp.changed.len();
            }
        }
        painter.end_stroke();
        tracing::info!("{}: {} tiles changed.", brush.name(), changed);
    }

    for zone in Zone::ALL {
        tracing::info!("{:<10} {}", zone.name(), matrix.count(zone));
    }

    render_zone_matrix_to_png(
        &matrix,
        &shape.boundary,
        &RenderConfig::default().with_tile_px(12),
        "paint-zone-matrix.png",
    )?;
    Ok(())
}
