use std::time::Duration;

use glam::DVec2;
use maf_layout::prelude::*;
use maf_layout_examples::{
    demo_catalog, demo_models, init_tracing, render_layout_to_png, BandGenerator, GreedyPlacer,
    RenderConfig,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Rotated 36 x 22 m rectangle north of the origin.
    let base = CoordinateFrame::new(GeoCoord::new(7.0982, 50.7374), 1.0);
    let x = DVec2::from_angle(0.35);
    let y = x.perp();
    let ring = [DVec2::ZERO, x * 36.0, x * 36.0 + y * 22.0, y * 22.0]
        .into_iter()
        .map(|p| base.to_geo(p))
        .collect();
    let site = Site::new("Riverside", ring)
        .with_budget(20_000)
        .with_providers(["acme", "playcraft"]);

    let generator = BandGenerator::default();
    let placer = GreedyPlacer::with_catalog(demo_catalog());
    let mut session = LayoutSession::new(LayoutConfig::default())?.with_models(demo_models());
    let mut events = VecSink::new();

    // Setup dispatches a generation immediately; its result triggers a calculation.
    session.setup(site, Duration::ZERO, &mut events);
    let report = session.drive(Duration::ZERO, &generator, &placer, &mut events);
    tracing::info!(
        "Initial layout: {} dispatches, {} objects, {} unknown models.",
        report.dispatched,
        session.scene().len(),
        events.count(|e| matches!(e, LayoutEvent::UnknownEquipment { .. }))
    );

    // A relax stroke across the middle of the site, one stamp every 16 ms.
    session.set_brush(Some(Brush::Relax));
    session.set_brush_radius(2);
    let frame = session
        .frame()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no site"))?;
    let mut now = Duration::from_millis(1_000);
    for step in 0..20 {
        let local = frame.tile_space_to_local(DVec2::new(4.0 + step as f64, 11.0));
        let geo = frame.to_geo(local);
        if step == 0 {
            session.pointer_down(now, geo, &mut events)?;
        } else {
            session.pointer_move(now, geo, &mut events)?;
        }
        now += Duration::from_millis(16);
    }
    session.pointer_up();

    // Nothing is due while the stroke is still within the debounce window.
    let during = session.drive(now, &generator, &placer, &mut events);
    tracing::info!("During stroke: {} dispatches.", during.dispatched);

    if let Some(deadline) = session.next_deadline() {
        now = now.max(deadline);
    }
    let after = session.drive(now, &generator, &placer, &mut events);
    tracing::info!(
        "After stroke: {} dispatches, +{} / -{} objects.",
        after.dispatched,
        after.added,
        after.removed
    );

    // Restrict the catalogue to one provider.
    session.toggle_provider(now, "playcraft")?;
    now += session.config().debounce;
    session.drive(now, &generator, &placer, &mut events);

    let stats = session.coordinator().stats();
    tracing::info!(
        "Requests: {} generations, {} calculations, {} collapsed, {} stale.",
        stats.generation_dispatched,
        stats.calculation_dispatched,
        stats.collapsed,
        stats.stale_discarded
    );

    let summary = session.summary();
    for item in &summary.equipment {
        tracing::info!("{:<16} {:<10} {:>8.2}", item.name, item.provider, item.cost);
    }
    tracing::info!(
        "Total {} of {} ({} left).",
        summary.total_cost,
        summary.budget,
        summary.remaining()
    );

    let (Some(matrix), Some(boundary)) = (session.matrix(), session.boundary()) else {
        anyhow::bail!("no site");
    };
    let response = placer.calculate(&session.calculation_request()?)?;
    render_layout_to_png(
        matrix,
        boundary,
        &response,
        &RenderConfig::default(),
        "headless-session.png",
    )?;

    Ok(())
}
