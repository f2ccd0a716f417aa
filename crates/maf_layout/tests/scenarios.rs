use std::time::Duration;

use glam::DVec2;
use maf_layout::prelude::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

const ORIGIN: GeoCoord = GeoCoord::new(13.404954, 52.520008);

/// Rectangle of `w × h` metres whose first edge points `angle` radians from east.
fn site(name: &str, angle: f64, w: f64, h: f64) -> Site {
    let base = CoordinateFrame::new(ORIGIN, 1.0);
    let x = DVec2::from_angle(angle);
    let y = x.perp();
    let ring = [DVec2::ZERO, x * w, x * w + y * h, y * h]
        .into_iter()
        .map(|p| base.to_geo(p))
        .collect();
    Site::new(name, ring).with_budget(10_000)
}

/// Session set up on `site`, with the initial generation already consumed.
fn ready_session(site: Site) -> LayoutSession {
    let mut session = LayoutSession::new(LayoutConfig::default()).expect("valid config");
    session.setup(site, ms(0), &mut ());
    let due = session.poll(ms(0), &mut ());
    assert_eq!(due.len(), 1, "setup schedules one generation");
    session
}

#[test]
fn tile_roundtrip_is_exact_for_rotated_sites() {
    for angle in [0.0, 0.4, 1.3, -2.2, 3.0] {
        let site = site("rotated", angle, 30.0, 12.0);
        let frame = CoordinateFrame::setup(&site.boundary, 1.0);
        for y in -15..15 {
            for x in -15..15 {
                let t = TileCoord::new(x, y);
                assert_eq!(frame.to_tile(frame.tile_to_local(t)), t, "angle {angle}");
            }
        }
    }
}

#[test]
fn matrix_dimensions_follow_boundary_maxima() {
    for (angle, w, h) in [(0.0, 10.0, 4.0), (0.9, 7.0, 13.0), (-1.7, 25.0, 25.0)] {
        let site = site("rect", angle, w, h);
        let frame = CoordinateFrame::setup(&site.boundary, 1.0);
        let shape = ShapeRasterizer::rasterize(&frame, &site.boundary);
        let max_x = shape.boundary.iter().map(|t| t.x).max().unwrap_or(0);
        let max_y = shape.boundary.iter().map(|t| t.y).max().unwrap_or(0);
        let matrix = shape.zone_matrix();
        assert_eq!(matrix.dimensions(), (max_y as usize, max_x as usize));
        assert_eq!(matrix.dimensions(), (h as usize, w as usize));
        assert_eq!(matrix.count(Zone::Unassigned), (w * h) as usize);
    }
}

#[test]
fn unit_square_gives_one_by_one_matrix() {
    let ring = [
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(0.0, 1.0),
    ];
    let frame = CoordinateFrame::new(ORIGIN, 1.0).aligned_to(&ring);
    let shape = ShapeRasterizer::rasterize_local(&frame, &ring);
    assert_eq!(shape.bounds, TileBounds { max_x: 1, max_y: 1 });
    let matrix = shape.zone_matrix();
    assert_eq!(matrix.dimensions(), (1, 1));
    assert_eq!(matrix.to_rows(), vec![vec![0]]);
}

#[test]
fn single_tile_stamp_marks_one_cell_and_queues_one_request() {
    let mut session = ready_session(site("park", 0.3, 8.0, 8.0));
    session.set_brush(Some(Brush::Sport));
    session.set_brush_radius(0);

    let result = session
        .paint_at(ms(100), TileCoord::new(2, 3), &mut ())
        .expect("site is set up")
        .expect("brush is selected");
    assert_eq!(result.changed.len(), 1);

    let rows = session.matrix().expect("site is set up").to_rows();
    for (y, row) in rows.iter().enumerate() {
        for (x, marker) in row.iter().enumerate() {
            let expected = if (y, x) == (3, 2) { 1 } else { 0 };
            assert_eq!(*marker, expected, "cell ({y},{x})");
        }
    }

    assert!(session.coordinator().is_pending(ServiceKind::Calculation));
    let due = session.poll(ms(350), &mut ());
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].service(), ServiceKind::Calculation);
}

#[test]
fn repainting_equal_zone_queues_nothing() {
    let mut session = ready_session(site("park", 0.0, 6.0, 6.0));
    session.set_brush(Some(Brush::Relax));
    session
        .paint_at(ms(0), TileCoord::new(2, 2), &mut ())
        .expect("site is set up");
    session.poll(ms(250), &mut ());
    assert!(!session.coordinator().is_pending(ServiceKind::Calculation));

    let again = session
        .paint_at(ms(300), TileCoord::new(2, 2), &mut ())
        .expect("site is set up")
        .expect("brush is selected");
    assert!(again.is_noop());
    assert!(!session.coordinator().is_pending(ServiceKind::Calculation));
}

#[test]
fn painting_outside_never_mutates() {
    let mut session = ready_session(site("park", 1.1, 5.0, 5.0));
    session.set_brush(Some(Brush::Child));
    session.set_brush_radius(3);
    let before = session.matrix().cloned();

    for tile in [TileCoord::new(-5, -5), TileCoord::new(20, 2), TileCoord::new(2, 40)] {
        let result = session
            .paint_at(ms(0), tile, &mut ())
            .expect("site is set up")
            .expect("brush is selected");
        assert!(result.is_noop());
    }
    assert_eq!(session.matrix().cloned(), before);
    assert!(!session.coordinator().is_pending(ServiceKind::Calculation));
}

#[test]
fn reconciling_same_result_twice_changes_nothing() {
    let mut session = ready_session(site("park", 0.2, 10.0, 10.0));
    session.register_model("swing", ModelEntry::new("swing.glb"));
    let response = CalculationResponse::new(vec![
        Slot::new(TileCoord::new(0, 0), [3, 2], Zone::Sport).with_equipment(EquipmentItem {
            key: "swing-01".into(),
            model: "swing".into(),
            ..Default::default()
        }),
        Slot::new(TileCoord::new(4, 4), [2, 2], Zone::Relax),
    ]);

    let mut tickets = Vec::new();
    for t in [0, 1000] {
        session.request_calculation(ms(t)).expect("site is set up");
        tickets.push(session.poll(ms(t + 250), &mut ()).remove(0).ticket());
    }

    let first = session
        .apply_calculation(tickets[0], &response, &mut ())
        .expect("fresh response");
    assert_eq!(first.added.len(), 3);
    let second = session
        .apply_calculation(tickets[1], &response, &mut ())
        .expect("fresh response");
    assert!(second.added.is_empty());
    assert!(second.removed.is_empty());
    assert_eq!(second.kept, 3);
}

#[test]
fn older_response_arriving_last_is_rejected() {
    let mut session = ready_session(site("park", 0.0, 10.0, 10.0));
    session.set_budget(ms(0), 100).expect("site is set up");
    let r1 = session.poll(ms(250), &mut ()).remove(0).ticket();
    session.set_budget(ms(260), 200).expect("site is set up");
    let r2 = session.poll(ms(510), &mut ()).remove(0).ticket();
    assert!(r1 < r2);

    let r2_result = CalculationResponse::new(vec![Slot::new(TileCoord::ZERO, [2, 2], Zone::Child)]);
    let r1_result =
        CalculationResponse::new(vec![Slot::new(TileCoord::new(5, 5), [1, 1], Zone::Sport)]);

    let mut events = VecSink::new();
    assert!(session.apply_calculation(r2, &r2_result, &mut events).is_some());
    assert!(session.apply_calculation(r1, &r1_result, &mut events).is_none());

    let keys: Vec<String> = session.objects().map(|o| o.key.to_string()).collect();
    assert_eq!(keys, vec!["child:0,0:2x2".to_string()]);
    let stale = events.count(|e| {
        matches!(e, LayoutEvent::StaleResponseDiscarded { ticket, .. } if *ticket == r1)
    });
    assert_eq!(stale, 1);
}

#[test]
fn unknown_equipment_is_reported_not_fatal() {
    let mut session = ready_session(site("park", 0.0, 10.0, 10.0));
    let response = CalculationResponse::new(vec![Slot::new(TileCoord::ZERO, [2, 2], Zone::Child)
        .with_equipment(EquipmentItem {
            key: "carousel-7".into(),
            model: "carousel".into(),
            ..Default::default()
        })]);
    session.request_calculation(ms(0)).expect("site is set up");
    let ticket = session.poll(ms(250), &mut ()).remove(0).ticket();

    let mut events = VecSink::new();
    let diff = session
        .apply_calculation(ticket, &response, &mut events)
        .expect("fresh response");
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].kind, VisualKind::Placeholder);
    assert_eq!(
        events.count(|e| matches!(e, LayoutEvent::UnknownEquipment { .. })),
        1
    );
}
