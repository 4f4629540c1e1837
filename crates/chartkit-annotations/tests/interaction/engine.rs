use std::time::{Duration, Instant};

use chartkit_annotations::{
    AnnotationEngine, AxisRef, AxisSpec, ContainerRect, EngineSettings, Modifiers, PointerEvent,
    Shape, ShapeGeometry, ShapeId, SnapshotEngine, VisualState,
};
use chartkit_core::PixelPoint;

/// Main panel on top, an indicator panel underneath, container at (20, 40).
fn engine() -> AnnotationEngine<SnapshotEngine> {
    let render = SnapshotEngine::with_axes(vec![
        AxisSpec::x("x", 0, 0.0, 1000.0, (0.0, 10000.0)).anchored_to("y"),
        AxisSpec::y("y", 0, 0.0, 400.0, (10.0, 20.0)).with_range((50.0, 150.0)),
        AxisSpec::x("x2", 1, 0.0, 1000.0, (0.0, 10000.0)).anchored_to("y2"),
        AxisSpec::y("y2", 1, 420.0, 100.0, (0.0, 100.0)),
    ]);
    let mut engine = AnnotationEngine::new(render, EngineSettings::default());
    engine.set_container(ContainerRect::new(20.0, 40.0, 1000.0, 540.0));
    engine.replace_shapes(vec![
        Shape::line("trend", 1000.0, 10.0, 2000.0, 20.0),
        Shape::line("rsi", 0.0, 50.0, 10000.0, 50.0).with_axis_ref(AxisRef::new("x2", "y2")),
        Shape::system_line(0.0, 15.0, 10000.0, 15.0),
    ]);
    engine
}

#[test]
fn test_pointer_move_hovers_in_paper_space() {
    let mut engine = engine();
    let t0 = Instant::now();

    assert!(engine.pointer_move(&PointerEvent::new(170.0, 140.0), t0));
    assert_eq!(engine.hovered(), Some(&ShapeId::from("trend")));

    let later = t0 + Duration::from_millis(20);
    assert!(engine.pointer_move(&PointerEvent::new(170.0, 340.0), later));
    assert!(engine.hovered().is_none());
}

#[test]
fn test_rapid_samples_are_dropped() {
    let mut engine = engine();
    let t0 = Instant::now();
    engine.pointer_move(&PointerEvent::new(170.0, 140.0), t0);

    // 5 ms later the throttle drops the sample, so hover is unchanged.
    assert!(!engine.pointer_move(&PointerEvent::new(900.0, 900.0), t0 + Duration::from_millis(5)));
    assert_eq!(engine.hovered(), Some(&ShapeId::from("trend")));
}

#[test]
fn test_pointer_leave_clears_hover() {
    let mut engine = engine();
    engine.hover_at(PixelPoint::new(150.0, 100.0));
    assert!(engine.hovered().is_some());
    assert!(engine.pointer_leave());
    assert!(engine.hovered().is_none());
    assert!(!engine.pointer_leave());
}

#[test]
fn test_samples_outside_bands_clear_hover() {
    let mut engine = engine();
    engine.hover_at(PixelPoint::new(150.0, 100.0));
    engine.hover_at(PixelPoint::new(1200.0, 100.0));
    assert!(engine.hovered().is_none());
}

#[test]
fn test_indicator_panel_shapes_are_hit_in_their_own_space() {
    let mut engine = engine();
    // y2 = 50 sits at 420 + 50 px.
    engine.hover_at(PixelPoint::new(500.0, 468.0));
    assert_eq!(engine.hovered(), Some(&ShapeId::from("rsi")));
}

#[test]
fn test_modifier_click_builds_multi_selection() {
    let mut engine = engine();
    assert!(engine.click(&PointerEvent::new(170.0, 140.0)));
    assert!(engine.click(&PointerEvent::new(520.0, 510.0).with_modifiers(Modifiers::shift())));

    let summary = engine.selection_summary();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.ids, vec!["trend", "rsi"]);

    let batch = engine.render_engine().last_batch().expect("batch");
    assert_eq!(batch.state_of(&ShapeId::from("trend")), Some(VisualState::Selected));
    assert_eq!(batch.state_of(&ShapeId::from("rsi")), Some(VisualState::Active));

    // Click in empty space deselects all, modifier or not.
    assert!(engine.click(&PointerEvent::new(700.0, 40.0).with_modifiers(Modifiers::shift())));
    assert!(engine.selection().is_empty());
}

#[test]
fn test_events_outside_the_chart_are_ignored() {
    let mut engine = engine();
    assert!(!engine.click(&PointerEvent::new(170.0, 140.0).outside()));
    assert!(engine.selection().is_empty());
}

#[test]
fn test_remove_shapes_heals_state() {
    let mut engine = engine();
    engine.select_shape(&ShapeId::from("trend"), false);
    engine.hover_at(PixelPoint::new(150.0, 100.0));

    let removed = engine.remove_shapes(&[ShapeId::from("trend"), ShapeId::from("missing")]);
    assert_eq!(removed, vec![ShapeId::from("trend")]);
    assert!(engine.selection().is_empty());
    assert!(engine.hovered().is_none());
    assert_eq!(engine.registry().len(), 2);
}

#[test]
fn test_remove_and_deselect_all_restyles_once() {
    let mut engine = engine();
    engine.select_all();
    engine.render_engine_mut().take_batches();

    let removed = engine.remove_and_deselect_all(&[ShapeId::from("trend")]);
    assert_eq!(removed, vec![ShapeId::from("trend")]);
    assert!(engine.selection().is_empty());
    assert!(engine.registry().contains(&ShapeId::from("rsi")));
    assert_eq!(engine.render_engine().batches().len(), 1);
}

#[test]
fn test_render_pass_restyles_with_one_batch() {
    let mut engine = engine();
    engine.render_engine_mut().take_batches();
    engine.render_engine_mut().set_domain("x", (0.0, 5000.0));
    engine.on_render_pass();
    assert_eq!(engine.render_engine().batches().len(), 1);
}

#[test]
fn test_hit_tolerance_is_constant_in_pixels_across_zoom() {
    let mut engine = engine();
    // Zoom x in by 2: the segment now spans 200..400 px.
    engine.render_engine_mut().set_domain("x", (0.0, 5000.0));
    engine.on_render_pass();
    assert!(engine.hover_at(PixelPoint::new(300.0, 112.0)));
    assert!(engine.hover_at(PixelPoint::new(300.0, 130.0)));
    assert!(engine.hovered().is_none());
}

#[test]
fn test_patch_geometry_returns_previous() {
    let mut engine = engine();
    let previous = engine
        .patch_geometry(&ShapeId::from("trend"), ShapeGeometry::line(0.0, 10.0, 500.0, 12.0))
        .expect("patched");
    assert_eq!(previous, ShapeGeometry::line(1000.0, 10.0, 2000.0, 20.0));
    assert!(engine
        .patch_geometry(&ShapeId::from("missing"), ShapeGeometry::line(0.0, 0.0, 0.0, 0.0))
        .is_none());
}

#[test]
fn test_data_at_reports_subplot_coordinates() {
    let engine = engine();
    let (subplot, point) = engine.data_at(PixelPoint::new(150.0, 100.0)).expect("inside");
    assert_eq!(subplot, AxisRef::primary());
    assert!((point.x - 1500.0).abs() < 1e-9);
    assert!((point.y - 15.0).abs() < 1e-9);
}
