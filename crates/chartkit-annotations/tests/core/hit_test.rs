use chartkit_annotations::{
    AxisRef, AxisSpec, HitMode, HitTester, HitThresholds, Shape, ShapeRegistry, SnapshotEngine,
};
use chartkit_core::PixelPoint;
use proptest::prelude::*;

/// x: 1000 -> 100 px, 2000 -> 200 px. y: 10 -> 50 px, 20 -> 150 px.
fn scenario_engine() -> SnapshotEngine {
    SnapshotEngine::with_axes(vec![
        AxisSpec::x("x", 0, 0.0, 1000.0, (0.0, 10000.0)).anchored_to("y"),
        AxisSpec::y("y", 0, 0.0, 400.0, (10.0, 20.0)).with_range((50.0, 150.0)),
    ])
}

#[test]
fn test_on_segment_sample_is_hovered() {
    let engine = scenario_engine();
    let registry = ShapeRegistry::from_shapes(vec![Shape::line("trend", 1000.0, 10.0, 2000.0, 20.0)]);
    let tester = HitTester::new(&engine, HitThresholds::default());

    let hit = tester
        .nearest(&registry, &AxisRef::primary(), PixelPoint::new(150.0, 100.0), HitMode::Hover)
        .expect("on-segment sample must hit");
    assert_eq!(hit.id.as_str(), "trend");
    assert!(hit.distance_sq < 1e-9);

    assert!(tester
        .nearest(&registry, &AxisRef::primary(), PixelPoint::new(150.0, 300.0), HitMode::Hover)
        .is_none());
}

#[test]
fn test_system_shape_is_never_hit() {
    let engine = scenario_engine();
    let registry = ShapeRegistry::from_shapes(vec![Shape::system_line(1000.0, 10.0, 2000.0, 20.0)]);
    let tester = HitTester::new(&engine, HitThresholds::default());

    for mode in [HitMode::Hover, HitMode::Click] {
        assert!(tester
            .nearest(&registry, &AxisRef::primary(), PixelPoint::new(150.0, 100.0), mode)
            .is_none());
    }
}

#[test]
fn test_thresholds_from_pixels() {
    let t = HitThresholds::default();
    assert_eq!((t.hover_sq, t.click_sq, t.marker_sq), (225.0, 400.0, 900.0));
    assert_eq!(HitThresholds::from_pixels(5.0, 6.0, 7.0).click_sq, 36.0);
}

fn flat_engine() -> SnapshotEngine {
    SnapshotEngine::with_axes(vec![
        AxisSpec::x("x", 0, 0.0, 400.0, (0.0, 400.0)).anchored_to("y"),
        AxisSpec::y("y", 0, 0.0, 400.0, (0.0, 400.0)).with_range((0.0, 400.0)),
    ])
}

proptest! {
    #[test]
    fn prop_nearest_is_the_minimum_under_threshold(
        ys in proptest::collection::vec(0u32..400, 1..12),
        sample_y in 0u32..400,
    ) {
        let engine = flat_engine();
        let shapes: Vec<Shape> = ys
            .iter()
            .enumerate()
            .map(|(i, y)| Shape::line(format!("s{i}"), 0.0, *y as f64, 400.0, *y as f64))
            .collect();
        let registry = ShapeRegistry::from_shapes(shapes);
        let tester = HitTester::new(&engine, HitThresholds::default());

        let sample = PixelPoint::new(200.0, sample_y as f64);
        let hit = tester.nearest(&registry, &AxisRef::primary(), sample, HitMode::Hover);

        let mut expected: Option<(usize, f64)> = None;
        for (i, y) in ys.iter().enumerate() {
            let d = (*y as f64 - sample_y as f64).powi(2);
            let bound = expected.map_or(225.0, |(_, best)| best);
            if d < bound {
                expected = Some((i, d));
            }
        }

        prop_assert_eq!(hit.map(|h| h.index), expected.map(|(i, _)| i));
    }
}
