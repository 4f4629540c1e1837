use chartkit_annotations::locator::{locate, within_tolerance};
use chartkit_annotations::{AxisRef, AxisSpec, CoordinateAdapter, SnapshotEngine};
use chartkit_core::PixelPoint;

fn panels() -> Vec<AxisSpec> {
    vec![
        AxisSpec::x("x", 0, 60.0, 700.0, (0.0, 100.0)).anchored_to("y"),
        AxisSpec::y("y", 0, 10.0, 400.0, (100.0, 200.0)),
        AxisSpec::x("x2", 1, 60.0, 700.0, (0.0, 100.0)).anchored_to("y2"),
        AxisSpec::y("y2", 1, 430.0, 150.0, (0.0, 100.0)),
    ]
}

#[test]
fn test_indicator_panel_is_located() {
    let axes = panels();
    assert_eq!(locate(PixelPoint::new(300.0, 500.0), &axes), Some(AxisRef::new("x2", "y2")));
    assert_eq!(locate(PixelPoint::new(300.0, 200.0), &axes), Some(AxisRef::primary()));
}

#[test]
fn test_outside_every_band() {
    let axes = panels();
    for sample in [
        PixelPoint::new(300.0, 595.0),
        PixelPoint::new(30.0, 200.0),
        PixelPoint::new(800.0, 200.0),
    ] {
        assert!(!within_tolerance(sample, &axes, 10.0), "{sample:?}");
    }
}

#[test]
fn test_axis_pairs_follow_index_order() {
    let engine = SnapshotEngine::with_axes(panels());
    let pairs = CoordinateAdapter::new(&engine).axis_pairs().expect("pairs");
    let refs: Vec<AxisRef> = pairs.iter().map(|p| p.axis_ref()).collect();
    assert_eq!(refs, vec![AxisRef::primary(), AxisRef::new("x2", "y2")]);
}
