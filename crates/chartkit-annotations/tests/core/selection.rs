use chartkit_annotations::{Direction, SelectionState, Shape, ShapeId, ShapeRegistry};
use proptest::prelude::*;

#[test]
fn test_next_wraps_from_c_to_a() {
    let mut selection = SelectionState::new();
    for id in ["A", "B", "C"] {
        selection.select_shape(ShapeId::from(id), true);
    }
    assert_eq!(selection.last(), Some(&ShapeId::from("C")));

    selection.navigate(Direction::Next);
    assert_eq!(selection.last(), Some(&ShapeId::from("A")));
    assert_eq!(selection.len(), 3);
}

#[test]
fn test_deselect_all_is_idempotent() {
    let mut selection = SelectionState::new();
    selection.select_shape(ShapeId::from("A"), false);

    selection.deselect_all();
    let once = selection.clone();
    selection.deselect_all();
    assert_eq!(selection, once);
    assert!(selection.is_empty());
    assert!(selection.last().is_none());
}

#[test]
fn test_select_all_on_empty_registry() {
    let mut selection = SelectionState::new();
    selection.select_all(&ShapeRegistry::new());
    assert!(selection.is_empty());
    assert!(selection.last().is_none());
}

#[test]
fn test_select_all_keeps_existing_members_once() {
    let registry = ShapeRegistry::from_shapes(vec![
        Shape::line("A", 0.0, 0.0, 1.0, 1.0),
        Shape::line("B", 0.0, 0.0, 1.0, 1.0),
    ]);
    let mut selection = SelectionState::new();
    selection.select_shape(ShapeId::from("B"), false);
    selection.select_all(&registry);
    assert_eq!(selection.ids(), &[ShapeId::from("B"), ShapeId::from("A")]);
    assert_eq!(selection.last(), Some(&ShapeId::from("B")));
}

proptest! {
    #[test]
    fn prop_select_then_deselect_round_trips(ids in proptest::collection::vec("[a-e]", 0..6), extra in "[f-h]") {
        let mut selection = SelectionState::new();
        for id in &ids {
            selection.select_shape(ShapeId::from(id.as_str()), true);
        }
        let before = selection.clone();

        let extra = ShapeId::from(extra.as_str());
        selection.select_shape(extra.clone(), true);
        selection.deselect_shape(&extra);

        prop_assert_eq!(selection.ids(), before.ids());
        // last is always a member or None
        prop_assert!(selection.last().is_none_or(|l| selection.contains(l)));
    }

    #[test]
    fn prop_navigation_never_changes_membership(n in 2usize..8, steps in proptest::collection::vec(any::<bool>(), 0..20)) {
        let mut selection = SelectionState::new();
        for i in 0..n {
            selection.select_shape(ShapeId::new(format!("s{i}")), true);
        }
        let ids = selection.ids().to_vec();
        for forward in steps {
            selection.navigate(if forward { Direction::Next } else { Direction::Previous });
            prop_assert!(selection.last().is_some_and(|l| selection.contains(l)));
        }
        prop_assert_eq!(selection.ids(), ids.as_slice());
    }
}
