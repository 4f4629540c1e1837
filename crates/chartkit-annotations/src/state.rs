//! Transient interaction state owned by one engine instance.
//!
//! Nothing here is persisted; it is reset when the registry is replaced.

use crate::drag_guard::DragGuard;
use crate::hover::HoverController;
use crate::selection::SelectionState;
use crate::shapes::ShapeId;
use crate::throttle::PointerThrottle;

#[derive(Debug, Clone, Default)]
pub struct AnnotationEngineState {
    pub hover: HoverController,
    pub selection: SelectionState,
    pub drag: DragGuard,
    pub throttle: PointerThrottle,
}

impl AnnotationEngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle(throttle: PointerThrottle) -> Self {
        Self {
            throttle,
            ..Self::default()
        }
    }

    /// Clears hover and selection.
    pub fn reset(&mut self) {
        self.hover.clear();
        self.selection.deselect_all();
        self.throttle.reset();
    }

    /// Forgets removed shapes.
    pub fn forget(&mut self, ids: &[ShapeId]) {
        if self.hover.current().is_some_and(|h| ids.contains(h)) {
            self.hover.clear();
        }
        self.selection.remove_ids(ids);
    }
}
