//! Drag Guard: one shared flag suspending hit-testing while a shape drag
//! owned by the rendering engine is in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheaply cloneable; every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct DragGuard {
    dragging: Arc<AtomicBool>,
}

impl DragGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        self.dragging.store(true, Ordering::SeqCst);
    }

    pub fn end(&self) {
        self.dragging.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }
}
