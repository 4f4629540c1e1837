//! Hover Controller.
//!
//! Owns the single hovered shape id. A pointer sample is located, then hit
//! tested with the hover threshold; the controller reports whether the
//! hovered id changed so the caller reconciles only on change.

use chartkit_core::PixelPoint;

use crate::axis::RenderEngineAdapter;
use crate::hit_test::{HitMode, HitTester, HitThresholds};
use crate::locator;
use crate::registry::ShapeRegistry;
use crate::shapes::ShapeId;

/// Pixel tolerance around subplot bands before hover is force-cleared.
pub const DEFAULT_BOUNDS_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverController {
    current: Option<ShapeId>,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ShapeId> {
        self.current.as_ref()
    }

    pub fn is_hovered(&self, id: &ShapeId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Sets the hovered id, returning true when it changed.
    pub fn set(&mut self, candidate: Option<ShapeId>) -> bool {
        if self.current == candidate {
            return false;
        }
        tracing::debug!("hover {:?} -> {:?}", self.current, candidate);
        self.current = candidate;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }

    /// Runs locator and hit tester for one pointer sample.
    ///
    /// Outside every subplot band (widened by `bounds_tolerance`) hover is
    /// cleared; so it is before the first render pass.
    pub fn track<E: RenderEngineAdapter + ?Sized>(
        &mut self,
        engine: &E,
        registry: &ShapeRegistry,
        sample: PixelPoint,
        thresholds: HitThresholds,
        bounds_tolerance: f64,
    ) -> bool {
        let Some(axes) = engine.axes() else {
            return self.clear();
        };
        let Some(subplot) = locator::locate_with_tolerance(sample, axes, bounds_tolerance) else {
            return self.clear();
        };
        let candidate = HitTester::new(engine, thresholds)
            .nearest(registry, &subplot, sample, HitMode::Hover)
            .map(|hit| hit.id);
        self.set(candidate)
    }

    /// Drops a hover id that no longer names an interactive shape.
    ///
    /// Returns the stale id when one was cleared.
    pub fn heal(&mut self, registry: &ShapeRegistry) -> Option<ShapeId> {
        match &self.current {
            Some(id) if !registry.is_interactive(id) => self.current.take(),
            _ => None,
        }
    }
}
