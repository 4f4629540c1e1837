//! Visual State Reconciler.
//!
//! Derives every user shape's style from hover and selection alone and hands
//! the rendering engine exactly one [`StyleBatch`] per pass. Stale hover or
//! selection references are healed at the start of each pass.

use crate::axis::RenderEngineAdapter;
use crate::registry::ShapeRegistry;
use crate::shapes::{Shape, ShapeId};
use crate::state::AnnotationEngineState;
use crate::style::{StyleBatch, StyleUpdate, VisualState, VisualTheme};

/// What one reconciliation pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub batch: StyleBatch,
    /// Hover id cleared because its shape is gone.
    pub healed_hover: Option<ShapeId>,
    /// Selected ids dropped because their shapes are gone.
    pub healed_selection: Vec<ShapeId>,
}

impl Reconciliation {
    pub fn healed(&self) -> bool {
        self.healed_hover.is_some() || !self.healed_selection.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisualStateReconciler {
    theme: VisualTheme,
}

impl VisualStateReconciler {
    pub fn new(theme: VisualTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &VisualTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: VisualTheme) {
        self.theme = theme;
    }

    /// Visual state of one shape.
    pub fn state_for(shape: &Shape, state: &AnnotationEngineState) -> VisualState {
        let Some(id) = shape.id.as_ref().filter(|_| shape.is_interactive()) else {
            return VisualState::Default;
        };
        let selection = &state.selection;
        if selection.contains(id) {
            if selection.len() > 1 && selection.is_last(id) {
                VisualState::Active
            } else {
                VisualState::Selected
            }
        } else if state.hover.is_hovered(id) {
            VisualState::Hovered
        } else {
            VisualState::Default
        }
    }

    /// Runs one pass and applies the resulting batch to `engine`.
    pub fn reconcile<E: RenderEngineAdapter + ?Sized>(
        &self,
        engine: &mut E,
        registry: &mut ShapeRegistry,
        state: &mut AnnotationEngineState,
    ) -> Reconciliation {
        let healed_hover = state.hover.heal(registry);
        let healed_selection = state.selection.retain_present(registry);
        if let Some(id) = &healed_hover {
            tracing::debug!("cleared stale hover {}", id);
        }
        if !healed_selection.is_empty() {
            tracing::debug!("dropped {} stale selected ids", healed_selection.len());
        }

        let mut updates = Vec::with_capacity(registry.len());
        for (index, shape) in registry.iter_mut().enumerate() {
            if shape.is_system_shape {
                continue;
            }
            let visual = Self::state_for(shape, state);
            shape.editable = visual.is_selected();
            if shape.geometry.is_line() && shape.marker.is_none() {
                shape.marker = Some(self.theme.marker.clone());
            }
            updates.push(StyleUpdate {
                index,
                id: shape.id.clone(),
                line: self.theme.line_for(visual, &shape.style),
                editable: shape.editable,
                marker: shape.marker.clone(),
                state: visual,
            });
        }

        let batch = StyleBatch {
            generation: registry.generation(),
            updates,
        };
        engine.apply_styles(batch.clone());

        Reconciliation {
            batch,
            healed_hover,
            healed_selection,
        }
    }
}
