//! The annotation engine façade.
//!
//! [`AnnotationEngine`] owns the Shape Registry, the interaction state, and
//! the rendering engine adapter. Every mutation that changes what the user
//! sees ends in exactly one reconciliation pass.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chartkit_core::{DataPoint, DrawingsError, EventBus, PixelPoint};
use serde::Serialize;

use crate::axis::{AxisRef, RenderEngineAdapter};
use crate::drag_guard::DragGuard;
use crate::drawings::{DrawingsMessage, SubplotDirectory};
use crate::hit_test::{Hit, HitMode, HitTester, HitThresholds};
use crate::hover::DEFAULT_BOUNDS_TOLERANCE;
use crate::input::{command_for, ContainerRect, EngineCommand, KeyInput, PointerEvent};
use crate::locator;
use crate::reconciler::{Reconciliation, VisualStateReconciler};
use crate::registry::ShapeRegistry;
use crate::selection::{Direction, SelectionState};
use crate::shapes::{Shape, ShapeGeometry, ShapeId};
use crate::state::AnnotationEngineState;
use crate::style::VisualTheme;
use crate::throttle::{PointerThrottle, DEFAULT_INTERVAL};
use crate::transform::CoordinateAdapter;

/// Controls listed to the user.
pub const HELP_TEXT: &str = "\
Click a drawing to select it; click empty space to clear the selection.
Shift/Ctrl/Cmd + click adds or removes a drawing from the selection.
Left/Up and Right/Down cycle the active drawing within a multi-selection.
Delete or Backspace deletes every selected drawing.
Escape clears the selection.
Ctrl/Cmd + A selects every drawing.";

/// Tunables of one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub thresholds: HitThresholds,
    /// Pixel tolerance around subplot bands before hover is force-cleared.
    pub bounds_tolerance: f64,
    pub throttle_interval: Duration,
    pub theme: VisualTheme,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            thresholds: HitThresholds::default(),
            bounds_tolerance: DEFAULT_BOUNDS_TOLERANCE,
            throttle_interval: DEFAULT_INTERVAL,
            theme: VisualTheme::default(),
        }
    }
}

/// Selection count and ids for the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub count: usize,
    pub ids: Vec<String>,
}

/// The shape single-target panels act on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveShape {
    pub id: ShapeId,
    pub index: usize,
    pub shape: Shape,
}

/// Result of applying a `drawings` message.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingsOutcome {
    pub applied: usize,
    pub skipped: usize,
}

pub struct AnnotationEngine<E: RenderEngineAdapter> {
    render: E,
    registry: ShapeRegistry,
    state: AnnotationEngineState,
    reconciler: VisualStateReconciler,
    settings: EngineSettings,
    container: ContainerRect,
    directory: SubplotDirectory,
    symbol: Option<String>,
    bus: Arc<EventBus>,
}

impl<E: RenderEngineAdapter> AnnotationEngine<E> {
    pub fn new(render: E, settings: EngineSettings) -> Self {
        Self::with_bus(render, settings, Arc::new(EventBus::new()))
    }

    pub fn with_bus(render: E, settings: EngineSettings, bus: Arc<EventBus>) -> Self {
        Self {
            render,
            registry: ShapeRegistry::new(),
            state: AnnotationEngineState::with_throttle(PointerThrottle::new(settings.throttle_interval)),
            reconciler: VisualStateReconciler::new(settings.theme.clone()),
            settings,
            container: ContainerRect::default(),
            directory: SubplotDirectory::default(),
            symbol: None,
            bus,
        }
    }

    pub fn render_engine(&self) -> &E {
        &self.render
    }

    /// Mutable access for the host's redraws; follow with
    /// [`on_render_pass`](Self::on_render_pass).
    pub fn render_engine_mut(&mut self) -> &mut E {
        &mut self.render
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn state(&self) -> &AnnotationEngineState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.state.selection
    }

    pub fn hovered(&self) -> Option<&ShapeId> {
        self.state.hover.current()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.state.throttle = PointerThrottle::new(settings.throttle_interval);
        self.reconciler.set_theme(settings.theme.clone());
        self.settings = settings;
        self.reconcile();
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn set_container(&mut self, container: ContainerRect) {
        self.container = container;
    }

    pub fn directory(&self) -> &SubplotDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut SubplotDirectory {
        &mut self.directory
    }

    /// Shared handle the rendering engine flips around drags.
    pub fn drag_guard(&self) -> DragGuard {
        self.state.drag.clone()
    }

    /// Switches the chart to another symbol, dropping every user shape.
    pub fn set_symbol(&mut self, symbol: &str) {
        if self.symbol.as_deref() == Some(symbol) {
            return;
        }
        tracing::info!("Switching annotations to {}", symbol);
        self.symbol = Some(symbol.to_string());
        self.clear_all_shapes();
    }

    // ------------------------------------------------------------------
    // Pointer and keyboard input

    /// Throttled pointer move. Returns whether the hovered shape changed.
    pub fn pointer_move(&mut self, event: &PointerEvent, now: Instant) -> bool {
        if self.state.drag.is_active() {
            return false;
        }
        let Some(sample) = event.sample(&self.container) else {
            return false;
        };
        if !self.state.throttle.try_begin(now) {
            return false;
        }
        let changed = self.track_hover(sample);
        self.state.throttle.finish();
        changed
    }

    /// Hover update for a paper-space sample, bypassing the throttle.
    pub fn hover_at(&mut self, sample: PixelPoint) -> bool {
        if self.state.drag.is_active() {
            return false;
        }
        self.track_hover(sample)
    }

    fn track_hover(&mut self, sample: PixelPoint) -> bool {
        let previous = self.state.hover.current().cloned();
        let changed = self.state.hover.track(
            &self.render,
            &self.registry,
            sample,
            self.settings.thresholds,
            self.settings.bounds_tolerance,
        );
        if changed {
            self.publish_hover(previous);
            self.reconcile();
        }
        changed
    }

    /// The pointer left the chart container.
    pub fn pointer_leave(&mut self) -> bool {
        self.state.throttle.reset();
        let previous = self.state.hover.current().cloned();
        if !self.state.hover.clear() {
            return false;
        }
        self.publish_hover(previous);
        self.reconcile();
        true
    }

    /// Click or tap. Returns whether the selection changed.
    pub fn click(&mut self, event: &PointerEvent) -> bool {
        let Some(sample) = event.sample(&self.container) else {
            return false;
        };
        self.click_at(sample, event.modifiers.additive())
    }

    pub fn click_at(&mut self, sample: PixelPoint, additive: bool) -> bool {
        if self.state.drag.is_active() {
            return false;
        }
        let hit = self.hit_at(sample, HitMode::Click).map(|h| h.id);
        tracing::debug!("click at ({:.1}, {:.1}) hit {:?}", sample.x, sample.y, hit);
        let before = self.state.selection.clone();
        self.state.selection.click(hit, additive);
        self.finish_selection_change(before)
    }

    /// Nearest shape under a paper-space sample.
    pub fn hit_at(&self, sample: PixelPoint, mode: HitMode) -> Option<Hit> {
        let axes = self.render.axes()?;
        let subplot = locator::locate_with_tolerance(sample, axes, self.settings.bounds_tolerance)?;
        HitTester::new(&self.render, self.settings.thresholds).nearest(&self.registry, &subplot, sample, mode)
    }

    /// Subplot and data coordinates under a paper-space sample.
    pub fn data_at(&self, sample: PixelPoint) -> Option<(AxisRef, DataPoint)> {
        let axes = self.render.axes()?;
        let subplot = locator::locate(sample, axes)?;
        let adapter = CoordinateAdapter::new(&self.render);
        let pair = adapter.pair(&subplot).ok()?;
        let point = adapter.data_of(&pair, sample).ok()?;
        Some((subplot, point))
    }

    /// Maps a key press and applies it. `DeleteSelected` is only returned;
    /// deleting is the synchronizer's job.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<EngineCommand> {
        let command = command_for(input)?;
        self.execute(command);
        Some(command)
    }

    /// Applies a synchronous command. Returns whether state changed.
    pub fn execute(&mut self, command: EngineCommand) -> bool {
        match command {
            EngineCommand::SelectPrevious => self.navigate(Direction::Previous),
            EngineCommand::SelectNext => self.navigate(Direction::Next),
            EngineCommand::ClearSelection => self.deselect_all(),
            EngineCommand::SelectAll => self.select_all(),
            EngineCommand::DeleteSelected => false,
        }
    }

    pub fn drag_started(&self) {
        self.state.drag.begin();
    }

    pub fn drag_ended(&self) {
        self.state.drag.end();
    }

    // ------------------------------------------------------------------
    // Selection

    /// Selects an interactive shape. Unknown or system ids are ignored.
    pub fn select_shape(&mut self, id: &ShapeId, additive: bool) -> bool {
        if !self.registry.is_interactive(id) {
            tracing::debug!("ignoring selection of non-interactive {}", id);
            return false;
        }
        let before = self.state.selection.clone();
        self.state.selection.select_shape(id.clone(), additive);
        self.finish_selection_change(before)
    }

    pub fn deselect_shape(&mut self, id: &ShapeId) -> bool {
        let before = self.state.selection.clone();
        self.state.selection.deselect_shape(id);
        self.finish_selection_change(before)
    }

    pub fn deselect_all(&mut self) -> bool {
        let before = self.state.selection.clone();
        self.state.selection.deselect_all();
        self.finish_selection_change(before)
    }

    pub fn select_all(&mut self) -> bool {
        let before = self.state.selection.clone();
        self.state.selection.select_all(&self.registry);
        self.finish_selection_change(before)
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        let before = self.state.selection.clone();
        self.state.selection.navigate(direction);
        self.finish_selection_change(before)
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.state.selection.ids().to_vec()
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        let ids: Vec<String> = self.state.selection.ids().iter().map(|id| id.to_string()).collect();
        SelectionSummary {
            count: ids.len(),
            ids,
        }
    }

    /// The last selected shape with its registry index.
    pub fn active_shape(&self) -> Option<ActiveShape> {
        let id = self.state.selection.last()?;
        let index = self.registry.index_of(id)?;
        Some(ActiveShape {
            id: id.clone(),
            index,
            shape: self.registry.shapes()[index].clone(),
        })
    }

    // ------------------------------------------------------------------
    // Registry

    /// Replaces every shape, clearing hover and selection.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        let had_selection = !self.state.selection.is_empty();
        let previous_hover = self.state.hover.current().cloned();
        self.registry.replace(shapes);
        self.state.reset();
        tracing::info!("Registry replaced with {} shapes", self.registry.len());
        self.bus.shapes_replaced(self.registry.len());
        if previous_hover.is_some() {
            self.publish_hover(previous_hover);
        }
        if had_selection {
            self.publish_selection();
        }
        self.reconcile();
    }

    /// Applies a push-channel message.
    ///
    /// A full message replaces user shapes and keeps engine overlays; an
    /// incremental one upserts by id and keeps the selection of ids still
    /// present. Messages for another symbol are ignored.
    pub fn apply_drawings(&mut self, message: &DrawingsMessage) -> DrawingsOutcome {
        if let Some(symbol) = &self.symbol {
            if *symbol != message.symbol {
                tracing::debug!("ignoring drawings for {} while showing {}", message.symbol, symbol);
                return DrawingsOutcome {
                    applied: 0,
                    skipped: message.drawings.len(),
                };
            }
        }

        let converted = message.convert(&self.directory);
        for (id, err) in &converted.skipped {
            tracing::warn!("Skipping drawing {:?}: {}", id, err);
            self.bus.drawings_rejected(err);
        }
        let outcome = DrawingsOutcome {
            applied: converted.shapes.len(),
            skipped: converted.skipped.len(),
        };

        if message.incremental {
            for shape in converted.shapes {
                self.registry.upsert(shape);
            }
            self.bus.shapes_replaced(self.registry.len());
            self.reconcile();
        } else {
            let mut shapes: Vec<Shape> = self.registry.system_shapes().cloned().collect();
            shapes.extend(converted.shapes);
            self.replace_shapes(shapes);
        }
        outcome
    }

    /// Parses and applies a raw push-channel message.
    pub fn apply_drawings_json(&mut self, json: &str) -> Result<DrawingsOutcome, DrawingsError> {
        match DrawingsMessage::parse(json) {
            Ok(message) => Ok(self.apply_drawings(&message)),
            Err(err) => {
                tracing::warn!("Rejected drawings message: {}", err);
                self.bus.drawings_rejected(&err);
                Err(err)
            }
        }
    }

    /// Adds one shape, e.g. at the end of a drawing gesture.
    pub fn add_shape(&mut self, shape: Shape) {
        self.registry.upsert(shape);
        self.reconcile();
    }

    /// Removes shapes in one batch, forgetting them in hover and selection.
    pub fn remove_shapes(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let removed = self.registry.remove_ids(ids);
        if removed.is_empty() {
            return removed;
        }
        let before = self.state.selection.clone();
        let previous_hover = self.state.hover.current().cloned();
        self.state.forget(&removed);
        if self.state.hover.current().is_none() && previous_hover.is_some() {
            self.publish_hover(previous_hover);
        }
        self.bus.shapes_removed(removed.iter().map(|id| id.to_string()).collect());
        if before != self.state.selection {
            self.publish_selection();
        }
        self.reconcile();
        removed
    }

    /// Removes `ids`, then clears hover and selection, in a single
    /// reconciliation pass with one selection event.
    pub fn remove_and_deselect_all(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let removed = self.registry.remove_ids(ids);
        let had_selection = !self.state.selection.is_empty();
        let previous_hover = self.state.hover.current().cloned();
        self.state.hover.clear();
        self.state.selection.deselect_all();

        if previous_hover.is_some() {
            self.publish_hover(previous_hover);
        }
        if !removed.is_empty() {
            self.bus.shapes_removed(removed.iter().map(|id| id.to_string()).collect());
        }
        if had_selection {
            self.publish_selection();
        }
        self.reconcile();
        removed
    }

    /// Drops every user shape and all transient state.
    pub fn clear_all_shapes(&mut self) {
        let had_selection = !self.state.selection.is_empty();
        let removed = self.registry.clear_user_shapes();
        self.state.reset();
        tracing::info!("Cleared {} shapes", removed);
        self.bus.registry_cleared();
        if had_selection {
            self.publish_selection();
        }
        self.reconcile();
    }

    /// Replaces a shape's geometry, returning the previous one.
    pub fn patch_geometry(&mut self, id: &ShapeId, geometry: ShapeGeometry) -> Option<ShapeGeometry> {
        let previous = self.registry.set_geometry(id, geometry)?;
        self.bus.shape_patched(id);
        self.reconcile();
        Some(previous)
    }

    /// Merges non-geometric properties into a shape's metadata.
    pub fn patch_properties(
        &mut self,
        id: &ShapeId,
        properties: serde_json::Map<String, serde_json::Value>,
        resolution: Option<String>,
    ) -> bool {
        let Some(shape) = self.registry.get_mut(id) else {
            return false;
        };
        shape.meta.properties.extend(properties);
        if resolution.is_some() {
            shape.meta.resolution = resolution;
        }
        self.bus.shape_patched(id);
        true
    }

    // ------------------------------------------------------------------
    // Rendering

    /// The rendering engine finished a redraw: heal and restyle.
    pub fn on_render_pass(&mut self) -> Reconciliation {
        self.reconcile()
    }

    /// Runs one reconciliation pass.
    pub fn reconcile(&mut self) -> Reconciliation {
        let pass = self
            .reconciler
            .reconcile(&mut self.render, &mut self.registry, &mut self.state);
        if let Some(previous) = &pass.healed_hover {
            self.publish_hover(Some(previous.clone()));
        }
        if !pass.healed_selection.is_empty() {
            self.publish_selection();
        }
        pass
    }

    fn finish_selection_change(&mut self, before: SelectionState) -> bool {
        if before == self.state.selection {
            return false;
        }
        tracing::debug!(
            "selection {} -> {} (active {:?})",
            before.len(),
            self.state.selection.len(),
            self.state.selection.last()
        );
        self.publish_selection();
        self.reconcile();
        true
    }

    fn publish_selection(&self) {
        let selection = &self.state.selection;
        self.bus.selection_changed(
            selection.ids().iter().map(|id| id.to_string()).collect(),
            selection.last().map(|id| id.to_string()),
        );
    }

    fn publish_hover(&self, previous: Option<ShapeId>) {
        match self.state.hover.current() {
            Some(id) => self.bus.hover_entered(id),
            None => self.bus.hover_cleared(previous.map(|id| id.to_string())),
        }
    }
}

impl<E: RenderEngineAdapter + std::fmt::Debug> std::fmt::Debug for AnnotationEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEngine")
            .field("render", &self.render)
            .field("shapes", &self.registry.len())
            .field("selected", &self.state.selection.len())
            .field("hovered", &self.state.hover.current())
            .field("symbol", &self.symbol)
            .finish()
    }
}
