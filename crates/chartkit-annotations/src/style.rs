//! Visual states and the batched style update handed to the rendering engine.

use serde::{Deserialize, Serialize};

use crate::shapes::{LineStyle, MarkerStyle, ShapeId};

/// Visual state of one shape, derived from hover and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    #[default]
    Default,
    Hovered,
    Selected,
    /// Selected and `last_selected` of a multi-selection.
    Active,
}

impl VisualState {
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Active)
    }
}

/// Colour and width override for a non-default visual state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }

    /// Applies the override on top of a base line style, keeping its dash.
    pub fn apply_to(&self, base: &LineStyle) -> LineStyle {
        LineStyle {
            color: self.color.clone(),
            width: self.width,
            dash: base.dash,
        }
    }
}

/// Styles used by the reconciler for each visual state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTheme {
    pub hover: StrokeStyle,
    pub selected: StrokeStyle,
    pub active: StrokeStyle,
    /// Grab handles attached to user lines.
    pub marker: MarkerStyle,
}

impl Default for VisualTheme {
    fn default() -> Self {
        Self {
            hover: StrokeStyle::new("#ffb74d", 3.0),
            selected: StrokeStyle::new("#ff9800", 3.0),
            active: StrokeStyle::new("#ffeb3b", 4.0),
            marker: MarkerStyle::default(),
        }
    }
}

impl VisualTheme {
    /// Resolves the effective line style for a shape in `state`.
    pub fn line_for(&self, state: VisualState, base: &LineStyle) -> LineStyle {
        match state {
            VisualState::Default => base.clone(),
            VisualState::Hovered => self.hover.apply_to(base),
            VisualState::Selected => self.selected.apply_to(base),
            VisualState::Active => self.active.apply_to(base),
        }
    }
}

/// Style of one registry entry after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleUpdate {
    /// Position in the registry.
    pub index: usize,
    pub id: Option<ShapeId>,
    pub line: LineStyle,
    pub editable: bool,
    pub marker: Option<MarkerStyle>,
    pub state: VisualState,
}

/// All style updates of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleBatch {
    /// Registry generation the batch was computed from.
    pub generation: u64,
    pub updates: Vec<StyleUpdate>,
}

impl StyleBatch {
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn get(&self, id: &ShapeId) -> Option<&StyleUpdate> {
        self.updates.iter().find(|u| u.id.as_ref() == Some(id))
    }

    pub fn state_of(&self, id: &ShapeId) -> Option<VisualState> {
        self.get(id).map(|u| u.state)
    }
}
