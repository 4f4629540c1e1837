//! Raw input normalisation.
//!
//! Pointer events arrive with client coordinates; subtracting the chart
//! container's top-left corner yields a paper-space sample. Keyboard events
//! map onto [`EngineCommand`]s.

use chartkit_core::PixelPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Modifier that turns a click into an additive selection.
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn platform(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Element the event was dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerTarget {
    /// The chart drawing area or one of its layers.
    #[default]
    Chart,
    /// Toolbars, side panels, anything outside the drawing area.
    Outside,
}

/// Client-space bounds of the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn to_sample(&self, client_x: f64, client_y: f64) -> PixelPoint {
        PixelPoint::new(client_x - self.left, client_y - self.top)
    }

    pub fn contains(&self, client_x: f64, client_y: f64) -> bool {
        client_x >= self.left
            && client_x <= self.left + self.width
            && client_y >= self.top
            && client_y <= self.top + self.height
    }
}

/// A raw mouse, touch or pen event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub kind: PointerKind,
    #[serde(default)]
    pub target: PointerTarget,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            kind: PointerKind::Mouse,
            target: PointerTarget::Chart,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            ..Self::new(client_x, client_y)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn outside(mut self) -> Self {
        self.target = PointerTarget::Outside;
        self
    }

    /// Paper-space sample, or `None` for events that are not the chart's.
    pub fn sample(&self, container: &ContainerRect) -> Option<PixelPoint> {
        if self.target != PointerTarget::Chart {
            return None;
        }
        let sample = container.to_sample(self.client_x, self.client_y);
        sample.is_finite().then_some(sample)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Parses a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn named(name: &str, modifiers: Modifiers) -> Self {
        Self {
            key: Key::from_name(name),
            modifiers,
        }
    }
}

/// What a key press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCommand {
    SelectPrevious,
    SelectNext,
    /// Handled asynchronously by the synchronizer.
    DeleteSelected,
    ClearSelection,
    SelectAll,
}

pub fn command_for(input: &KeyInput) -> Option<EngineCommand> {
    match input.key {
        Key::ArrowLeft | Key::ArrowUp => Some(EngineCommand::SelectPrevious),
        Key::ArrowRight | Key::ArrowDown => Some(EngineCommand::SelectNext),
        Key::Delete | Key::Backspace => Some(EngineCommand::DeleteSelected),
        Key::Escape => Some(EngineCommand::ClearSelection),
        Key::Char('a') if input.modifiers.platform() => Some(EngineCommand::SelectAll),
        Key::Char(_) | Key::Other => None,
    }
}
