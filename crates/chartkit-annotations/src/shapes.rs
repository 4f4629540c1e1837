//! Annotation shapes living in the Shape Registry.
//!
//! A [`Shape`] is anchored to data coordinates of one subplot. Its
//! [`ShapeGeometry`] is a tagged variant so the hit tester and the
//! reconciler match exhaustively on the kind instead of branching on a
//! type string.

use std::fmt;

use chartkit_core::DataPoint;
use serde::{Deserialize, Serialize};

use crate::axis::AxisRef;

/// Stable identifier assigned by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Data-space geometry of a shape.
///
/// Both variants are defined by two endpoints: x in chart time-axis units,
/// y in the value units of the shape's subplot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Line { x0: f64, y0: f64, x1: f64, y1: f64 },
    Rectangle { x0: f64, y0: f64, x1: f64, y1: f64 },
}

impl ShapeGeometry {
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Line { x0, y0, x1, y1 }
    }

    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Rectangle { x0, y0, x1, y1 }
    }

    /// Wire name of the kind, as used in backend bodies.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Rectangle { .. } => "rectangle",
        }
    }

    /// The two defining endpoints.
    pub fn endpoints(&self) -> (DataPoint, DataPoint) {
        match *self {
            Self::Line { x0, y0, x1, y1 } | Self::Rectangle { x0, y0, x1, y1 } => {
                (DataPoint::new(x0, y0), DataPoint::new(x1, y1))
            }
        }
    }

    /// Same kind with new endpoints.
    pub fn with_endpoints(&self, start: DataPoint, end: DataPoint) -> Self {
        match self {
            Self::Line { .. } => Self::line(start.x, start.y, end.x, end.y),
            Self::Rectangle { .. } => Self::rectangle(start.x, start.y, end.x, end.y),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    pub fn is_horizontal(&self) -> bool {
        let (a, b) = self.endpoints();
        a.y == b.y
    }
}

/// Interaction class of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeClass {
    /// A regular user drawing.
    #[default]
    Drawing,
    /// Horizontal signal marker, hit-tested with the wide threshold and
    /// with priority over drawings.
    SignalMarker,
}

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    #[default]
    Solid,
    Dot,
    Dash,
    LongDash,
    DashDot,
}

/// Stroke style of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    #[serde(default)]
    pub dash: DashStyle,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "#2962ff".to_string(),
            width: 2.0,
            dash: DashStyle::Solid,
        }
    }
}

/// Endpoint markers drawn on user lines as grab handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: 6.0,
            color: "#ffffff".to_string(),
        }
    }
}

/// Persistence metadata carried alongside the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMeta {
    pub subplot_name: String,
    pub resolution: Option<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Default for ShapeMeta {
    fn default() -> Self {
        Self {
            subplot_name: crate::drawings::MAIN_SUBPLOT.to_string(),
            resolution: None,
            properties: serde_json::Map::new(),
        }
    }
}

/// A rendered annotation shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Backend id; `None` until the shape has been persisted.
    pub id: Option<ShapeId>,
    pub geometry: ShapeGeometry,
    pub axis_ref: AxisRef,
    /// Base style, used when the shape is neither hovered nor selected.
    pub style: LineStyle,
    pub class: ShapeClass,
    /// Engine-managed overlay (crosshair, live price line).
    pub is_system_shape: bool,
    /// True only while selected.
    pub editable: bool,
    pub marker: Option<MarkerStyle>,
    pub meta: ShapeMeta,
}

impl Shape {
    /// Creates a user drawing on the primary subplot.
    pub fn new(id: Option<ShapeId>, geometry: ShapeGeometry) -> Self {
        Self {
            id,
            geometry,
            axis_ref: AxisRef::primary(),
            style: LineStyle::default(),
            class: ShapeClass::Drawing,
            is_system_shape: false,
            editable: false,
            marker: None,
            meta: ShapeMeta::default(),
        }
    }

    /// Creates a persisted line on the primary subplot.
    pub fn line(id: impl Into<ShapeId>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Some(id.into()), ShapeGeometry::line(x0, y0, x1, y1))
    }

    /// Creates a persisted rectangle on the primary subplot.
    pub fn rectangle(id: impl Into<ShapeId>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Some(id.into()), ShapeGeometry::rectangle(x0, y0, x1, y1))
    }

    /// Creates an engine-managed overlay line.
    pub fn system_line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            is_system_shape: true,
            ..Self::new(None, ShapeGeometry::line(x0, y0, x1, y1))
        }
    }

    pub fn with_axis_ref(mut self, axis_ref: AxisRef) -> Self {
        self.axis_ref = axis_ref;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_meta(mut self, meta: ShapeMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn as_signal_marker(mut self) -> Self {
        self.class = ShapeClass::SignalMarker;
        self
    }

    pub fn as_system(mut self) -> Self {
        self.is_system_shape = true;
        self
    }

    /// Whether the shape takes part in hover, hit-testing and selection.
    pub fn is_interactive(&self) -> bool {
        !self.is_system_shape && self.id.is_some()
    }

    pub fn has_id(&self, id: &ShapeId) -> bool {
        self.id.as_ref() == Some(id)
    }
}
