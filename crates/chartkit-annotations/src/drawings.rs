//! Push-channel `drawings` messages and the wire form of a shape.
//!
//! Wire times are epoch seconds (numbers or date strings); on the chart they
//! become millisecond timestamps of the date-typed x-axis. A
//! [`SubplotDirectory`] maps the backend's subplot names onto axis pairs.

use std::collections::HashMap;

use chartkit_core::DrawingsError;
use serde::{Deserialize, Serialize};

use crate::axis::{AxisKind, AxisRef, AxisValue};
use crate::shapes::{Shape, ShapeClass, ShapeGeometry, ShapeId, ShapeMeta};

/// Subplot name of the main price panel.
pub const MAIN_SUBPLOT: &str = "main";

const MESSAGE_TYPE: &str = "drawings";

fn main_subplot() -> String {
    MAIN_SUBPLOT.to_string()
}

/// One drawing as exchanged with the backend.
///
/// This is also the body of `PUT /update_drawing/{symbol}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: AxisValue,
    pub end_time: AxisValue,
    pub start_price: f64,
    pub end_price: f64,
    #[serde(default = "main_subplot")]
    pub subplot_name: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl DrawingRecord {
    /// Wire form of a shape.
    pub fn from_shape(shape: &Shape) -> Self {
        let (start, end) = shape.geometry.endpoints();
        let kind = match (shape.geometry, shape.class) {
            (ShapeGeometry::Line { .. }, ShapeClass::SignalMarker) => "signal_marker",
            (ShapeGeometry::Line { .. }, ShapeClass::Drawing) => "line",
            (ShapeGeometry::Rectangle { .. }, _) => "rectangle",
        };
        Self {
            id: shape.id.as_ref().map(|id| id.to_string()),
            kind: kind.to_string(),
            start_time: AxisValue::Number(millis_to_seconds(start.x)),
            end_time: AxisValue::Number(millis_to_seconds(end.x)),
            start_price: start.y,
            end_price: end.y,
            subplot_name: shape.meta.subplot_name.clone(),
            resolution: shape.meta.resolution.clone(),
            properties: shape.meta.properties.clone(),
        }
    }

    /// Builds the chart shape, resolving the subplot through `directory`.
    pub fn to_shape(&self, directory: &SubplotDirectory) -> Result<Shape, DrawingsError> {
        let x0 = self.start_time.to_numeric(AxisKind::Date)?;
        let x1 = self.end_time.to_numeric(AxisKind::Date)?;
        let (y0, y1) = (self.start_price, self.end_price);
        let (geometry, class) = match self.kind.as_str() {
            "line" | "trendline" => (ShapeGeometry::line(x0, y0, x1, y1), ShapeClass::Drawing),
            "signal_marker" | "hline" => (ShapeGeometry::line(x0, y0, x1, y0), ShapeClass::SignalMarker),
            "rectangle" | "rect" => (ShapeGeometry::rectangle(x0, y0, x1, y1), ShapeClass::Drawing),
            other => {
                return Err(DrawingsError::UnknownType {
                    kind: other.to_string(),
                })
            }
        };
        let mut shape = Shape::new(self.id.clone().map(ShapeId::from), geometry)
            .with_axis_ref(directory.resolve(&self.subplot_name)?)
            .with_meta(ShapeMeta {
                subplot_name: self.subplot_name.clone(),
                resolution: self.resolution.clone(),
                properties: self.properties.clone(),
            });
        shape.class = class;
        Ok(shape)
    }
}

fn millis_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}

/// Subplot name → axis pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotDirectory {
    entries: HashMap<String, AxisRef>,
}

impl Default for SubplotDirectory {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(MAIN_SUBPLOT.to_string(), AxisRef::primary());
        Self { entries }
    }
}

impl SubplotDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, axis_ref: AxisRef) -> Self {
        self.insert(name, axis_ref);
        self
    }

    pub fn insert(&mut self, name: &str, axis_ref: AxisRef) {
        self.entries.insert(name.to_string(), axis_ref);
    }

    pub fn resolve(&self, name: &str) -> Result<AxisRef, DrawingsError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| DrawingsError::UnknownSubplot {
                name: name.to_string(),
            })
    }

    pub fn name_of(&self, axis_ref: &AxisRef) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, r)| *r == axis_ref)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A full or incremental shape list for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingsMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub symbol: String,
    #[serde(default)]
    pub drawings: Vec<DrawingRecord>,
    /// Upsert into the registry instead of replacing it.
    #[serde(default)]
    pub incremental: bool,
}

/// Shapes converted from a message, plus the records that were skipped.
#[derive(Debug, Clone, Default)]
pub struct ConvertedDrawings {
    pub shapes: Vec<Shape>,
    pub skipped: Vec<(Option<String>, DrawingsError)>,
}

impl DrawingsMessage {
    pub fn full(symbol: &str, drawings: Vec<DrawingRecord>) -> Self {
        Self {
            message_type: MESSAGE_TYPE.to_string(),
            symbol: symbol.to_string(),
            drawings,
            incremental: false,
        }
    }

    pub fn incremental(symbol: &str, drawings: Vec<DrawingRecord>) -> Self {
        Self {
            incremental: true,
            ..Self::full(symbol, drawings)
        }
    }

    pub fn parse(json: &str) -> Result<Self, DrawingsError> {
        let message: Self = serde_json::from_str(json).map_err(|e| DrawingsError::Json {
            reason: e.to_string(),
        })?;
        if message.message_type != MESSAGE_TYPE {
            return Err(DrawingsError::UnexpectedMessage {
                message_type: message.message_type,
            });
        }
        Ok(message)
    }

    /// Converts every record; unconvertible records are reported, not fatal.
    pub fn convert(&self, directory: &SubplotDirectory) -> ConvertedDrawings {
        let mut converted = ConvertedDrawings::default();
        for record in &self.drawings {
            match record.to_shape(directory) {
                Ok(shape) => converted.shapes.push(shape),
                Err(err) => converted.skipped.push((record.id.clone(), err)),
            }
        }
        converted
    }
}
