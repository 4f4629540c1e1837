//! Axis metadata and the rendering-engine contract.
//!
//! The rendering engine is an external collaborator. Everything this crate
//! needs from it goes through [`RenderEngineAdapter`]: per-axis pixel
//! offsets and lengths, axis-local data↔pixel transforms, and a single
//! batched style update per reconciliation pass.

use std::fmt;

use chartkit_core::AxisError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::style::StyleBatch;

/// Engine-reported axis identifier (`x`, `x2`, `y`, `y3`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisId(String);

impl AxisId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AxisId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    /// Horizontal axis; its band spans pixel columns.
    X,
    /// Vertical axis; its band spans pixel rows.
    Y,
}

/// Value type of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    #[default]
    Linear,
    /// Millisecond timestamps; date-like inputs are converted first.
    Date,
}

/// Metadata of one axis for the current render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub id: AxisId,
    pub direction: AxisDirection,
    pub kind: AxisKind,
    /// Ordering reported by the engine; 0 is the primary axis.
    pub index: usize,
    /// Paper-space position of the axis band start.
    pub pixel_offset: f64,
    /// Extent of the axis band in pixels.
    pub pixel_length: f64,
    /// Axis this one is anchored to (x-axes anchor to a y-axis id).
    pub anchor: Option<AxisId>,
    /// Visible data range.
    pub domain: (f64, f64),
    /// Axis-local pixel positions of `domain.0` and `domain.1`.
    pub range: (f64, f64),
}

impl AxisSpec {
    /// Horizontal axis with a left-to-right range.
    pub fn x(id: &str, index: usize, pixel_offset: f64, pixel_length: f64, domain: (f64, f64)) -> Self {
        Self {
            id: AxisId::new(id),
            direction: AxisDirection::X,
            kind: AxisKind::Linear,
            index,
            pixel_offset,
            pixel_length,
            anchor: None,
            domain,
            range: (0.0, pixel_length),
        }
    }

    /// Vertical axis with the usual bottom-to-top range.
    pub fn y(id: &str, index: usize, pixel_offset: f64, pixel_length: f64, domain: (f64, f64)) -> Self {
        Self {
            id: AxisId::new(id),
            direction: AxisDirection::Y,
            kind: AxisKind::Linear,
            index,
            pixel_offset,
            pixel_length,
            anchor: None,
            domain,
            range: (pixel_length, 0.0),
        }
    }

    pub fn anchored_to(mut self, axis: &str) -> Self {
        self.anchor = Some(AxisId::new(axis));
        self
    }

    pub fn date(mut self) -> Self {
        self.kind = AxisKind::Date;
        self
    }

    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Whether a paper-space coordinate along this axis lies in its band.
    pub fn band_contains(&self, pixel: f64, tolerance: f64) -> bool {
        pixel >= self.pixel_offset - tolerance
            && pixel <= self.pixel_offset + self.pixel_length + tolerance
    }
}

/// The (x-axis, y-axis) pair a shape belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRef {
    pub x: AxisId,
    pub y: AxisId,
}

impl AxisRef {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: AxisId::new(x),
            y: AxisId::new(y),
        }
    }

    /// The main price panel.
    pub fn primary() -> Self {
        Self::new("x", "y")
    }
}

impl fmt::Display for AxisRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Both axes of one subplot, captured for a specific render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotAxisPair {
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub render_pass: u64,
}

impl SubplotAxisPair {
    pub fn axis_ref(&self) -> AxisRef {
        AxisRef {
            x: self.x.id.clone(),
            y: self.y.id.clone(),
        }
    }

    pub fn matches(&self, axis_ref: &AxisRef) -> bool {
        self.x.id == axis_ref.x && self.y.id == axis_ref.y
    }

    /// Whether a paper-space point lies inside both bands.
    pub fn contains(&self, x: f64, y: f64, tolerance: f64) -> bool {
        self.x.band_contains(x, tolerance) && self.y.band_contains(y, tolerance)
    }
}

/// An x value as it arrives from the outside: a number or a date-like string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

/// Values below this on a date axis are epoch seconds, not milliseconds.
const EPOCH_SECONDS_CUTOFF: f64 = 1e11;

impl AxisValue {
    /// Converts to the numeric value an axis of `kind` transforms.
    ///
    /// On date axes, numbers below 1e11 are taken as epoch seconds and
    /// promoted to milliseconds; strings may be RFC 3339,
    /// `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DD` or numeric.
    pub fn to_numeric(&self, kind: AxisKind) -> Result<f64, AxisError> {
        match (self, kind) {
            (AxisValue::Number(v), AxisKind::Linear) => Ok(*v),
            (AxisValue::Number(v), AxisKind::Date) => {
                if v.abs() < EPOCH_SECONDS_CUTOFF {
                    Ok(v * 1000.0)
                } else {
                    Ok(*v)
                }
            }
            (AxisValue::Text(s), kind) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<f64>() {
                    return AxisValue::Number(v).to_numeric(kind);
                }
                match kind {
                    AxisKind::Date => parse_date_millis(s),
                    AxisKind::Linear => Err(AxisError::InvalidDate {
                        input: s.to_string(),
                    }),
                }
            }
        }
    }
}

impl From<f64> for AxisValue {
    fn from(v: f64) -> Self {
        AxisValue::Number(v)
    }
}

fn parse_date_millis(s: &str) -> Result<f64, AxisError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis() as f64);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc().timestamp_millis() as f64);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp_millis() as f64);
        }
    }
    Err(AxisError::InvalidDate {
        input: s.to_string(),
    })
}

/// Narrow contract with the external rendering engine.
///
/// Transforms are axis-local: `data_to_pixel` returns a position relative
/// to the axis' `pixel_offset`, the way plotting engines expose them.
pub trait RenderEngineAdapter {
    /// Axis metadata of the current render pass, `None` before the first one.
    fn axes(&self) -> Option<&[AxisSpec]>;

    /// Monotonic counter bumped by every redraw.
    fn render_pass(&self) -> u64;

    fn data_to_pixel(&self, axis: &AxisId, value: f64) -> Option<f64>;

    fn pixel_to_data(&self, axis: &AxisId, pixel: f64) -> Option<f64>;

    /// Applies one reconciliation pass worth of shape styles.
    fn apply_styles(&mut self, batch: StyleBatch);
}
