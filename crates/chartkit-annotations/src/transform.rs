//! Coordinate Transform Adapter.
//!
//! Wraps a [`RenderEngineAdapter`] and exposes paper-space conversions
//! uniformly for any axis pair:
//!
//! ```text
//! paper_x = x_axis.pixel_offset + data_to_pixel(x_axis, data_x)
//! paper_y = y_axis.pixel_offset + data_to_pixel(y_axis, data_y)
//! ```

use chartkit_core::{AxisError, DataPoint, PixelPoint};

use crate::axis::{AxisDirection, AxisId, AxisRef, AxisSpec, AxisValue, RenderEngineAdapter, SubplotAxisPair};
use crate::locator;

/// Paper-space view over the engine's per-axis transforms.
pub struct CoordinateAdapter<'a, E: RenderEngineAdapter + ?Sized> {
    engine: &'a E,
}

impl<'a, E: RenderEngineAdapter + ?Sized> CoordinateAdapter<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Axis metadata of the current render pass.
    pub fn axes(&self) -> Result<&'a [AxisSpec], AxisError> {
        self.engine.axes().ok_or(AxisError::NotReady)
    }

    /// Every subplot of the current render pass, primary first.
    pub fn axis_pairs(&self) -> Result<Vec<SubplotAxisPair>, AxisError> {
        let axes = self.axes()?;
        let render_pass = self.engine.render_pass();
        Ok(locator::sorted_y_axes(axes)
            .into_iter()
            .filter_map(|y| {
                locator::anchored_x_axis(y, axes).map(|x| SubplotAxisPair {
                    x: x.clone(),
                    y: y.clone(),
                    render_pass,
                })
            })
            .collect())
    }

    /// The subplot a shape's axis reference points at.
    pub fn pair(&self, axis_ref: &AxisRef) -> Result<SubplotAxisPair, AxisError> {
        let axes = self.axes()?;
        let find = |id: &AxisId, direction: AxisDirection| {
            axes.iter()
                .find(|a| a.id == *id && a.direction == direction)
                .cloned()
                .ok_or_else(|| AxisError::MissingAxis {
                    axis: id.to_string(),
                })
        };
        Ok(SubplotAxisPair {
            x: find(&axis_ref.x, AxisDirection::X)?,
            y: find(&axis_ref.y, AxisDirection::Y)?,
            render_pass: self.engine.render_pass(),
        })
    }

    /// Data space → paper space.
    pub fn pixel_of(&self, pair: &SubplotAxisPair, point: DataPoint) -> Result<PixelPoint, AxisError> {
        self.check_fresh(pair)?;
        let x = self.to_paper(&pair.x, point.x)?;
        let y = self.to_paper(&pair.y, point.y)?;
        Ok(PixelPoint::new(x, y))
    }

    /// Paper space → data space.
    pub fn data_of(&self, pair: &SubplotAxisPair, pixel: PixelPoint) -> Result<DataPoint, AxisError> {
        self.check_fresh(pair)?;
        let x = self.from_paper(&pair.x, pixel.x)?;
        let y = self.from_paper(&pair.y, pixel.y)?;
        Ok(DataPoint::new(x, y))
    }

    /// Like [`pixel_of`](Self::pixel_of) for an x value that may be date-like.
    pub fn pixel_of_value(&self, pair: &SubplotAxisPair, x: &AxisValue, y: f64) -> Result<PixelPoint, AxisError> {
        let x = x.to_numeric(pair.x.kind)?;
        self.pixel_of(pair, DataPoint::new(x, y))
    }

    fn check_fresh(&self, pair: &SubplotAxisPair) -> Result<(), AxisError> {
        let current = self.engine.render_pass();
        if pair.render_pass != current {
            return Err(AxisError::StaleRenderPass {
                captured: pair.render_pass,
                current,
            });
        }
        Ok(())
    }

    fn to_paper(&self, axis: &AxisSpec, value: f64) -> Result<f64, AxisError> {
        let local = self
            .engine
            .data_to_pixel(&axis.id, value)
            .ok_or_else(|| AxisError::MissingAxis {
                axis: axis.id.to_string(),
            })?;
        let paper = axis.pixel_offset + local;
        if !paper.is_finite() {
            return Err(AxisError::NonFinite {
                axis: axis.id.to_string(),
                value,
            });
        }
        Ok(paper)
    }

    fn from_paper(&self, axis: &AxisSpec, pixel: f64) -> Result<f64, AxisError> {
        let value = self
            .engine
            .pixel_to_data(&axis.id, pixel - axis.pixel_offset)
            .ok_or_else(|| AxisError::MissingAxis {
                axis: axis.id.to_string(),
            })?;
        if !value.is_finite() {
            return Err(AxisError::NonFinite {
                axis: axis.id.to_string(),
                value: pixel,
            });
        }
        Ok(value)
    }
}
