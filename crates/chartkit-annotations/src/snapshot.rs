//! A render-pass snapshot usable as the rendering engine.
//!
//! [`SnapshotEngine`] holds the axis metadata of the latest render pass and
//! maps data to pixels with linear scales (domain → range). It records every
//! style batch it receives, which makes it suitable for headless hosts and
//! for tests.

use crate::axis::{AxisId, AxisSpec, RenderEngineAdapter};
use crate::style::StyleBatch;

#[derive(Debug, Clone, Default)]
pub struct SnapshotEngine {
    axes: Option<Vec<AxisSpec>>,
    render_pass: u64,
    batches: Vec<StyleBatch>,
}

impl SnapshotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with one render pass already completed.
    pub fn with_axes(axes: Vec<AxisSpec>) -> Self {
        let mut engine = Self::new();
        engine.render(axes);
        engine
    }

    /// Starts a new render pass with fresh axis metadata.
    pub fn render(&mut self, axes: Vec<AxisSpec>) {
        self.axes = Some(axes);
        self.render_pass += 1;
    }

    /// Starts a new render pass with unchanged axes.
    pub fn redraw(&mut self) {
        self.render_pass += 1;
    }

    /// Updates one axis' visible domain (pan or zoom) and redraws.
    pub fn set_domain(&mut self, axis: &str, domain: (f64, f64)) -> bool {
        let Some(spec) = self
            .axes
            .as_mut()
            .and_then(|axes| axes.iter_mut().find(|a| a.id.as_str() == axis))
        else {
            return false;
        };
        spec.domain = domain;
        self.redraw();
        true
    }

    pub fn batches(&self) -> &[StyleBatch] {
        &self.batches
    }

    pub fn last_batch(&self) -> Option<&StyleBatch> {
        self.batches.last()
    }

    pub fn take_batches(&mut self) -> Vec<StyleBatch> {
        std::mem::take(&mut self.batches)
    }

    fn spec(&self, axis: &AxisId) -> Option<&AxisSpec> {
        self.axes.as_ref()?.iter().find(|a| &a.id == axis)
    }
}

fn scale(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return f64::NAN;
    }
    to.0 + (value - from.0) / span * (to.1 - to.0)
}

impl RenderEngineAdapter for SnapshotEngine {
    fn axes(&self) -> Option<&[AxisSpec]> {
        self.axes.as_deref()
    }

    fn render_pass(&self) -> u64 {
        self.render_pass
    }

    fn data_to_pixel(&self, axis: &AxisId, value: f64) -> Option<f64> {
        self.spec(axis).map(|a| scale(value, a.domain, a.range))
    }

    fn pixel_to_data(&self, axis: &AxisId, pixel: f64) -> Option<f64> {
        self.spec(axis).map(|a| scale(pixel, a.range, a.domain))
    }

    fn apply_styles(&mut self, batch: StyleBatch) {
        self.batches.push(batch);
    }
}
