//! Subplot Locator.
//!
//! Finds the subplot containing a paper-space pointer sample by scanning
//! y-axis bands in index order and matching the anchored x-axis band.
//! Matching follows the engine-reported anchor relationship, never axis
//! names or list positions.

use chartkit_core::PixelPoint;

use crate::axis::{AxisDirection, AxisRef, AxisSpec};

/// Y-axes ordered by engine index, primary first.
pub fn sorted_y_axes(axes: &[AxisSpec]) -> Vec<&AxisSpec> {
    let mut ys: Vec<&AxisSpec> = axes
        .iter()
        .filter(|a| a.direction == AxisDirection::Y)
        .collect();
    ys.sort_by_key(|a| a.index);
    ys
}

/// The x-axis paired with `y`.
///
/// The primary y-axis pairs with the primary x-axis; any other y-axis pairs
/// with the x-axis anchored to it.
pub fn anchored_x_axis<'a>(y: &AxisSpec, axes: &'a [AxisSpec]) -> Option<&'a AxisSpec> {
    let mut xs = axes.iter().filter(|a| a.direction == AxisDirection::X);
    if y.index == 0 {
        xs.min_by_key(|a| a.index)
    } else {
        xs.find(|a| a.anchor.as_ref() == Some(&y.id))
    }
}

/// Returns the first subplot whose bands both contain `sample`.
pub fn locate(sample: PixelPoint, axes: &[AxisSpec]) -> Option<AxisRef> {
    locate_with_tolerance(sample, axes, 0.0)
}

/// Like [`locate`] with bands widened by `tolerance` pixels on each side.
pub fn locate_with_tolerance(sample: PixelPoint, axes: &[AxisSpec], tolerance: f64) -> Option<AxisRef> {
    if !sample.is_finite() {
        return None;
    }
    sorted_y_axes(axes)
        .into_iter()
        .filter(|y| y.band_contains(sample.y, tolerance))
        .find_map(|y| {
            anchored_x_axis(y, axes)
                .filter(|x| x.band_contains(sample.x, tolerance))
                .map(|x| AxisRef {
                    x: x.id.clone(),
                    y: y.id.clone(),
                })
        })
}

/// Whether `sample` lies within any subplot, bands widened by `tolerance`.
pub fn within_tolerance(sample: PixelPoint, axes: &[AxisSpec], tolerance: f64) -> bool {
    locate_with_tolerance(sample, axes, tolerance).is_some()
}
