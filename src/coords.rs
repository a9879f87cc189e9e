//! Pointer position to row index and domain values.

use egui::Pos2;

use crate::layout::Viewport;
use crate::scale::LinearScale;

/// A pointer position resolved into a row and domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainPoint {
    pub row_index: usize,
    pub x: f64,
    pub y: f64,
}

/// Row under a plot-local `y`: `floor(y / row_height)` clamped to
/// `[0, num_rows - 1]`. `None` without rows; a zero row height maps to row 0.
pub fn row_index_at(y_local: f32, row_height: f32, num_rows: usize) -> Option<usize> {
    if num_rows == 0 {
        return None;
    }
    if row_height.is_nan() || row_height <= 0.0 || !y_local.is_finite() {
        return Some(0);
    }
    let idx = (y_local / row_height).floor();
    Some((idx.max(0.0) as usize).min(num_rows - 1))
}

/// Convert a raw viewport position into `(row, x, y)`.
///
/// The position is first made plot-local by removing the margins. Row
/// scales carry absolute plot-local ranges, so the local y is inverted
/// directly without re-basing it into the row.
pub fn pointer_to_domain(
    pointer: Pos2,
    viewport: &Viewport,
    x_scale: &LinearScale,
    row_scales: &[LinearScale],
) -> Option<DomainPoint> {
    let local = viewport.to_plot_local(pointer);
    let row_height = viewport.row_height(row_scales.len());
    let row_index = row_index_at(local.y, row_height, row_scales.len())?;
    Some(DomainPoint {
        row_index,
        x: x_scale.invert(local.x as f64),
        y: row_scales[row_index].invert(local.y as f64),
    })
}
