//! Nearest-sample lookup used to build tooltip payloads.

use crate::data::series::{Sample, Series, Trace};

/// Index of the sample shown for `x`: leftmost insertion point of `x`
/// searched from index 1, resolved to the last sample when past the end.
///
/// Between two samples the later one wins; on an exact tie the sample at the
/// insertion point is returned. A query at or before the second sample yields
/// index 1 (or 0 for a single-sample trace).
pub fn nearest_index(trace: &Trace, x: f64) -> Option<usize> {
    let samples = &trace.samples;
    if samples.is_empty() {
        return None;
    }
    let lo = 1.min(samples.len());
    let idx = lo + samples[lo..].partition_point(|s| s.x < x);
    Some(idx.min(samples.len() - 1))
}

/// Sample shown for `x` on `trace`, `None` for an empty trace.
pub fn nearest(trace: &Trace, x: f64) -> Option<Sample> {
    nearest_index(trace, x).map(|i| trace.samples[i])
}

/// Nearest sample for every trace of every row: one vector per series,
/// one entry per trace. Traces are searched independently so differing
/// lengths or sampling rates never misalign results.
pub fn tooltip_data(series: &[Series], x: f64) -> Vec<Vec<Option<Sample>>> {
    series
        .iter()
        .map(|s| s.traces.iter().map(|t| nearest(t, x)).collect())
        .collect()
}

/// Tooltip state produced on each pointer move over the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Nearest samples, indexed `[row][trace]`.
    pub data: Vec<Vec<Option<Sample>>>,
    /// Domain x under the pointer.
    pub x: f64,
    /// Domain y under the pointer, in the hovered row's scale.
    pub y: f64,
    /// Row under the pointer.
    pub row_index: usize,
}

impl Tooltip {
    /// Samples for the hovered row only.
    pub fn hovered_row(&self) -> &[Option<Sample>] {
        self.data
            .get(self.row_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
