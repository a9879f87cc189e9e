//! Series, traces, samples and epochs: the data shown in one stacked row.
//!
//! The core only reads these types. All mutation goes through
//! [`crate::sink::Intent`]s applied by whatever store owns the data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a series (one row of the stack), assigned by the store.
pub type SeriesId = u32;

/// A single sample: x is typically time, y is the measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Sample {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

/// Time-ordered sample sequence. Samples must be non-decreasing in `x`;
/// nearest-sample lookup relies on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    pub samples: Vec<Sample>,
}

impl Trace {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a trace from `[x, y]` pairs.
    pub fn from_points(points: impl IntoIterator<Item = [f64; 2]>) -> Self {
        Self {
            samples: points.into_iter().map(Sample::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check the ordering precondition. Meant for ingestion-side validation;
    /// the layout and lookup code never calls it.
    pub fn is_sorted(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].x <= w[1].x)
    }

    /// `(min, max)` of the finite x values, `None` when there are none.
    ///
    /// Samples are sorted, so the first and last finite x are the bounds.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut finite = self.samples.iter().map(|s| s.x).filter(|x| x.is_finite());
        let first = finite.next()?;
        let last = self
            .samples
            .iter()
            .rev()
            .map(|s| s.x)
            .find(|x| x.is_finite())
            .unwrap_or(first);
        Some((first, last))
    }

    /// `(min, max)` of the finite y values, `None` when there are none.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| s.y)
            .filter(|y| y.is_finite())
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

/// Externally defined epoch label. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochTag(pub String);

impl EpochTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EpochTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled closed interval `[start, end]` in x-domain units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<EpochTag>,
}

impl Epoch {
    /// Create an epoch; reversed bounds are swapped so `start <= end`.
    pub fn new(start: f64, end: f64, tag: Option<EpochTag>) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self { start, end, tag }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

/// One row of the stacked chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub traces: Vec<Trace>,
    #[serde(default)]
    pub epochs: Vec<Epoch>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Series {
    pub fn new(id: SeriesId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_epoch(mut self, epoch: Epoch) -> Self {
        self.epochs.push(epoch);
        self
    }

    pub fn epoch(&self, index: usize) -> Option<&Epoch> {
        self.epochs.get(index)
    }

    /// Union of the x extents of all traces.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        merge_extents(self.traces.iter().filter_map(Trace::x_extent))
    }

    /// Union of the y extents of all traces.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        merge_extents(self.traces.iter().filter_map(Trace::y_extent))
    }
}

pub(crate) fn merge_extents(iter: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    iter.fold(None, |acc, (lo, hi)| match acc {
        None => Some((lo, hi)),
        Some((a, b)) => Some((a.min(lo), b.max(hi))),
    })
}
