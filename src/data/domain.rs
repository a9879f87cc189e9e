//! Domain extents for the shared x axis and the per-row y axes.

use serde::{Deserialize, Serialize};

use crate::data::series::{merge_extents, Series};

/// A closed `[min, max]` value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build an extent from two values in either order.
    pub fn spanning(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn mid(&self) -> f64 {
        self.min + 0.5 * (self.max - self.min)
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Clamp `v` into the extent. An extent with a NaN bound returns `v` unchanged.
    pub fn clamp(&self, v: f64) -> f64 {
        if self.min.is_nan() || self.max.is_nan() {
            return v;
        }
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        v.clamp(lo, hi)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min.min(self.max) && v <= self.max.max(self.min)
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl From<(f64, f64)> for Extent {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// Vertical domain: one extent for all rows, or one per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YDomain {
    Shared(Extent),
    PerRow(Vec<Extent>),
}

impl Default for YDomain {
    fn default() -> Self {
        YDomain::Shared(Extent::default())
    }
}

/// Domain of the whole stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub x: Extent,
    pub y: YDomain,
}

impl Domain {
    pub fn shared(x: Extent, y: Extent) -> Self {
        Self {
            x,
            y: YDomain::Shared(y),
        }
    }

    /// Vertical extent for row `index`.
    ///
    /// A per-row domain without an entry for `index` falls back to the extent
    /// fitted from `series` (or the unit extent if the row has no data).
    pub fn y_for_row(&self, index: usize, series: Option<&Series>) -> Extent {
        match &self.y {
            YDomain::Shared(e) => *e,
            YDomain::PerRow(rows) => rows.get(index).copied().unwrap_or_else(|| {
                series
                    .and_then(Series::y_extent)
                    .map(Extent::from)
                    .unwrap_or_default()
            }),
        }
    }

    /// Fit a domain to the data: the union of all x extents and the union of
    /// all y extents. Empty collections yield the unit extents.
    pub fn fit(series: &[Series]) -> Self {
        let x = merge_extents(series.iter().filter_map(Series::x_extent));
        let y = merge_extents(series.iter().filter_map(Series::y_extent));
        Self::shared(
            x.map(Extent::from).unwrap_or_default(),
            y.map(Extent::from).unwrap_or_default(),
        )
    }

    /// Like [`Domain::fit`] but with an independent y extent per row.
    pub fn fit_per_row(series: &[Series]) -> Self {
        let x = merge_extents(series.iter().filter_map(Series::x_extent));
        let rows = series
            .iter()
            .map(|s| s.y_extent().map(Extent::from).unwrap_or_default())
            .collect();
        Self {
            x: x.map(Extent::from).unwrap_or_default(),
            y: YDomain::PerRow(rows),
        }
    }
}
