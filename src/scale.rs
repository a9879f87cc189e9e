//! Linear scales mapping domain values to pixels and back.
//!
//! Scales are immutable values. "Changing" a scale means building a new one
//! with [`LinearScale::with_domain`] or [`LinearScale::with_range`].

use crate::data::domain::Extent;
use crate::layout::RowBand;

/// Continuous linear mapping from a domain extent onto a pixel range.
///
/// The range may be reversed (`range.0 > range.1`), which is how row scales
/// put the domain maximum at the top of their band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Extent,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Extent, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> Extent {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Smaller and larger end of the pixel range.
    pub fn range_bounds(&self) -> (f64, f64) {
        (self.range.0.min(self.range.1), self.range.0.max(self.range.1))
    }

    pub fn with_domain(&self, domain: Extent) -> Self {
        Self::new(domain, self.range)
    }

    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self::new(self.domain, range)
    }

    /// Domain to pixel. A zero-width domain maps everything to the range midpoint.
    pub fn apply(&self, v: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.span();
        if span == 0.0 || !span.is_finite() {
            return r0 + 0.5 * (r1 - r0);
        }
        r0 + (v - self.domain.min) / span * (r1 - r0)
    }

    /// Pixel to domain. A zero-height range maps everything to the domain midpoint.
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        let extent = r1 - r0;
        if extent == 0.0 || !extent.is_finite() {
            return self.domain.mid();
        }
        self.domain.min + (px - r0) / extent * self.domain.span()
    }

    /// Round tick values (steps of 1, 2 or 5 times a power of ten) inside the
    /// domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let lo = self.domain.min.min(self.domain.max);
        let hi = self.domain.min.max(self.domain.max);
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }
        let step = TickStep::new(lo, hi, count);
        if !step.is_usable() {
            return vec![lo, hi];
        }
        let first = step.index_at_or_above(lo);
        let last = step.index_at_or_below(hi);
        if last < first {
            return Vec::new();
        }
        // Spans near the subnormal range overflow the index arithmetic.
        if last.saturating_sub(first) > (count as i64).saturating_mul(10) {
            return vec![lo, hi];
        }
        (first..=last).map(|i| step.value(i)).collect()
    }
}

/// Tick spacing, kept as a multiplier or a divisor so that fractional steps
/// produce exact decimal values (`0.3` rather than `0.30000000000000004`).
#[derive(Debug, Clone, Copy)]
enum TickStep {
    Mul(f64),
    Div(f64),
}

impl TickStep {
    fn new(lo: f64, hi: f64, count: usize) -> Self {
        let raw = (hi - lo) / count as f64;
        let power = raw.log10().floor();
        let error = raw / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };
        if power >= 0.0 {
            TickStep::Mul(factor * 10f64.powf(power))
        } else {
            TickStep::Div(10f64.powf(-power) / factor)
        }
    }

    fn is_usable(&self) -> bool {
        match *self {
            TickStep::Mul(s) | TickStep::Div(s) => s.is_finite() && s > 0.0,
        }
    }

    fn index_at_or_above(&self, v: f64) -> i64 {
        match *self {
            TickStep::Mul(s) => (v / s).ceil() as i64,
            TickStep::Div(d) => (v * d).ceil() as i64,
        }
    }

    fn index_at_or_below(&self, v: f64) -> i64 {
        match *self {
            TickStep::Mul(s) => (v / s).floor() as i64,
            TickStep::Div(d) => (v * d).floor() as i64,
        }
    }

    fn value(&self, i: i64) -> f64 {
        match *self {
            TickStep::Mul(s) => i as f64 * s,
            TickStep::Div(d) => i as f64 / d,
        }
    }
}

/// Shared horizontal scale: the overall x domain over the plot width.
pub fn build_horizontal_scale(domain: Extent, pixel_range: (f64, f64)) -> LinearScale {
    LinearScale::new(domain, pixel_range)
}

/// Vertical scale for one row, inverted so the domain maximum sits at the
/// top of the band. The range is absolute in plot-local pixels:
/// `[band.bottom - padding, band.top + padding]`.
///
/// `padding` is clamped to half the band height; a band padded away
/// entirely collapses onto its midpoint.
pub fn build_row_scale(domain: Extent, band: &RowBand, padding: f64) -> LinearScale {
    let top = band.top as f64;
    let bottom = band.bottom as f64;
    let half = ((bottom - top) * 0.5).max(0.0);
    let pad = padding.clamp(0.0, half);
    LinearScale::new(domain, (bottom - pad, top + pad))
}
