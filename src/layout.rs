//! Stacked layout: row bands, per-row scales, axes, trace and epoch
//! geometry, and tooltip placement.
//!
//! A [`StackLayout`] is computed from scratch on every render from the
//! current series, domain, configuration and viewport. Nothing in it is
//! updated in place.
//!
//! Coordinate systems:
//! * *viewport* coordinates: raw pointer positions, origin at the chart's top-left corner,
//! * *plot-local* coordinates: origin at the plot area's top-left corner (margins removed).
//!
//! Row bands, row scales, trace paths, epoch rectangles and crosshairs are
//! plot-local. Border rectangles and tooltip label anchors are in viewport
//! coordinates.

use egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::StackConfig;
use crate::coords::{self, DomainPoint};
use crate::data::domain::{Domain, Extent};
use crate::data::nearest::Tooltip;
use crate::data::series::{EpochTag, Series, SeriesId};
use crate::format::ValueFormatter;
use crate::scale::{build_horizontal_scale, build_row_scale, LinearScale};

// ─────────────────────────────────────────────────────────────────────────────
// Viewport
// ─────────────────────────────────────────────────────────────────────────────

/// Space around the plot area reserved for axes and labels, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30.0,
            left: 50.0,
            right: 30.0,
            bottom: 30.0,
        }
    }
}

/// Size of the drawable area and its margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub margin: Margin,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Plot area size; negative sizes clamp to zero.
    pub fn plot_size(&self) -> Vec2 {
        vec2(
            (self.width - self.margin.left - self.margin.right).max(0.0),
            (self.height - self.margin.top - self.margin.bottom).max(0.0),
        )
    }

    /// Plot area in viewport coordinates.
    pub fn plot_rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.margin.left, self.margin.top), self.plot_size())
    }

    /// Translate a raw viewport position into plot-local coordinates.
    pub fn to_plot_local(&self, pos: Pos2) -> Pos2 {
        pos2(pos.x - self.margin.left, pos.y - self.margin.top)
    }

    /// Translate a plot-local position back into viewport coordinates.
    pub fn from_plot_local(&self, pos: Pos2) -> Pos2 {
        pos2(pos.x + self.margin.left, pos.y + self.margin.top)
    }

    /// Whether a raw viewport position lies inside the plot area (edges included).
    pub fn contains_plot(&self, pos: Pos2) -> bool {
        let r = self.plot_rect();
        pos.x >= r.min.x && pos.x <= r.max.x && pos.y >= r.min.y && pos.y <= r.max.y
    }

    /// Height of one row, `0.0` without rows.
    pub fn row_height(&self, num_rows: usize) -> f32 {
        if num_rows == 0 {
            0.0
        } else {
            self.plot_size().y / num_rows as f32
        }
    }

    /// Bands tiling `[0, plot height]` top to bottom. Band `i` ends exactly
    /// where band `i + 1` begins; the last band ends at the plot height.
    pub fn row_bands(&self, num_rows: usize) -> Vec<RowBand> {
        let rh = self.row_height(num_rows);
        let plot_h = self.plot_size().y;
        (0..num_rows)
            .map(|i| RowBand {
                index: i,
                top: i as f32 * rh,
                bottom: if i + 1 == num_rows {
                    plot_h
                } else {
                    (i + 1) as f32 * rh
                },
            })
            .collect()
    }
}

/// Vertical pixel range of one row, plot-local.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowBand {
    pub index: usize,
    pub top: f32,
    pub bottom: f32,
}

impl RowBand {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn mid(&self) -> f32 {
        self.top + 0.5 * self.height()
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout output
// ─────────────────────────────────────────────────────────────────────────────

/// One axis tick. `label` is `None` when the label is suppressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel position along the axis, plot-local.
    pub pixel: f32,
    pub label: Option<String>,
}

/// Polyline of one trace in plot-local pixels. Non-finite samples are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct TracePath {
    pub trace_index: usize,
    pub points: Vec<Pos2>,
}

/// Overlay rectangle of one epoch, spanning the full height of its row.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochOverlay {
    pub series_id: SeriesId,
    pub epoch_index: usize,
    pub start: f64,
    pub end: f64,
    pub tag: Option<EpochTag>,
    pub rect: Rect,
}

impl EpochOverlay {
    /// Grab zone of the start edge.
    pub fn start_handle(&self, handle_width: f32) -> Rect {
        edge_handle(self.rect.min.x, self.rect, handle_width)
    }

    /// Grab zone of the end edge.
    pub fn end_handle(&self, handle_width: f32) -> Rect {
        edge_handle(self.rect.max.x, self.rect, handle_width)
    }
}

fn edge_handle(x: f32, rect: Rect, width: f32) -> Rect {
    let half = 0.5 * width.max(0.0);
    Rect::from_min_max(pos2(x - half, rect.min.y), pos2(x + half, rect.max.y))
}

/// Everything needed to draw one row.
#[derive(Clone, Debug)]
pub struct RowLayout {
    pub index: usize,
    pub series_id: SeriesId,
    pub band: RowBand,
    pub y_scale: LinearScale,
    /// Left-axis ticks; labels for the domain's min and max are suppressed.
    pub y_ticks: Vec<Tick>,
    pub traces: Vec<TracePath>,
    pub epochs: Vec<EpochOverlay>,
}

/// What lies under a plot-local pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hit {
    StartHandle(EpochRef),
    EndHandle(EpochRef),
    Epoch(EpochRef),
    Row { row: usize, series_id: SeriesId },
    Outside,
}

/// Identifies an epoch drawn in a given row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochRef {
    pub row: usize,
    pub series_id: SeriesId,
    pub epoch_index: usize,
}

/// Text anchored at a viewport position (the label's top-left corner).
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub pos: Pos2,
    pub text: String,
}

/// Per-row tooltip: one formatted line per trace that has a sample.
#[derive(Clone, Debug, PartialEq)]
pub struct RowLabel {
    pub row: usize,
    pub pos: Pos2,
    pub lines: Vec<String>,
}

/// Geometry of the hover tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipGeometry {
    /// One vertical segment per row at the tooltip x, plot-local.
    pub crosshairs: Vec<[Pos2; 2]>,
    /// x readout above the chart.
    pub x_label_top: Label,
    /// x readout below the chart.
    pub x_label_bottom: Label,
    pub rows: Vec<RowLabel>,
}

/// Computed geometry of the whole stack for one render.
#[derive(Clone, Debug)]
pub struct StackLayout {
    pub viewport: Viewport,
    pub plot_size: Vec2,
    pub row_height: f32,
    pub x_domain: Extent,
    pub x_scale: LinearScale,
    pub x_ticks_top: Vec<Tick>,
    pub x_ticks_bottom: Vec<Tick>,
    pub rows: Vec<RowLayout>,
    /// Frame around the plot area: left, top, bottom, right.
    pub border: [Rect; 4],
    pub border_fill: Color32,
}

/// Entry point for layout computation.
pub struct StackedLayout;

impl StackedLayout {
    /// Compute the layout, or `None` when there are no rows to draw.
    pub fn compute(
        series: &[Series],
        domain: &Domain,
        config: &StackConfig,
        viewport: Viewport,
    ) -> Option<StackLayout> {
        let num_rows = series.len();
        if num_rows == 0 {
            return None;
        }
        let plot_size = viewport.plot_size();
        let row_height = viewport.row_height(num_rows);
        let x_scale = build_horizontal_scale(domain.x, (0.0, plot_size.x as f64));

        let rows = viewport
            .row_bands(num_rows)
            .into_iter()
            .zip(series)
            .map(|(band, s)| {
                let y_domain = domain.y_for_row(band.index, Some(s));
                let y_scale = build_row_scale(y_domain, &band, config.signal_padding as f64);
                RowLayout {
                    index: band.index,
                    series_id: s.id,
                    band,
                    y_scale,
                    y_ticks: row_ticks(&y_scale, config.axes.left.num_ticks, &config.format.tick_y),
                    traces: trace_paths(s, &x_scale, &y_scale),
                    epochs: epoch_overlays(s, &band, &x_scale),
                }
            })
            .collect();

        let x_ticks = |count| axis_ticks(&x_scale, count, &config.format.tick_x);
        Some(StackLayout {
            viewport,
            plot_size,
            row_height,
            x_domain: domain.x,
            x_scale,
            x_ticks_top: x_ticks(config.axes.top.num_ticks),
            x_ticks_bottom: x_ticks(config.axes.bottom.num_ticks),
            rows,
            border: border_rects(&viewport),
            border_fill: config.border_fill_color(),
        })
    }
}

impl StackLayout {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row_scales(&self) -> Vec<LinearScale> {
        self.rows.iter().map(|r| r.y_scale).collect()
    }

    /// Map a raw viewport position to row and domain values.
    pub fn pointer_to_domain(&self, pointer: Pos2) -> Option<DomainPoint> {
        coords::pointer_to_domain(pointer, &self.viewport, &self.x_scale, &self.row_scales())
    }

    /// Resolve a plot-local position to the element beneath it.
    ///
    /// Edge handles win over epoch bodies, and later epochs (drawn on top)
    /// win over earlier ones. Where both handles of a zero-width epoch
    /// overlap, the end handle wins so a drag extends to the right.
    pub fn hit_test(&self, local: Pos2, handle_width: f32) -> Hit {
        if local.x < 0.0 || local.x > self.plot_size.x || local.y < 0.0 || local.y > self.plot_size.y
        {
            return Hit::Outside;
        }
        let Some(row_index) = coords::row_index_at(local.y, self.row_height, self.rows.len()) else {
            return Hit::Outside;
        };
        let row = &self.rows[row_index];
        let epoch_ref = |e: &EpochOverlay| EpochRef {
            row: row_index,
            series_id: e.series_id,
            epoch_index: e.epoch_index,
        };
        for e in row.epochs.iter().rev() {
            if e.end_handle(handle_width).contains(local) {
                return Hit::EndHandle(epoch_ref(e));
            }
            if e.start_handle(handle_width).contains(local) {
                return Hit::StartHandle(epoch_ref(e));
            }
        }
        if let Some(e) = row.epochs.iter().rev().find(|e| e.rect.contains(local)) {
            return Hit::Epoch(epoch_ref(e));
        }
        Hit::Row {
            row: row_index,
            series_id: row.series_id,
        }
    }

    /// Crosshairs and label anchors for a tooltip.
    pub fn tooltip_geometry(&self, tooltip: &Tooltip, config: &StackConfig) -> TooltipGeometry {
        let x_px = self.x_scale.apply(tooltip.x) as f32;
        let crosshairs = self
            .rows
            .iter()
            .map(|r| {
                let (r0, r1) = r.y_scale.range();
                [pos2(x_px, r0 as f32), pos2(x_px, r1 as f32)]
            })
            .collect();
        let label_left = x_px + self.viewport.margin.left + config.tooltip.left;
        let x_text = config.format.tooltip_x.format(tooltip.x);
        let rows = tooltip
            .data
            .iter()
            .enumerate()
            .map(|(i, samples)| RowLabel {
                row: i,
                pos: pos2(label_left, self.row_height * (i as f32 + 0.5)),
                lines: samples
                    .iter()
                    .flatten()
                    .map(|s| config.format.tooltip_y.format(s.y))
                    .collect(),
            })
            .collect();
        TooltipGeometry {
            crosshairs,
            x_label_top: Label {
                pos: pos2(label_left, config.tooltip.top),
                text: x_text.clone(),
            },
            x_label_bottom: Label {
                pos: pos2(label_left, self.viewport.height + config.tooltip.bottom),
                text: x_text,
            },
            rows,
        }
    }
}

fn axis_ticks(scale: &LinearScale, count: usize, fmt: &ValueFormatter) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|v| Tick {
            value: v,
            pixel: scale.apply(v) as f32,
            label: Some(fmt.format(v)),
        })
        .collect()
}

/// Left-axis ticks of a row. Labels equal to the domain bounds would sit on
/// the row boundary and collide with the neighbouring row, so they are dropped.
fn row_ticks(scale: &LinearScale, count: usize, fmt: &ValueFormatter) -> Vec<Tick> {
    let d = scale.domain();
    axis_ticks(scale, count, fmt)
        .into_iter()
        .map(|mut t| {
            if t.value == d.min || t.value == d.max {
                t.label = None;
            }
            t
        })
        .collect()
}

fn trace_paths(series: &Series, x_scale: &LinearScale, y_scale: &LinearScale) -> Vec<TracePath> {
    series
        .traces
        .iter()
        .enumerate()
        .map(|(i, t)| TracePath {
            trace_index: i,
            points: t
                .samples
                .iter()
                .filter(|s| s.x.is_finite() && s.y.is_finite())
                .map(|s| pos2(x_scale.apply(s.x) as f32, y_scale.apply(s.y) as f32))
                .collect(),
        })
        .collect()
}

/// Epochs depend only on the horizontal scale; they cover the whole band.
fn epoch_overlays(series: &Series, band: &RowBand, x_scale: &LinearScale) -> Vec<EpochOverlay> {
    series
        .epochs
        .iter()
        .enumerate()
        .map(|(j, e)| {
            let x0 = x_scale.apply(e.start) as f32;
            let x1 = x_scale.apply(e.end) as f32;
            EpochOverlay {
                series_id: series.id,
                epoch_index: j,
                start: e.start,
                end: e.end,
                tag: e.tag.clone(),
                rect: Rect::from_min_max(
                    pos2(x0.min(x1), band.top),
                    pos2(x0.max(x1), band.bottom),
                ),
            }
        })
        .collect()
}

fn border_rects(v: &Viewport) -> [Rect; 4] {
    let m = v.margin;
    let (w, h) = (v.width, v.height);
    [
        Rect::from_min_size(pos2(0.0, 0.0), vec2(m.left, h)),
        Rect::from_min_size(pos2(m.left, 0.0), vec2(w - m.left, m.top)),
        Rect::from_min_size(pos2(m.left, h - m.bottom), vec2(w - m.left, m.bottom)),
        Rect::from_min_size(pos2(w - m.right, m.top), vec2(m.right, h - m.top - m.bottom)),
    ]
}
