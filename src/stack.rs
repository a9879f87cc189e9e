//! `SeriesStack`: the interactive controller tying layout, tooltip lookup
//! and epoch editing to pointer events.
//!
//! The host forwards raw pointer events (viewport coordinates) together with
//! its store; the stack reads series through [`SeriesProvider`] and writes
//! through [`IntentSink`]. Layout is recomputed for every call.

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::config::StackConfig;
use crate::data::domain::Extent;
use crate::data::nearest::{tooltip_data, Tooltip};
use crate::data::series::{EpochTag, SeriesId};
use crate::epoch_edit::EpochEditor;
use crate::layout::{Hit, StackLayout, StackedLayout, TooltipGeometry, Viewport};
use crate::sink::{Intent, IntentSink, SeriesProvider};

/// What a primary press on an empty part of a row does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Hover readouts only; epoch edges can still be dragged.
    #[default]
    Inspect,
    /// Pressing on a row starts a new epoch.
    Annotate,
}

pub struct SeriesStack {
    config: StackConfig,
    viewport: Viewport,
    editor: EpochEditor,
    tooltip: Option<Tooltip>,
    tool: Tool,
}

impl SeriesStack {
    pub fn new(config: StackConfig, width: f32, height: f32) -> Self {
        let viewport = config.viewport(width, height);
        Self {
            config,
            viewport,
            editor: EpochEditor::new(),
            tooltip: None,
            tool: Tool::default(),
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = self.config.viewport(width, height);
    }

    pub fn editor(&self) -> &EpochEditor {
        &self.editor
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Tag attached to newly created epochs.
    pub fn set_active_tag(&mut self, tag: Option<EpochTag>) {
        self.editor.set_active_tag(tag);
    }

    /// Layout for the current data, `None` when there are no rows.
    pub fn layout<P: SeriesProvider + ?Sized>(&self, provider: &P) -> Option<StackLayout> {
        StackedLayout::compute(provider.series(), &provider.domain(), &self.config, self.viewport)
    }

    /// Tooltip geometry for the current hover state.
    pub fn tooltip_geometry(&self, layout: &StackLayout) -> Option<TooltipGeometry> {
        self.tooltip
            .as_ref()
            .map(|t| layout.tooltip_geometry(t, &self.config))
    }

    /// Pointer moved. Refreshes the tooltip and, during a drag, moves the
    /// dragged epoch bound. Moves outside the plot area hide the tooltip and
    /// leave the drag at its last bound.
    pub fn on_pointer_move<S>(&mut self, pos: Pos2, store: &mut S)
    where
        S: SeriesProvider + IntentSink + ?Sized,
    {
        let Some(layout) = self.layout(store) else {
            self.tooltip = None;
            return;
        };
        if !self.viewport.contains_plot(pos) {
            self.tooltip = None;
            return;
        }
        let Some(point) = layout.pointer_to_domain(pos) else {
            self.tooltip = None;
            return;
        };
        self.tooltip = Some(Tooltip {
            data: tooltip_data(store.series(), point.x),
            x: point.x,
            y: point.y,
            row_index: point.row_index,
        });
        if !self.editor.is_idle() {
            let x = layout.x_domain.clamp(point.x);
            if let Some(intent) = self.editor.continue_epoch(x) {
                store.dispatch(intent);
            }
        }
    }

    /// Pointer left the chart. The tooltip goes away; an active drag stays
    /// open until the host delivers the pointer-up.
    pub fn on_pointer_leave(&mut self) {
        self.tooltip = None;
    }

    /// Primary press. Starts a drag on an epoch edge, or a new epoch on an
    /// empty part of a row when the annotate tool is active.
    pub fn on_pointer_down<S>(&mut self, pos: Pos2, store: &mut S)
    where
        S: SeriesProvider + IntentSink + ?Sized,
    {
        let Some(layout) = self.layout(store) else {
            return;
        };
        let local = self.viewport.to_plot_local(pos);
        let hit = layout.hit_test(local, self.config.handle_width);
        let x = layout.x_domain.clamp(layout.x_scale.invert(local.x as f64));
        let intent = match hit {
            Hit::StartHandle(e) => store
                .find_series(e.series_id)
                .and_then(|s| self.editor.init_edit_epoch_start(s, Some(e.epoch_index), x)),
            Hit::EndHandle(e) => store
                .find_series(e.series_id)
                .and_then(|s| self.editor.init_edit_epoch_end(s, e.epoch_index, x)),
            Hit::Epoch(e) if self.tool == Tool::Annotate => self.begin_new(store, e.series_id, x),
            Hit::Row { series_id, .. } if self.tool == Tool::Annotate => {
                self.begin_new(store, series_id, x)
            }
            other => {
                log::trace!("press on {:?} ignored", other);
                None
            }
        };
        if let Some(intent) = intent {
            store.dispatch(intent);
        }
    }

    fn begin_new<S>(&mut self, store: &S, series_id: SeriesId, x: f64) -> Option<Intent>
    where
        S: SeriesProvider + ?Sized,
    {
        let series = store.find_series(series_id)?;
        self.editor.init_edit_epoch_start(series, None, x)
    }

    /// Primary release: commits the active drag, if any.
    pub fn on_pointer_up<S: IntentSink + ?Sized>(&mut self, store: &mut S) {
        if let Some(intent) = self.editor.stop_edit_epoch_end() {
            store.dispatch(intent);
        }
    }

    /// Abort the active drag and restore the epoch.
    pub fn cancel_edit<S: IntentSink + ?Sized>(&mut self, store: &mut S) {
        if let Some(intent) = self.editor.cancel() {
            store.dispatch(intent);
        }
    }

    /// Zoom the x axis to the range between two raw pointer x positions
    /// (a brush selection). Empty selections are ignored.
    pub fn zoom_to_pixels<S>(&mut self, x0: f32, x1: f32, store: &mut S)
    where
        S: SeriesProvider + IntentSink + ?Sized,
    {
        let Some(layout) = self.layout(store) else {
            return;
        };
        let left = self.viewport.margin.left;
        let a = layout.x_scale.invert((x0 - left) as f64);
        let b = layout.x_scale.invert((x1 - left) as f64);
        let x = Extent::spanning(a, b);
        if x.is_degenerate() || !x.span().is_finite() {
            log::debug!("ignoring empty zoom selection");
            return;
        }
        store.dispatch(Intent::SetZoom { x });
    }
}
