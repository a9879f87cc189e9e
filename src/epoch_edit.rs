//! Epoch editing state machine.
//!
//! One drag gesture at a time creates a new epoch or moves one edge of an
//! existing epoch. Each transition returns at most one [`Intent`] for the
//! caller to dispatch; the machine itself never touches epoch storage.
//!
//! ```text
//! Idle --init_edit_epoch_start(None)--> CreatingNew  --stop--> Idle
//! Idle --init_edit_epoch_start(i)-----> DraggingStart --stop--> Idle
//! Idle --init_edit_epoch_end(i)-------> DraggingEnd   --stop--> Idle
//! DraggingStart <--continue_epoch crosses the anchor--> DraggingEnd
//! ```
//!
//! Updates are live: every [`EpochEditor::continue_epoch`] intent is meant
//! to be applied right away, and the stop calls re-send the final bounds as
//! the durable commit. [`EpochEditor::cancel`] rolls the epoch back.

use crate::data::series::{EpochTag, Series, SeriesId};
use crate::sink::Intent;

/// Which part of the epoch the pointer controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEdge {
    Start,
    End,
    New,
}

/// The in-progress gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub series_id: SeriesId,
    /// For a new epoch, the index it gets when appended.
    pub epoch_index: usize,
    /// The pinned bound.
    pub anchor_x: f64,
    /// The dragged bound, last pointer x.
    pub pointer_x: f64,
    /// Bounds before the gesture; `None` for a new epoch.
    original: Option<(f64, f64)>,
    /// Whether any bound was sent since the gesture began.
    moved: bool,
}

impl EditSession {
    /// Current bounds, always ordered.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.anchor_x.min(self.pointer_x),
            self.anchor_x.max(self.pointer_x),
        )
    }

    fn set_domain(&self) -> Intent {
        let (start, end) = self.bounds();
        Intent::SetEpochDomain {
            series_id: self.series_id,
            epoch_index: self.epoch_index,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    CreatingNew(EditSession),
    DraggingStart(EditSession),
    DraggingEnd(EditSession),
}

impl EditState {
    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditState::Idle => None,
            EditState::CreatingNew(s) | EditState::DraggingStart(s) | EditState::DraggingEnd(s) => {
                Some(s)
            }
        }
    }

    pub fn edge(&self) -> Option<EditEdge> {
        match self {
            EditState::Idle => None,
            EditState::CreatingNew(_) => Some(EditEdge::New),
            EditState::DraggingStart(_) => Some(EditEdge::Start),
            EditState::DraggingEnd(_) => Some(EditEdge::End),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EpochEditor {
    state: EditState,
    active_tag: Option<EpochTag>,
}

impl EpochEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.state.session()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, EditState::Idle)
    }

    /// Tag attached to epochs created from now on.
    pub fn set_active_tag(&mut self, tag: Option<EpochTag>) {
        self.active_tag = tag;
    }

    pub fn active_tag(&self) -> Option<&EpochTag> {
        self.active_tag.as_ref()
    }

    fn can_begin(&self, x: f64) -> bool {
        if !self.is_idle() {
            log::debug!("edit already in progress, ignoring new gesture");
            return false;
        }
        x.is_finite()
    }

    /// Begin creating a new epoch at `x` (`epoch_index == None`), or begin
    /// dragging the start of an existing epoch.
    ///
    /// A new epoch is created as `[x, x]` and appended to `series`, so its
    /// index is the current epoch count. Rejected while another gesture is
    /// active or when the epoch does not exist.
    pub fn init_edit_epoch_start(
        &mut self,
        series: &Series,
        epoch_index: Option<usize>,
        x: f64,
    ) -> Option<Intent> {
        if !self.can_begin(x) {
            return None;
        }
        match epoch_index {
            None => {
                let session = EditSession {
                    series_id: series.id,
                    epoch_index: series.epochs.len(),
                    anchor_x: x,
                    pointer_x: x,
                    original: None,
                    moved: false,
                };
                log::debug!(
                    "creating epoch {} on series {} at {x}",
                    session.epoch_index,
                    series.id
                );
                self.state = EditState::CreatingNew(session);
                Some(Intent::CreateEpoch {
                    series_id: series.id,
                    start: x,
                    end: x,
                    tag: self.active_tag.clone(),
                })
            }
            Some(i) => {
                let session = Self::drag_session(series, i, x, EditEdge::Start)?;
                log::debug!("dragging start of epoch {i} on series {}", series.id);
                self.state = EditState::DraggingStart(session);
                None
            }
        }
    }

    /// Begin dragging the end of an existing epoch; its start is pinned.
    pub fn init_edit_epoch_end(&mut self, series: &Series, epoch_index: usize, x: f64) -> Option<Intent> {
        if !self.can_begin(x) {
            return None;
        }
        let session = Self::drag_session(series, epoch_index, x, EditEdge::End)?;
        log::debug!("dragging end of epoch {epoch_index} on series {}", series.id);
        self.state = EditState::DraggingEnd(session);
        None
    }

    /// Session holding `held` of an existing epoch; the opposite bound is the anchor.
    fn drag_session(series: &Series, epoch_index: usize, x: f64, held: EditEdge) -> Option<EditSession> {
        let Some(epoch) = series.epoch(epoch_index) else {
            log::debug!("series {} has no epoch {epoch_index}", series.id);
            return None;
        };
        let anchor_x = if held == EditEdge::Start {
            epoch.end
        } else {
            epoch.start
        };
        Some(EditSession {
            series_id: series.id,
            epoch_index,
            anchor_x,
            pointer_x: x,
            original: Some((epoch.start, epoch.end)),
            moved: false,
        })
    }

    /// Move the held edge to `x`, swapping edges when `x` passes the anchor.
    /// Landing exactly on the anchor keeps the current edge.
    fn drag_to(mut s: EditSession, x: f64, held: EditEdge) -> (EditState, Option<Intent>) {
        s.pointer_x = x;
        s.moved = true;
        let intent = s.set_domain();
        let held = if x > s.anchor_x {
            EditEdge::End
        } else if x < s.anchor_x {
            EditEdge::Start
        } else {
            held
        };
        let next = match held {
            EditEdge::Start => EditState::DraggingStart(s),
            _ => EditState::DraggingEnd(s),
        };
        (next, Some(intent))
    }

    /// Move the dragged bound to `x`. If it crosses the pinned bound, the
    /// roles swap so the emitted interval always has `start <= end`.
    pub fn continue_epoch(&mut self, x: f64) -> Option<Intent> {
        if !x.is_finite() {
            return None;
        }
        let state = std::mem::take(&mut self.state);
        let (state, intent) = match state {
            EditState::Idle => (EditState::Idle, None),
            EditState::CreatingNew(mut s) => {
                s.pointer_x = x;
                s.moved = true;
                let intent = s.set_domain();
                (EditState::CreatingNew(s), Some(intent))
            }
            EditState::DraggingStart(s) => Self::drag_to(s, x, EditEdge::Start),
            EditState::DraggingEnd(s) => Self::drag_to(s, x, EditEdge::End),
        };
        if let Some(i) = &intent {
            log::trace!("epoch edit update {:?}", i);
        }
        self.state = state;
        intent
    }

    /// Commit the current bounds and return to idle. No-op while idle.
    pub fn stop_edit_epoch_start(&mut self) -> Option<Intent> {
        self.stop()
    }

    /// Commit the current bounds and return to idle. No-op while idle.
    ///
    /// Either stop call ends whichever gesture is active, since a drag that
    /// crossed its anchor changes which edge the pointer holds.
    pub fn stop_edit_epoch_end(&mut self) -> Option<Intent> {
        self.stop()
    }

    fn stop(&mut self) -> Option<Intent> {
        let state = std::mem::take(&mut self.state);
        let session = state.session()?;
        log::debug!(
            "committing epoch {} on series {}: {:?}",
            session.epoch_index,
            session.series_id,
            session.bounds()
        );
        session.moved.then(|| session.set_domain())
    }

    /// Abort the gesture: a new epoch is removed, a dragged one gets its
    /// original bounds back. No-op while idle.
    pub fn cancel(&mut self) -> Option<Intent> {
        let state = std::mem::take(&mut self.state);
        let session = state.session()?;
        log::debug!(
            "cancelling edit of epoch {} on series {}",
            session.epoch_index,
            session.series_id
        );
        match session.original {
            None => Some(Intent::RemoveEpoch {
                series_id: session.series_id,
                epoch_index: session.epoch_index,
            }),
            Some((start, end)) if session.moved => Some(Intent::SetEpochDomain {
                series_id: session.series_id,
                epoch_index: session.epoch_index,
                start,
                end,
            }),
            Some(_) => None,
        }
    }
}
