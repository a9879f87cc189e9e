//! Intents emitted toward the external store, and the traits a store
//! implements to feed and receive them.
//!
//! The core never mutates series data. It reads through [`SeriesProvider`]
//! and requests changes by dispatching [`Intent`]s to an [`IntentSink`]:
//! - [`crate::store::MemoryStore`] applies intents directly,
//! - [`IntentSender`] forwards them over a channel to a store living elsewhere,
//! - `Vec<Intent>` just records them.

use std::sync::mpsc::{self, Receiver, SendError, Sender};

use serde_json::{Map, Value};

use crate::data::domain::{Domain, Extent};
use crate::data::series::{EpochTag, Series, SeriesId, Trace};

/// A change request for the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Append a new series; the store assigns its id.
    CreateSeries {
        name: String,
        traces: Vec<Trace>,
    },
    RemoveSeries {
        series_id: SeriesId,
    },
    /// Append an epoch to a series. It becomes the series' last epoch.
    CreateEpoch {
        series_id: SeriesId,
        start: f64,
        end: f64,
        tag: Option<EpochTag>,
    },
    RemoveEpoch {
        series_id: SeriesId,
        epoch_index: usize,
    },
    /// Replace the bounds of an existing epoch.
    SetEpochDomain {
        series_id: SeriesId,
        epoch_index: usize,
        start: f64,
        end: f64,
    },
    /// Change the visible x range.
    SetZoom {
        x: Extent,
    },
    SetName {
        series_id: SeriesId,
        name: String,
    },
    SetSeriesMetadata {
        series_id: SeriesId,
        metadata: Map<String, Value>,
    },
}

/// Receiver of intents.
pub trait IntentSink {
    fn dispatch(&mut self, intent: Intent);

    fn dispatch_all(&mut self, intents: impl IntoIterator<Item = Intent>)
    where
        Self: Sized,
    {
        for intent in intents {
            self.dispatch(intent);
        }
    }
}

impl IntentSink for Vec<Intent> {
    fn dispatch(&mut self, intent: Intent) {
        self.push(intent);
    }
}

/// Read access to the data rendered by the stack.
pub trait SeriesProvider {
    /// Rows, top to bottom.
    fn series(&self) -> &[Series];

    /// Tags available for new epochs.
    fn epoch_tags(&self) -> &[EpochTag];

    /// Current domain. Implementations may fit it from the data.
    fn domain(&self) -> Domain;

    fn find_series(&self, id: SeriesId) -> Option<&Series> {
        self.series().iter().find(|s| s.id == id)
    }
}

/// Sending half of an intent channel.
#[derive(Clone)]
pub struct IntentSender {
    tx: Sender<Intent>,
}

/// Create a channel carrying intents to a store on the receiving side.
pub fn channel() -> (IntentSender, Receiver<Intent>) {
    let (tx, rx) = mpsc::channel();
    (IntentSender { tx }, rx)
}

impl IntentSender {
    pub fn send(&self, intent: Intent) -> Result<(), SendError<Intent>> {
        self.tx.send(intent)
    }

    pub fn create_epoch(
        &self,
        series_id: SeriesId,
        start: f64,
        end: f64,
        tag: Option<EpochTag>,
    ) -> Result<(), SendError<Intent>> {
        self.send(Intent::CreateEpoch {
            series_id,
            start,
            end,
            tag,
        })
    }

    pub fn remove_epoch(
        &self,
        series_id: SeriesId,
        epoch_index: usize,
    ) -> Result<(), SendError<Intent>> {
        self.send(Intent::RemoveEpoch {
            series_id,
            epoch_index,
        })
    }

    pub fn set_zoom(&self, x: Extent) -> Result<(), SendError<Intent>> {
        self.send(Intent::SetZoom { x })
    }
}

impl IntentSink for IntentSender {
    fn dispatch(&mut self, intent: Intent) {
        if let Err(e) = self.tx.send(intent) {
            log::warn!("intent receiver dropped, discarding {:?}", e.0);
        }
    }
}
