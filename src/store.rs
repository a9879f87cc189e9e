//! In-memory store: the reference backend for [`SeriesProvider`] and
//! [`IntentSink`], used by hosts without their own state layer and by tests.

use crate::data::domain::Domain;
use crate::data::series::{Epoch, EpochTag, Series, SeriesId};
use crate::error::StoreError;
use crate::sink::{Intent, IntentSink, SeriesProvider};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: Vec<Series>,
    epoch_tags: Vec<EpochTag>,
    /// Explicit domain; `None` fits the domain to the data on every read.
    domain: Option<Domain>,
    next_id: SeriesId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.insert_series(series);
        self
    }

    pub fn with_epoch_tags(mut self, tags: Vec<EpochTag>) -> Self {
        self.epoch_tags = tags;
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn set_domain(&mut self, domain: Option<Domain>) {
        self.domain = domain;
    }

    /// Add a series keeping its id. Later generated ids stay above it.
    pub fn insert_series(&mut self, series: Series) -> SeriesId {
        let id = series.id;
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.series.push(series);
        id
    }

    fn series_mut(&mut self, id: SeriesId) -> Result<&mut Series, StoreError> {
        self.series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::UnknownSeries(id))
    }

    fn epoch_mut(&mut self, series_id: SeriesId, epoch_index: usize) -> Result<&mut Epoch, StoreError> {
        self.series_mut(series_id)?
            .epochs
            .get_mut(epoch_index)
            .ok_or(StoreError::UnknownEpoch {
                series_id,
                epoch_index,
            })
    }

    /// Apply one intent.
    pub fn apply(&mut self, intent: Intent) -> Result<(), StoreError> {
        match intent {
            Intent::CreateSeries { name, traces } => {
                let mut s = Series::new(self.next_id, name);
                s.traces = traces;
                self.insert_series(s);
            }
            Intent::RemoveSeries { series_id } => {
                let before = self.series.len();
                self.series.retain(|s| s.id != series_id);
                if self.series.len() == before {
                    return Err(StoreError::UnknownSeries(series_id));
                }
            }
            Intent::CreateEpoch {
                series_id,
                start,
                end,
                tag,
            } => {
                self.series_mut(series_id)?
                    .epochs
                    .push(Epoch::new(start, end, tag));
            }
            Intent::RemoveEpoch {
                series_id,
                epoch_index,
            } => {
                let s = self.series_mut(series_id)?;
                if epoch_index >= s.epochs.len() {
                    return Err(StoreError::UnknownEpoch {
                        series_id,
                        epoch_index,
                    });
                }
                s.epochs.remove(epoch_index);
            }
            Intent::SetEpochDomain {
                series_id,
                epoch_index,
                start,
                end,
            } => {
                let e = self.epoch_mut(series_id, epoch_index)?;
                e.start = start.min(end);
                e.end = start.max(end);
            }
            Intent::SetZoom { x } => {
                let mut domain = self.domain();
                domain.x = x;
                self.domain = Some(domain);
            }
            Intent::SetName { series_id, name } => {
                self.series_mut(series_id)?.name = name;
            }
            Intent::SetSeriesMetadata {
                series_id,
                metadata,
            } => {
                self.series_mut(series_id)?.metadata = metadata;
            }
        }
        Ok(())
    }
}

impl IntentSink for MemoryStore {
    fn dispatch(&mut self, intent: Intent) {
        log::trace!("applying {:?}", intent);
        if let Err(e) = self.apply(intent) {
            log::warn!("dropping intent: {e}");
        }
    }
}

impl SeriesProvider for MemoryStore {
    fn series(&self) -> &[Series] {
        &self.series
    }

    fn epoch_tags(&self) -> &[EpochTag] {
        &self.epoch_tags
    }

    fn domain(&self) -> Domain {
        self.domain
            .clone()
            .unwrap_or_else(|| Domain::fit(&self.series))
    }
}
