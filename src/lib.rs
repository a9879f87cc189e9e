//! stackplot crate root: re-exports and module wiring.
//!
//! Several time-series rows stacked in one chart, sharing the horizontal
//! (time) axis while each row keeps its own vertical scale, with labeled
//! intervals ("epochs") that can be created and resized by dragging.
//!
//! Modules:
//! - `data`: series, traces, epochs, domains and nearest-sample lookup
//! - `scale`: linear scales and tick generation
//! - `coords`: pointer position to row and domain values
//! - `layout`: row bands, axes, overlays and tooltip geometry
//! - `epoch_edit`: the epoch editing state machine
//! - `sink`: intents and the store-facing traits
//! - `store`: in-memory store
//! - `stack`: the pointer-driven controller
//! - `config` / `format`: configuration and value formatting

pub mod config;
pub mod coords;
pub mod data;
pub mod epoch_edit;
pub mod error;
pub mod format;
pub mod layout;
pub mod scale;
pub mod sink;
pub mod stack;
pub mod store;

// Public re-exports for a compact external API
pub use config::StackConfig;
pub use data::domain::{Domain, Extent, YDomain};
pub use data::nearest::{nearest, Tooltip};
pub use data::series::{Epoch, EpochTag, Sample, Series, SeriesId, Trace};
pub use epoch_edit::{EditEdge, EditState, EpochEditor};
pub use error::{ConfigError, StoreError};
pub use format::ValueFormatter;
pub use layout::{StackLayout, StackedLayout, Viewport};
pub use scale::LinearScale;
pub use sink::{channel, Intent, IntentSender, IntentSink, SeriesProvider};
pub use stack::{SeriesStack, Tool};
pub use store::MemoryStore;
