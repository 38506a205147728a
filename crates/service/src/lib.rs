//! Application services around the visibility pipeline.
//!
//! - `HiddenPreferencesService`: owns the registries, gates on loading and
//!   filters against snapshots
//! - `ModelVersionSummary`: the compact model-version payload
//! - `Tracker`: analytics events forwarded to an `EventSink`

pub mod hidden_preferences;
pub mod model_version;
pub mod track;

pub use hidden_preferences::HiddenPreferencesService;
pub use model_version::{
    FileRow, ModelVersionSummary, SummaryError, SummaryRequest, VersionRow, primary_file,
};
pub use track::{
    ActionEvent, EventSink, LogSink, MemorySink, PlayEvent, SearchEvent, ShareEvent, TrackEvent,
    Tracker,
};
