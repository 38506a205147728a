//! Analytics events: share, action, search and play.
//!
//! A `Tracker` turns typed calls into `TrackEvent`s and forwards each one to
//! an `EventSink`. Delivery is the sink's business.

use std::future::Future;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEvent {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    #[serde(rename = "type")]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEvent {
    pub query: String,
    pub index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    pub video_id: u32,
    #[serde(default)]
    pub play_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackEvent {
    Share(ShareEvent),
    Action(ActionEvent),
    Search(SearchEvent),
    Play(PlayEvent),
}

impl TrackEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TrackEvent::Share(_) => "share",
            TrackEvent::Action(_) => "action",
            TrackEvent::Search(_) => "search",
            TrackEvent::Play(_) => "play",
        }
    }
}

/// Destination for tracked events.
pub trait EventSink: Send + Sync {
    fn send(&self, event: TrackEvent) -> impl Future<Output = Result<()>> + Send;
}

/// Emits each event as a `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    async fn send(&self, event: TrackEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)?;
        info!(target: "track", kind = event.kind(), %payload, "Tracked event");
        Ok(())
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TrackEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    async fn send(&self, event: TrackEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow!("Event buffer poisoned"))?
            .push(event);
        Ok(())
    }
}

pub struct Tracker<S> {
    sink: S,
}

impl<S: EventSink> Tracker<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn track_share(&self, event: ShareEvent) -> Result<()> {
        self.sink.send(TrackEvent::Share(event)).await
    }

    pub async fn track_action(&self, event: ActionEvent) -> Result<()> {
        self.sink.send(TrackEvent::Action(event)).await
    }

    pub async fn track_search(&self, event: SearchEvent) -> Result<()> {
        self.sink.send(TrackEvent::Search(event)).await
    }

    pub async fn track_play(&self, event: PlayEvent) -> Result<()> {
        self.sink.send(TrackEvent::Play(event)).await
    }
}
