// src/events/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which upstream family a display event came from. Serialized lowercase for
/// the UI ("event" / "hackathon").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Event,
    Hackathon,
}

/// The normalized display model. This is the only shape the carousel and the
/// rendering layer understand; raw provider payloads never leave `providers/`.
/// Serialized camelCase; the card components key off `imageUrl`/`endDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    /// Namespaced per source ("commudle-42", "devfolio-<uuid>", "static-1")
    /// so ids stay unique across one aggregation run.
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Serialized as `type`: the UI keys card styling off it.
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Ordering key taken from the original timestamp, never re-parsed from
    /// the formatted `date` string. Not part of the wire contract.
    #[serde(skip)]
    pub sort_ts: Option<DateTime<Utc>>,
}

/// Per-source outcome of one aggregation run. A failed source is a value
/// here, not an error: the aggregator folds these into a soft notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Loaded { count: usize },
    Empty,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: &'static str,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

#[async_trait::async_trait]
pub trait EventProvider: Send + Sync {
    /// Fetch and normalize this source's events. Network errors, non-2xx
    /// statuses and malformed payloads surface as `Err`; the aggregator
    /// converts them into an empty contribution.
    async fn fetch_events(&self) -> Result<Vec<DisplayEvent>>;
    fn name(&self) -> &'static str;
}
