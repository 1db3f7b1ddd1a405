// src/events/providers/commudle.rs
//! Community-platform events feed. One GET, payload shaped
//! `{ "data": { "values": [ ... ] } }`, every field treated as optional.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::events::types::{DisplayEvent, EventKind, EventProvider};
use crate::events::{
    clamp_with_ellipsis, first_sentence, format_display_date, parse_timestamp, strip_html,
    PLACEHOLDER_IMAGE,
};

/// Descriptions on event cards are bounded to this many characters.
const DESCRIPTION_MAX: usize = 150;

#[derive(Debug, Deserialize)]
struct Payload {
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    values: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<i64>,
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    header_image_path: Option<String>,
    #[serde(default)]
    event_locations: Vec<RawLocation>,
    interested_members_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    name: Option<String>,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

pub struct CommudleProvider {
    mode: Mode,
}

impl CommudleProvider {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: super::feed_client(),
            },
        }
    }

    /// Parse a canned payload instead of the network. Used by tests.
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<DisplayEvent>> {
        let payload: Payload = serde_json::from_str(s).context("parsing commudle payload")?;
        let values = payload.data.map(|d| d.values).unwrap_or_default();

        let mut out = Vec::with_capacity(values.len());
        for raw in values {
            match normalize(raw) {
                Some(ev) => out.push(ev),
                None => tracing::debug!(provider = "Commudle", "skipping unidentifiable record"),
            }
        }
        Ok(out)
    }
}

/// One raw record to one display event. Returns `None` only when the record
/// is truly unparseable (no id, or no name/title at all); every other
/// missing field gets an explicit default.
fn normalize(raw: RawEvent) -> Option<DisplayEvent> {
    let id = raw.id?;
    let title = raw
        .name
        .or(raw.title)
        .filter(|t| !t.trim().is_empty())?;

    let description = raw
        .description
        .as_deref()
        .map(|html| {
            let text = strip_html(html);
            clamp_with_ellipsis(first_sentence(&text), DESCRIPTION_MAX)
        })
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Community event".to_string());

    let start_ts = raw.start_time.as_deref().and_then(parse_timestamp);
    let end_ts = raw.end_time.as_deref().and_then(parse_timestamp);

    let location = raw
        .event_locations
        .into_iter()
        .find_map(|l| l.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Online".to_string());

    Some(DisplayEvent {
        id: format!("commudle-{id}"),
        title,
        description,
        image_url: raw
            .header_image_path
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        kind: EventKind::Event,
        date: start_ts.as_ref().map(format_display_date),
        end_date: end_ts.as_ref().map(format_display_date),
        location: Some(location),
        participants: raw.interested_members_count,
        rating: None,
        prize: None,
        slug: None,
        sort_ts: start_ts,
    })
}

#[async_trait]
impl EventProvider for CommudleProvider {
    async fn fetch_events(&self) -> Result<Vec<DisplayEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .context("commudle http get()")?;
                let resp = resp
                    .error_for_status()
                    .context("commudle non-success status")?;
                let body = resp.text().await.context("commudle http .text()")?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "Commudle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_description_normalizes_to_plain_text() {
        let json = r#"{"data":{"values":[{
            "id": 7,
            "name": "Hello World Conclave",
            "description": "<p>Hello &amp; welcome</p>",
            "start_time": "2024-03-02T04:30:00.000Z",
            "event_locations": [{"name": "CGC Jhanjeri"}]
        }]}}"#;
        let out = CommudleProvider::parse_items_from_str(json).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "commudle-7");
        assert_eq!(out[0].description, "Hello & welcome");
        assert_eq!(out[0].location.as_deref(), Some("CGC Jhanjeri"));
        assert_eq!(out[0].date.as_deref(), Some("Mar 2, 2024"));
        assert_eq!(out[0].kind, EventKind::Event);
    }

    #[test]
    fn missing_optionals_get_defaults() {
        let json = r#"{"data":{"values":[{"id": 1, "name": "Bare"}]}}"#;
        let out = CommudleProvider::parse_items_from_str(json).unwrap();
        assert_eq!(out[0].description, "Community event");
        assert_eq!(out[0].location.as_deref(), Some("Online"));
        assert_eq!(out[0].image_url, PLACEHOLDER_IMAGE);
        assert!(out[0].date.is_none());
        assert!(out[0].sort_ts.is_none());
    }

    #[test]
    fn records_without_id_or_name_are_skipped() {
        let json = r#"{"data":{"values":[
            {"name": "no id"},
            {"id": 2},
            {"id": 3, "name": "kept"}
        ]}}"#;
        let out = CommudleProvider::parse_items_from_str(json).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "commudle-3");
    }

    #[test]
    fn long_description_prefers_sentence_boundary() {
        let body = format!(
            r#"{{"data":{{"values":[{{"id": 9, "name": "Long", "description": "{}"}}]}}}}"#,
            "First sentence stays. Second sentence is dropped entirely."
        );
        let out = CommudleProvider::parse_items_from_str(&body).unwrap();
        assert_eq!(out[0].description, "First sentence stays");
    }

    #[test]
    fn empty_payload_is_zero_items_not_an_error() {
        let out = CommudleProvider::parse_items_from_str(r#"{"data":{"values":[]}}"#).unwrap();
        assert!(out.is_empty());
        let out = CommudleProvider::parse_items_from_str(r#"{}"#).unwrap();
        assert!(out.is_empty());
    }
}
