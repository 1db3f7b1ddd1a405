// src/events/providers/devfolio.rs
//! Hackathon-platform feed. One GET per configured sub-source, each payload
//! shaped `{ "pageProps": { "hackathon": { ... } } }`. A failing sub-source
//! contributes zero items; only a failure of every sub-source is reported
//! upward as this provider's failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use crate::events::types::{DisplayEvent, EventKind, EventProvider};
use crate::events::{
    clamp_with_ellipsis, format_display_date, parse_timestamp, strip_markdown, PLACEHOLDER_IMAGE,
};

/// Hackathon card descriptions are tighter than event cards.
const DESCRIPTION_MAX: usize = 70;

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(rename = "pageProps")]
    page_props: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    hackathon: Option<RawHackathon>,
}

#[derive(Debug, Deserialize)]
struct RawHackathon {
    uuid: Option<String>,
    name: Option<String>,
    tagline: Option<String>,
    desc: Option<String>,
    starts_at: Option<String>,
    ends_at: Option<String>,
    cover_img: Option<String>,
    location: Option<String>,
    participants_count: Option<u32>,
    rating: Option<f32>,
    slug: Option<String>,
}

/// Prize labels are a closed, hardcoded enumeration keyed on the event name.
/// Intentionally not generalized.
fn prize_label(name: &str) -> &'static str {
    if name.contains("3.0") {
        "$100+"
    } else if name.contains("2.0") {
        "$953+"
    } else if name.contains("Hack-n-Win") {
        "Prizes"
    } else {
        "$652+"
    }
}

enum Mode {
    Fixtures(Vec<String>),
    Http {
        urls: Vec<String>,
        client: reqwest::Client,
    },
}

pub struct DevfolioProvider {
    mode: Mode,
}

impl DevfolioProvider {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            mode: Mode::Http {
                urls,
                client: super::feed_client(),
            },
        }
    }

    /// Parse canned payloads (one string per sub-source) instead of the
    /// network. Used by tests.
    pub fn from_fixture_strs<S: AsRef<str>>(payloads: &[S]) -> Self {
        Self {
            mode: Mode::Fixtures(payloads.iter().map(|s| s.as_ref().to_string()).collect()),
        }
    }

    fn parse_record_from_str(s: &str) -> Result<Option<RawHackathon>> {
        let page: Page = serde_json::from_str(s).context("parsing devfolio payload")?;
        Ok(page.page_props.and_then(|p| p.hackathon))
    }

    async fn fetch_one(client: &reqwest::Client, url: &str) -> Result<Option<RawHackathon>> {
        let resp = client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("devfolio http get {url}"))?;
        let resp = resp
            .error_for_status()
            .with_context(|| format!("devfolio non-success status for {url}"))?;
        let body = resp.text().await.context("devfolio http .text()")?;
        Self::parse_record_from_str(&body)
    }

    fn normalize_all(raws: Vec<RawHackathon>) -> Vec<DisplayEvent> {
        raws.into_iter()
            .enumerate()
            .filter_map(|(i, raw)| normalize(raw, i))
            .collect()
    }
}

/// One raw hackathon to one display event. `name` is the only required
/// field; a missing uuid falls back to a positional id to keep the
/// uniqueness invariant.
fn normalize(raw: RawHackathon, position: usize) -> Option<DisplayEvent> {
    let name = raw.name.filter(|n| !n.trim().is_empty())?;

    let description = raw
        .desc
        .as_deref()
        .map(strip_markdown)
        .filter(|d| !d.is_empty())
        .or(raw.tagline.filter(|t| !t.trim().is_empty()))
        .map(|d| clamp_with_ellipsis(&d, DESCRIPTION_MAX))
        .unwrap_or_else(|| "Hackathon event".to_string());

    let start_ts = raw.starts_at.as_deref().and_then(parse_timestamp);
    let end_ts = raw.ends_at.as_deref().and_then(parse_timestamp);

    let id = match raw.uuid.filter(|u| !u.trim().is_empty()) {
        Some(uuid) => format!("devfolio-{uuid}"),
        None => format!("devfolio-hackathon-{position}"),
    };

    Some(DisplayEvent {
        id,
        prize: Some(prize_label(&name).to_string()),
        description,
        image_url: raw
            .cover_img
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        kind: EventKind::Hackathon,
        date: start_ts.as_ref().map(format_display_date),
        end_date: end_ts.as_ref().map(format_display_date),
        location: raw.location.filter(|l| !l.trim().is_empty()),
        participants: raw.participants_count,
        rating: raw.rating,
        slug: raw.slug,
        title: name,
        sort_ts: start_ts,
    })
}

#[async_trait]
impl EventProvider for DevfolioProvider {
    async fn fetch_events(&self) -> Result<Vec<DisplayEvent>> {
        let raws = match &self.mode {
            Mode::Fixtures(payloads) => {
                let mut raws = Vec::with_capacity(payloads.len());
                for p in payloads {
                    if let Some(raw) = Self::parse_record_from_str(p)? {
                        raws.push(raw);
                    }
                }
                raws
            }
            Mode::Http { urls, client } => {
                if urls.is_empty() {
                    return Ok(Vec::new());
                }
                let fetches = urls.iter().map(|u| Self::fetch_one(client, u));
                let results = futures::future::join_all(fetches).await;

                let mut raws = Vec::with_capacity(urls.len());
                let mut last_err = None;
                for (url, res) in urls.iter().zip(results) {
                    match res {
                        Ok(Some(raw)) => raws.push(raw),
                        Ok(None) => {
                            tracing::warn!(provider = "Devfolio", url, "payload had no hackathon");
                        }
                        Err(e) => {
                            tracing::warn!(error = ?e, provider = "Devfolio", url, "sub-source error");
                            counter!("event_source_errors_total").increment(1);
                            last_err = Some(e);
                        }
                    }
                }
                // All sub-sources down is a provider-level failure; any
                // partial success is a normal (possibly shorter) result.
                if raws.is_empty() {
                    if let Some(e) = last_err {
                        return Err(e);
                    }
                }
                raws
            }
        };
        Ok(Self::normalize_all(raws))
    }

    fn name(&self) -> &'static str {
        "Devfolio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r###"{"pageProps":{"hackathon":{
        "uuid": "05bc844f94594179b6ac93dcb8274c06",
        "name": "Hack-N-Win 2.0",
        "tagline": "Hack the Winter 2.0. Win the season.",
        "desc": "## Hack the Winter 2.0\n**Welcome** to the *epicenter* of innovation!",
        "starts_at": "2025-02-28T18:30:00.000Z",
        "ends_at": "2025-03-17T18:30:00.000Z",
        "cover_img": "https://assets.devfolio.co/cover/36.png",
        "location": "Chandigarh, Punjab, India",
        "participants_count": 500,
        "rating": 4.4,
        "slug": "hacknwin-2-0"
    }}}"###;

    #[test]
    fn record_normalizes_with_markdown_stripped() {
        let raw = DevfolioProvider::parse_record_from_str(SAMPLE)
            .unwrap()
            .unwrap();
        let ev = normalize(raw, 0).unwrap();
        assert_eq!(ev.id, "devfolio-05bc844f94594179b6ac93dcb8274c06");
        assert_eq!(ev.kind, EventKind::Hackathon);
        assert_eq!(ev.description, "Hack the Winter 2.0");
        assert_eq!(ev.date.as_deref(), Some("Feb 28, 2025"));
        assert_eq!(ev.participants, Some(500));
        assert_eq!(ev.prize.as_deref(), Some("$953+"));
        assert_eq!(ev.slug.as_deref(), Some("hacknwin-2-0"));
    }

    #[test]
    fn prize_mapping_is_the_literal_enumeration() {
        assert_eq!(prize_label("Hack-N-Win 3.0"), "$100+");
        assert_eq!(prize_label("Hack-N-Win 2.0"), "$953+");
        assert_eq!(prize_label("Hack-n-Win"), "Prizes");
        assert_eq!(prize_label("InnoSprint"), "$652+");
    }

    #[test]
    fn missing_uuid_falls_back_to_positional_id() {
        let raw = RawHackathon {
            uuid: None,
            name: Some("InnoSprint".to_string()),
            tagline: None,
            desc: None,
            starts_at: None,
            ends_at: None,
            cover_img: None,
            location: None,
            participants_count: None,
            rating: None,
            slug: None,
        };
        let ev = normalize(raw, 3).unwrap();
        assert_eq!(ev.id, "devfolio-hackathon-3");
        assert_eq!(ev.description, "Hackathon event");
        assert_eq!(ev.image_url, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn nameless_records_are_skipped() {
        let json = r#"{"pageProps":{"hackathon":{"uuid":"x"}}}"#;
        let raw = DevfolioProvider::parse_record_from_str(json).unwrap().unwrap();
        assert!(normalize(raw, 0).is_none());
    }

    #[test]
    fn tagline_is_the_description_fallback() {
        let json = r#"{"pageProps":{"hackathon":{
            "uuid":"y", "name":"Hack-n-Win", "tagline":"Hack the Winter. Win the season."
        }}}"#;
        let raw = DevfolioProvider::parse_record_from_str(json).unwrap().unwrap();
        let ev = normalize(raw, 0).unwrap();
        assert_eq!(ev.description, "Hack the Winter. Win the season.");
        assert_eq!(ev.prize.as_deref(), Some("Prizes"));
    }

    #[tokio::test]
    async fn fixture_mode_concatenates_sub_sources() {
        let empty = r#"{"pageProps":{}}"#;
        let provider = DevfolioProvider::from_fixture_strs(&[SAMPLE, empty]);
        let out = provider.fetch_events().await.unwrap();
        assert_eq!(out.len(), 1);
    }
}
