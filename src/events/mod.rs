// src/events/mod.rs
pub mod fallback;
pub mod providers;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

use crate::config::EventSourcesConfig;
use crate::events::providers::{commudle::CommudleProvider, devfolio::DevfolioProvider};
use crate::events::types::{DisplayEvent, EventProvider, SourceOutcome, SourceReport};

/// Hard cap on the aggregate list regardless of combined upstream volume.
pub const MAX_EVENTS: usize = 12;

/// Shown when a source record carries no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/images/events/placeholder.png";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("events_fetched_total", "Events parsed from providers.");
        describe_counter!("events_kept_total", "Events kept after merge + cap.");
        describe_counter!(
            "event_source_errors_total",
            "Provider fetch/parse errors (recovered as empty)."
        );
        describe_counter!(
            "events_fallback_total",
            "Aggregations that served the static fallback list."
        );
        describe_gauge!("events_last_run_ts", "Unix ts of the last aggregation.");
    });
}

/// Strip HTML tags, decode entities, and collapse whitespace.
/// Tags go first so literal `&lt;p&gt;` in the source never turns into markup.
pub fn strip_html(s: &str) -> String {
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"<[^>]*>").unwrap());
    let out = re_tags.replace_all(s, " ").to_string();

    let out = html_escape::decode_html_entities(&out).to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Strip markdown headers and emphasis markers, keep the first line.
pub fn strip_markdown(s: &str) -> String {
    static RE_HEADERS: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_HEADERS.get_or_init(|| regex::Regex::new(r"(?m)^#+\s*").unwrap());
    let out = re.replace_all(s, "").replace("**", "").replace('*', "");
    out.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}

/// First sentence-like segment (split on `.`, `!`, `?`), falling back to the
/// whole text when there is no terminator.
pub fn first_sentence(s: &str) -> &str {
    let seg = s
        .split(['.', '!', '?'])
        .map(str::trim)
        .find(|seg| !seg.is_empty())
        .unwrap_or("");
    if seg.is_empty() {
        s.trim()
    } else {
        seg
    }
}

/// Bound `s` to `max` characters, appending `...` when it had to be cut.
/// Counts characters, not bytes, so multi-byte text never splits mid-char.
pub fn clamp_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Parse an upstream ISO-8601 timestamp. Both sources emit RFC 3339 strings.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fixed en-US style display date ("Mar 2, 2024"), independent of host locale.
pub fn format_display_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Merged, sorted, capped result of one aggregation run.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub items: Vec<DisplayEvent>,
    /// Soft warning for optional display ("some sources had issues"); never
    /// an error; the items list is always populated.
    pub notice: Option<String>,
    pub reports: Vec<SourceReport>,
}

pub struct EventAggregator {
    providers: Vec<Box<dyn EventProvider>>,
    max_items: usize,
}

impl EventAggregator {
    pub fn new(providers: Vec<Box<dyn EventProvider>>) -> Self {
        Self {
            providers,
            max_items: MAX_EVENTS,
        }
    }

    /// Production wiring: one Commudle feed + the configured Devfolio set.
    pub fn from_config(cfg: &EventSourcesConfig) -> Self {
        Self::new(vec![
            Box::new(CommudleProvider::from_url(cfg.commudle_url.clone())),
            Box::new(DevfolioProvider::from_urls(cfg.devfolio_urls.clone())),
        ])
    }

    /// Fetch every source concurrently, tolerate per-source failure, merge,
    /// sort by original start time (descending, missing timestamps sink),
    /// cap at `max_items`. Guaranteed non-empty: an empty merge degrades to
    /// the bundled static list.
    pub async fn fetch_and_normalize(&self) -> Aggregation {
        ensure_metrics_described();

        let fetches = self.providers.iter().map(|p| p.fetch_events());
        let results = futures::future::join_all(fetches).await;

        let mut merged: Vec<DisplayEvent> = Vec::new();
        let mut reports = Vec::with_capacity(self.providers.len());
        let mut failures: Vec<String> = Vec::new();

        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(items) => {
                    counter!("events_fetched_total").increment(items.len() as u64);
                    let outcome = if items.is_empty() {
                        SourceOutcome::Empty
                    } else {
                        SourceOutcome::Loaded { count: items.len() }
                    };
                    reports.push(SourceReport {
                        source: provider.name(),
                        outcome,
                    });
                    merged.extend(items);
                }
                Err(e) => {
                    tracing::warn!(error = ?e, provider = provider.name(), "source unavailable");
                    counter!("event_source_errors_total").increment(1);
                    failures.push(format!("{}: {e:#}", provider.name()));
                    reports.push(SourceReport {
                        source: provider.name(),
                        outcome: SourceOutcome::Failed {
                            reason: format!("{e:#}"),
                        },
                    });
                }
            }
        }

        let mut notice = if failures.is_empty() {
            None
        } else {
            Some(format!(
                "Some data sources had issues: {}. Showing available data.",
                failures.join("; ")
            ))
        };

        let items = if merged.is_empty() {
            counter!("events_fallback_total").increment(1);
            if notice.is_none() {
                notice = Some("No live events available. Showing sample events.".to_string());
            }
            fallback::fallback_events()
        } else {
            merge_sort_cap(merged, self.max_items)
        };

        counter!("events_kept_total").increment(items.len() as u64);
        gauge!("events_last_run_ts").set(Utc::now().timestamp().max(0) as f64);

        Aggregation {
            items,
            notice,
            reports,
        }
    }
}

/// Dedup by id (first occurrence wins), sort descending by the original
/// timestamp with missing timestamps behaving as epoch 0, cap the length.
pub fn merge_sort_cap(events: Vec<DisplayEvent>, max_items: usize) -> Vec<DisplayEvent> {
    let mut seen: HashSet<String> = HashSet::with_capacity(events.len());
    let mut out: Vec<DisplayEvent> = events
        .into_iter()
        .filter(|ev| seen.insert(ev.id.clone()))
        .collect();

    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    out.sort_by(|a, b| {
        b.sort_ts
            .unwrap_or(epoch)
            .cmp(&a.sort_ts.unwrap_or(epoch))
    });
    out.truncate(max_items);
    out
}
