// src/config.rs
//! Event-source endpoints. Resolution order: $EVENT_SOURCES_PATH, then
//! config/event_sources.toml, then the built-in defaults, so deployments
//! can repoint the feeds without a rebuild.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_EVENT_SOURCES_PATH: &str = "EVENT_SOURCES_PATH";
pub const DEFAULT_EVENT_SOURCES_PATH: &str = "config/event_sources.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSourcesConfig {
    pub commudle_url: String,
    #[serde(default)]
    pub devfolio_urls: Vec<String>,
}

impl Default for EventSourcesConfig {
    fn default() -> Self {
        Self {
            commudle_url:
                "https://www.commudle.com/api/v2/communities/d4-community/community_events"
                    .to_string(),
            devfolio_urls: vec![
                "https://innosprint.devfolio.co/_next/data/ff9W3m0EDh9C-2EzENT45/hackathon3/innosprint.devfolio.co/overview.json".to_string(),
                "https://hacknwin.devfolio.co/_next/data/ff9W3m0EDh9C-2EzENT45/hackathon3/hacknwin.devfolio.co/overview.json".to_string(),
                "https://hacknwin-2-0.devfolio.co/_next/data/ff9W3m0EDh9C-2EzENT45/hackathon3/hacknwin-2-0.devfolio.co/overview.json".to_string(),
                "https://hacknwin-3.devfolio.co/_next/data/ff9W3m0EDh9C-2EzENT45/hackathon3/hacknwin-3.devfolio.co/overview.json".to_string(),
            ],
        }
    }
}

/// Load from an explicit TOML path.
pub fn load_event_sources_from(path: &Path) -> Result<EventSourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading event sources from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Env var, then the default file, then built-in defaults. A pointed-to but
/// missing file is an error; an absent default file is not.
pub fn load_event_sources() -> Result<EventSourcesConfig> {
    if let Ok(p) = std::env::var(ENV_EVENT_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_event_sources_from(&pb);
        }
        return Err(anyhow!("EVENT_SOURCES_PATH points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_EVENT_SOURCES_PATH);
    if default.exists() {
        return load_event_sources_from(&default);
    }
    Ok(EventSourcesConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_sources() {
        let cfg = EventSourcesConfig::default();
        assert!(cfg.commudle_url.contains("commudle.com"));
        assert_eq!(cfg.devfolio_urls.len(), 4);
    }

    #[test]
    fn toml_parses_with_optional_devfolio_list() {
        let cfg: EventSourcesConfig = toml::from_str(
            r#"
            commudle_url = "https://example.test/events"
            devfolio_urls = ["https://example.test/h1.json"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.commudle_url, "https://example.test/events");
        assert_eq!(cfg.devfolio_urls.len(), 1);

        let bare: EventSourcesConfig =
            toml::from_str(r#"commudle_url = "https://example.test/events""#).unwrap();
        assert!(bare.devfolio_urls.is_empty());
    }
}
