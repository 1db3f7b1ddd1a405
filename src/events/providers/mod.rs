// src/events/providers/mod.rs
pub mod commudle;
pub mod devfolio;

use std::time::Duration;

/// Shared outbound client settings for the event feeds. Some feed CDNs
/// reject requests without a browser-looking user agent.
pub(crate) fn feed_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client")
}
