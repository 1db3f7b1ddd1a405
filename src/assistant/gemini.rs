// src/assistant/gemini.rs
//! Generative backend for the community assistant: provider abstraction,
//! the Gemini client with its enumerated model-fallback loop, a disabled
//! client for keyless deployments, and an in-memory daily limit.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Answer produced by a generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub text: String,
    /// Which model finally answered, for diagnostics in the response body.
    pub model: Option<String>,
}

/// Trait object used by the assistant engine and tests. `None` means "no
/// generative answer"; the engine falls back instead of erroring.
pub trait ChatClient: Send + Sync {
    fn reply<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<ChatAnswer>> + Send + 'a>>;
    fn provider_name(&self) -> &'static str;
}

pub type DynChatClient = Arc<dyn ChatClient>;

/// Model names tried in order; quota and availability differ per key, so the
/// first one that answers wins.
const MODEL_CANDIDATES: [&str; 5] = [
    "gemini-1.5-pro-latest",
    "gemini-1.5-flash-latest",
    "gemini-1.0-pro-latest",
    "gemini-pro",
    "models/gemini-pro",
];

const SYSTEM_PROMPT: &str = "You are D4 Community Assistant for D4 Community (Discite - Develop - Debug - Deploy).\n\
About D4 Community:\n\
- Tech community for developers, designers, and tech enthusiasts\n\
- Online community across India\n\
- Motto: Discite (Learn) - Develop - Debug - Deploy\n\
- Organizes hackathons, workshops, and tech events\n\
- Active on WhatsApp, Discord, LinkedIn, Instagram\n\
- Email: help.d4community@gmail.com\n\
Instructions:\n\
- Keep responses brief (2-3 sentences maximum)\n\
- Be friendly and welcoming\n\
- If question is about joining: mention WhatsApp/Discord links\n\
- If question is about events: mention the Commudle page\n\
- If question is technical or requires personal info: suggest the contact form\n\
- Always end with a suggestion to use the contact form for detailed inquiries";

/// Answers are single short paragraphs; anything longer is cut off.
const ANSWER_MAX_CHARS: usize = 600;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    models: Vec<String>,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("d4-community-site/0.1 (+github.com/d4community/d4-community-site)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            models: MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect(),
        }
    }

    async fn ask_model(&self, model: &str, query: &str) -> Option<String> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerationConfig {
            temperature: f32,
            top_k: u32,
            top_p: f32,
            max_output_tokens: u32,
        }
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
            generation_config: GenerationConfig,
        }
        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Option<RespContent>,
        }
        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }
        #[derive(Deserialize)]
        struct RespPart {
            text: Option<String>,
        }

        let prompt = format!("{SYSTEM_PROMPT}\n\nUser Question: {query}\n\nYour response:");
        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 150,
            },
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}",
            key = self.api_key
        );
        let resp = self.http.post(&url).json(&req).send().await.ok()?;
        if !resp.status().is_success() {
            tracing::warn!(model, status = %resp.status(), "gemini model refused");
            return None;
        }
        let body: Resp = resp.json().await.ok()?;
        let text = body
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)?;
        let cleaned = sanitize_answer(&text);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}

impl ChatClient for GeminiClient {
    fn reply<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<ChatAnswer>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return None;
            }
            for model in &self.models {
                if let Some(text) = self.ask_model(model, query).await {
                    return Some(ChatAnswer {
                        text,
                        model: Some(model.clone()),
                    });
                }
            }
            tracing::warn!("all gemini models failed");
            None
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

/// Returns `None` always; used when no API key is configured.
pub struct DisabledClient;

impl ChatClient for DisabledClient {
    fn reply<'a>(
        &'a self,
        _query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<ChatAnswer>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic client for tests and local runs.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: ChatAnswer,
}

impl ChatClient for MockClient {
    fn reply<'a>(
        &'a self,
        _query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<ChatAnswer>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Caps upstream calls per UTC day. Counter lives in memory only and resets
/// with the process, which is the whole persistence story of this service.
pub struct LimitedClient<C> {
    inner: C,
    max_per_day: u32,
    counter: Mutex<DailyCounter>,
}

#[derive(Debug, Clone, Copy)]
struct DailyCounter {
    day: i64,
    count: u32,
}

fn today() -> i64 {
    chrono::Utc::now().timestamp() / 86_400
}

impl<C: ChatClient> LimitedClient<C> {
    pub fn new(inner: C, max_per_day: u32) -> Self {
        Self {
            inner,
            max_per_day,
            counter: Mutex::new(DailyCounter {
                day: today(),
                count: 0,
            }),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut g = self.counter.lock().expect("daily counter poisoned");
        if g.day != today() {
            g.day = today();
            g.count = 0;
        }
        if g.count >= self.max_per_day {
            return false;
        }
        g.count += 1;
        true
    }
}

impl<C: ChatClient> ChatClient for LimitedClient<C> {
    fn reply<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<ChatAnswer>> + Send + 'a>> {
        Box::pin(async move {
            if !self.try_acquire() {
                tracing::warn!(limit = self.max_per_day, "daily gemini budget exhausted");
                return None;
            }
            self.inner.reply(query).await
        })
    }
    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

/// Default daily budget for upstream generative calls.
const DEFAULT_DAILY_LIMIT: u32 = 200;

/// Factory: a rate-limited Gemini client when `GEMINI_API_KEY` is set, the
/// disabled client otherwise.
pub fn build_client_from_env() -> DynChatClient {
    match std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        Some(key) => Arc::new(LimitedClient::new(GeminiClient::new(key), DEFAULT_DAILY_LIMIT)),
        None => Arc::new(DisabledClient),
    }
}

/// Single paragraph, collapsed whitespace, bounded length.
pub fn sanitize_answer(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(ANSWER_MAX_CHARS));
    let mut prev_space = false;
    for ch in input.chars() {
        let c = match ch {
            '\r' | '\n' | '\t' => ' ',
            c => c,
        };
        if c == ' ' {
            if !prev_space && !out.is_empty() {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
        if out.chars().count() >= ANSWER_MAX_CHARS {
            break;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_never_answers() {
        assert!(DisabledClient.reply("hi").await.is_none());
        assert_eq!(DisabledClient.provider_name(), "disabled");
    }

    #[tokio::test]
    async fn limited_client_stops_at_the_cap() {
        let limited = LimitedClient::new(
            MockClient {
                fixed: ChatAnswer {
                    text: "hello".to_string(),
                    model: None,
                },
            },
            2,
        );
        assert!(limited.reply("a").await.is_some());
        assert!(limited.reply("b").await.is_some());
        assert!(limited.reply("c").await.is_none());
    }

    #[tokio::test]
    async fn keyless_gemini_short_circuits() {
        let client = GeminiClient::new(String::new());
        assert!(client.reply("anything").await.is_none());
    }

    #[test]
    fn sanitize_collapses_and_bounds() {
        assert_eq!(sanitize_answer("  a\n\n b\tc  "), "a b c");
        let long = "x".repeat(2_000);
        assert!(sanitize_answer(&long).chars().count() <= ANSWER_MAX_CHARS);
    }
}
