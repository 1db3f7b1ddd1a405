// src/assistant/mod.rs
//! Community chat assistant. Known questions answer from a closed rule
//! book; everything else goes to the generative backend when one is
//! configured, with canned fallbacks when it is not (or when it fails).

pub mod gemini;

use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::assistant::gemini::{build_client_from_env, ChatClient, DynChatClient};

/// Minimum Jaro-Winkler similarity for a fuzzy rule-book hit. High on
/// purpose: a near-miss should reach the generative backend, not a wrong
/// canned answer.
const FUZZY_THRESHOLD: f64 = 0.90;

/// Shown when no generative backend is configured at all.
pub const OFFLINE_MESSAGE: &str = "I'm currently in offline mode. For detailed information, \
please fill out the contact form and our team will get back to you! You can also check our \
community links for immediate joining.";

/// Rotated when the backend is configured but every model failed.
pub const FALLBACK_RESPONSES: [&str; 3] = [
    "I'm currently experiencing technical difficulties. Please use the contact form for detailed inquiries about D4 Community!",
    "Thanks for reaching out! For the best assistance with D4 Community, please use our contact form below.",
    "I'm having trouble connecting right now. You can check our community links or use the contact form to get in touch with our team!",
];

/// Closed question → answer mapping. These mirror the quick-reply chips on
/// the contact page.
const RULES: [(&str, &str); 5] = [
    (
        "How to join D4 Community?",
        "You can join D4 Community through our WhatsApp group or Discord server! Check the \
         community links section for all joining options. We'd love to have you!",
    ),
    (
        "Upcoming events",
        "We regularly host hackathons, workshops, and meetups in Chandigarh. Check our Commudle \
         page or join our WhatsApp group for event announcements!",
    ),
    (
        "What is D4 Community?",
        "D4 Community is a tech community focused on developers, designers, and tech enthusiasts. \
         We organize events, provide learning resources, and foster collaboration!",
    ),
    (
        "Volunteer opportunities",
        "We're always looking for volunteers! You can apply through our 'Apply to be a Volunteer' \
         form. Check the community links section for the application.",
    ),
    (
        "General questions",
        "For specific questions, please use the contact form below and our team will respond \
         within 24 hours!",
    ),
];

pub struct RuleBook {
    entries: Vec<(String, String)>,
}

impl RuleBook {
    pub fn builtin() -> Self {
        Self {
            entries: RULES
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
        }
    }

    /// Exact (case-insensitive) match first, then the best fuzzy match above
    /// the threshold.
    pub fn answer(&self, query: &str) -> Option<&str> {
        let query = query.trim();
        if let Some((_, a)) = self
            .entries
            .iter()
            .find(|(q, _)| q.eq_ignore_ascii_case(query))
        {
            return Some(a);
        }

        let lowered = query.to_lowercase();
        self.entries
            .iter()
            .map(|(q, a)| (strsim::jaro_winkler(&q.to_lowercase(), &lowered), a))
            .filter(|(score, _)| *score >= FUZZY_THRESHOLD)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, a)| a.as_str())
    }
}

/// Where a reply came from; serialized into the response body so the UI can
/// badge "AI-powered" vs "offline" answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Rules,
    Generative,
    Offline,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub response: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub struct AssistantEngine {
    rules: RuleBook,
    client: DynChatClient,
}

impl AssistantEngine {
    pub fn new(rules: RuleBook, client: DynChatClient) -> Self {
        Self { rules, client }
    }

    pub fn from_env() -> Self {
        Self::new(RuleBook::builtin(), build_client_from_env())
    }

    pub fn generative_available(&self) -> bool {
        self.client.provider_name() != "disabled"
    }

    pub async fn answer(&self, query: &str) -> AssistantReply {
        if let Some(rule) = self.rules.answer(query) {
            return AssistantReply {
                response: rule.to_string(),
                source: ReplySource::Rules,
                model: None,
            };
        }

        if !self.generative_available() {
            return AssistantReply {
                response: OFFLINE_MESSAGE.to_string(),
                source: ReplySource::Offline,
                model: None,
            };
        }

        match self.client.reply(query).await {
            Some(answer) => AssistantReply {
                response: answer.text,
                source: ReplySource::Generative,
                model: answer.model,
            },
            None => {
                let pick = FALLBACK_RESPONSES
                    .choose(&mut rand::rng())
                    .copied()
                    .unwrap_or(FALLBACK_RESPONSES[0]);
                AssistantReply {
                    response: pick.to_string(),
                    source: ReplySource::Fallback,
                    model: None,
                }
            }
        }
    }
}
