// src/events/fallback.rs
//! Bundled static events shown when every live source fails or comes back
//! empty. Returned unchanged, with no sorting and no cap.

use crate::events::types::{DisplayEvent, EventKind};

fn item(
    id: &str,
    title: &str,
    description: &str,
    image: &str,
    kind: EventKind,
    participants: Option<u32>,
) -> DisplayEvent {
    DisplayEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image_url: image.to_string(),
        kind,
        date: None,
        end_date: None,
        location: None,
        participants,
        rating: None,
        prize: None,
        slug: None,
        sort_ts: None,
    }
}

pub fn fallback_events() -> Vec<DisplayEvent> {
    vec![
        item(
            "static-1",
            "AI as Your CTO Co-Founder",
            "Build smarter with AI leadership.",
            "/images/events/ai-as-your-cto.png",
            EventKind::Event,
            None,
        ),
        item(
            "static-2",
            "Hello World Conclave",
            "Meet developers and founders.",
            "/images/events/hello-world-conclave.png",
            EventKind::Event,
            None,
        ),
        item(
            "static-3",
            "Digital Payments & LinkedIn",
            "Fintech growth insights.",
            "/images/events/digital-payments-and-linkedin-opportunies.png",
            EventKind::Event,
            None,
        ),
        item(
            "static-4",
            "Hack-N-Win 2.0",
            "Build fast. Win big.",
            "/images/events/hack-n-win-2.png",
            EventKind::Hackathon,
            Some(500),
        ),
        item(
            "static-5",
            "D4 Community Event",
            "Join 63+ attendees for this sold-out event.",
            "/images/events/d4-community-event.webp",
            EventKind::Event,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fallback_is_five_items_with_unique_ids() {
        let items = fallback_events();
        assert_eq!(items.len(), 5);
        let ids: HashSet<&str> = items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }
}
