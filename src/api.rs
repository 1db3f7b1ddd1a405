// src/api.rs
//! Public HTTP surface: event feed, carousel bootstrap, contact form, chat
//! assistant, gallery, plus the static site chrome as the fallback service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::assistant::AssistantEngine;
use crate::carousel::CarouselState;
use crate::config;
use crate::contact::{
    ContactSubmission, NOT_CONFIGURED_ERROR, SEND_FAILED_ERROR, SUCCESS_MESSAGE,
};
use crate::events::types::DisplayEvent;
use crate::events::EventAggregator;
use crate::gallery;
use crate::notify::EmailSender;

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<EventAggregator>,
    assistant: Arc<AssistantEngine>,
    mailer: Arc<Option<EmailSender>>,
}

impl AppState {
    pub fn new(
        aggregator: EventAggregator,
        assistant: AssistantEngine,
        mailer: Option<EmailSender>,
    ) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            assistant: Arc::new(assistant),
            mailer: Arc::new(mailer),
        }
    }

    /// Production wiring from env + config files. A missing SMTP setup is
    /// logged and degrades the contact endpoint, nothing else.
    pub fn from_env() -> Self {
        let sources = config::load_event_sources().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "event sources config invalid, using defaults");
            config::EventSourcesConfig::default()
        });
        let mailer = match EmailSender::from_env() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = ?e, "contact email disabled");
                None
            }
        };
        Self::new(
            EventAggregator::from_config(&sources),
            AssistantEngine::from_env(),
            mailer,
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/events", get(list_events))
        .route("/api/events/carousel", get(carousel_bootstrap))
        .route("/api/contact", post(submit_contact))
        .route("/api/chat", post(chat))
        .route("/api/gallery", get(gallery_catalogue))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
        .fallback_service(ServeDir::new("static"))
}

#[derive(Serialize)]
struct EventsResponse {
    items: Vec<DisplayEvent>,
    notice: Option<String>,
}

async fn list_events(State(state): State<AppState>) -> Json<EventsResponse> {
    let agg = state.aggregator.fetch_and_normalize().await;
    Json(EventsResponse {
        items: agg.items,
        notice: agg.notice,
    })
}

#[derive(Deserialize)]
struct CarouselQuery {
    width: Option<u32>,
}

#[derive(Serialize)]
struct CarouselBootstrap {
    items: Vec<DisplayEvent>,
    notice: Option<String>,
    visible_count: usize,
    index: usize,
    active_dot: usize,
    animate: bool,
}

/// Server-side seed for the client carousel: the aggregated items plus the
/// initial controller state for the reported viewport width.
async fn carousel_bootstrap(
    State(state): State<AppState>,
    Query(q): Query<CarouselQuery>,
) -> Json<CarouselBootstrap> {
    let agg = state.aggregator.fetch_and_normalize().await;
    let carousel = CarouselState::with_viewport(agg.items.clone(), q.width.unwrap_or(1280));
    let view = carousel.view();
    Json(CarouselBootstrap {
        items: agg.items,
        notice: agg.notice,
        visible_count: view.visible_count,
        index: view.index,
        active_dot: view.active_dot,
        animate: view.animate,
    })
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> impl IntoResponse {
    if let Err(msg) = submission.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })));
    }

    let Some(mailer) = &*state.mailer else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": NOT_CONFIGURED_ERROR })),
        );
    };

    match mailer.send_application(&submission).await {
        Ok(()) => {
            tracing::info!("contact email sent");
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": SUCCESS_MESSAGE })),
            )
        }
        Err(e) => {
            tracing::warn!(error = ?e, "contact email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": SEND_FAILED_ERROR })),
            )
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: String,
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> impl IntoResponse {
    if req.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Query is required" })),
        );
    }
    let reply = state.assistant.answer(&req.query).await;
    (
        StatusCode::OK,
        Json(json!({
            "response": reply.response,
            "source": reply.source,
            "model": reply.model,
        })),
    )
}

#[derive(Deserialize)]
struct GalleryQuery {
    #[serde(default)]
    shuffle: bool,
}

async fn gallery_catalogue(Query(q): Query<GalleryQuery>) -> impl IntoResponse {
    if q.shuffle {
        let photos = gallery::shuffled_photos(&mut rand::rng());
        return Json(json!({ "photos": photos }));
    }
    Json(json!({ "albums": gallery::albums() }))
}
