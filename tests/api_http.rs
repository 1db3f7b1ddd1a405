// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET  /health
// - GET  /api/events            (fallback path + wire contract)
// - GET  /api/events/carousel   (bootstrap math per viewport width)
// - POST /api/chat              (rule hit, offline mode, validation)
// - POST /api/contact           (validation + unconfigured mailer)
// - GET  /api/gallery

use serde_json::{json, Value as Json};
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use d4_community_site::api::{self, AppState};
use d4_community_site::assistant::{AssistantEngine, RuleBook};
use d4_community_site::assistant::gemini::DisabledClient;
use d4_community_site::events::providers::commudle::CommudleProvider;
use d4_community_site::events::providers::devfolio::DevfolioProvider;
use d4_community_site::events::EventAggregator;
use std::sync::Arc;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const COMMUDLE_FIXTURE: &str = include_str!("fixtures/commudle_events.json");
const DEVFOLIO_FIXTURE: &str = include_str!("fixtures/devfolio_hacknwin2.json");

/// Router backed by fixture providers, offline assistant, no mailer.
fn test_router(commudle: &str, devfolio: &[&str]) -> Router {
    let aggregator = EventAggregator::new(vec![
        Box::new(CommudleProvider::from_fixture_str(commudle)),
        Box::new(DevfolioProvider::from_fixture_strs(devfolio)),
    ]);
    let assistant = AssistantEngine::new(RuleBook::builtin(), Arc::new(DisabledClient));
    api::router(AppState::new(aggregator, assistant, None))
}

fn live_router() -> Router {
    test_router(COMMUDLE_FIXTURE, &[DEVFOLIO_FIXTURE])
}

fn empty_router() -> Router {
    test_router(r#"{"data":{"values":[]}}"#, &[r#"{"pageProps":{}}"#])
}

async fn read_json(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = live_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn api_events_returns_the_merged_wire_shape() {
    let app = live_router();

    let req = Request::builder()
        .method("GET")
        .uri("/api/events")
        .body(Body::empty())
        .expect("build GET /api/events");

    let resp = app.oneshot(req).await.expect("oneshot /api/events");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    let items = v["items"].as_array().expect("items array");
    assert_eq!(items.len(), 4); // 3 events + 1 hackathon
    assert!(v["notice"].is_null());

    // Wire contract the cards depend on.
    let first = &items[0];
    assert!(first.get("id").is_some());
    assert!(first.get("title").is_some());
    assert!(first.get("description").is_some());
    assert!(first.get("imageUrl").is_some());
    let kinds: Vec<&str> = items.iter().filter_map(|i| i["type"].as_str()).collect();
    assert!(kinds.contains(&"event") && kinds.contains(&"hackathon"));
}

#[tokio::test]
async fn api_events_serves_the_fallback_when_sources_are_empty() {
    let app = empty_router();

    let req = Request::builder()
        .method("GET")
        .uri("/api/events")
        .body(Body::empty())
        .expect("build GET /api/events");

    let resp = app.oneshot(req).await.expect("oneshot");
    let v = read_json(resp).await;
    assert_eq!(v["items"].as_array().expect("items").len(), 5);
    assert!(v["notice"].as_str().expect("notice").contains("sample"));
}

#[tokio::test]
async fn carousel_bootstrap_matches_the_breakpoints() {
    for (width, expected_visible) in [(480u32, 1usize), (800, 2), (1280, 3)] {
        let app = live_router();
        let req = Request::builder()
            .method("GET")
            .uri(format!("/api/events/carousel?width={width}"))
            .body(Body::empty())
            .expect("build carousel request");

        let resp = app.oneshot(req).await.expect("oneshot carousel");
        assert!(resp.status().is_success());
        let v = read_json(resp).await;

        assert_eq!(v["visible_count"].as_u64().unwrap() as usize, expected_visible);
        // First real item visible, dot 0, animation enabled.
        assert_eq!(v["index"].as_u64().unwrap() as usize, expected_visible);
        assert_eq!(v["active_dot"].as_u64().unwrap(), 0);
        assert_eq!(v["animate"].as_bool().unwrap(), true);
    }
}

#[tokio::test]
async fn chat_answers_rule_book_questions_offline() {
    let app = live_router();

    let payload = json!({ "query": "What is D4 Community?" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /api/chat");

    let resp = app.oneshot(req).await.expect("oneshot /api/chat");
    assert!(resp.status().is_success());
    let v = read_json(resp).await;
    assert_eq!(v["source"].as_str(), Some("rules"));
    assert!(v["response"].as_str().unwrap().contains("tech community"));
}

#[tokio::test]
async fn chat_without_a_backend_reports_offline_mode() {
    let app = live_router();

    let payload = json!({ "query": "do you run a mentorship program?" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /api/chat");

    let resp = app.oneshot(req).await.expect("oneshot /api/chat");
    let v = read_json(resp).await;
    assert_eq!(v["source"].as_str(), Some("offline"));
    assert!(v["response"].as_str().unwrap().contains("offline mode"));
}

#[tokio::test]
async fn chat_rejects_an_empty_query() {
    let app = live_router();

    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "  " }).to_string()))
        .expect("build POST /api/chat");

    let resp = app.oneshot(req).await.expect("oneshot /api/chat");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = read_json(resp).await;
    assert_eq!(v["error"].as_str(), Some("Query is required"));
}

#[tokio::test]
async fn contact_validates_the_required_trio() {
    let app = live_router();

    let req = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Asha", "email": "" }).to_string(),
        ))
        .expect("build POST /api/contact");

    let resp = app.oneshot(req).await.expect("oneshot /api/contact");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = read_json(resp).await;
    assert_eq!(
        v["error"].as_str(),
        Some("Name, email, and message are required")
    );
}

#[tokio::test]
async fn contact_without_smtp_reports_not_configured() {
    let app = live_router();

    let payload = json!({
        "name": "Asha Verma",
        "email": "asha@example.com",
        "message": "I'd like to volunteer."
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /api/contact");

    let resp = app.oneshot(req).await.expect("oneshot /api/contact");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let v = read_json(resp).await;
    assert!(v["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn gallery_lists_albums_and_shuffles_on_request() {
    let app = live_router();
    let req = Request::builder()
        .method("GET")
        .uri("/api/gallery")
        .body(Body::empty())
        .expect("build GET /api/gallery");
    let v = read_json(app.oneshot(req).await.expect("oneshot")).await;
    let albums = v["albums"].as_array().expect("albums");
    assert_eq!(albums.len(), 2);
    assert!(albums[0]["photos"].as_array().expect("photos").len() >= 4);

    let app = live_router();
    let req = Request::builder()
        .method("GET")
        .uri("/api/gallery?shuffle=true")
        .body(Body::empty())
        .expect("build GET /api/gallery?shuffle=true");
    let v = read_json(app.oneshot(req).await.expect("oneshot")).await;
    let photos = v["photos"].as_array().expect("photos");
    assert_eq!(photos.len(), 10);
}
