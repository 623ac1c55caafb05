//! HTTP-level tests for every endpoint, over mock upstreams.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use server_core::kernel::{MockAI, MockExtractor, MockWebhook, TestDependencies};

use crate::common::{TestHarness, TEST_ORIGIN};

#[tokio::test]
async fn health_is_ok() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .send(
            Request::get("/health")
                .header("origin", TEST_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.header("access-control-allow-origin"), Some(TEST_ORIGIN));
}

// =============================================================================
// POST /review
// =============================================================================

#[tokio::test]
async fn plan_returns_text_and_prompt() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_ai(MockAI::new().with_response("Dinner at 7, smart casual.")),
    );

    let response = harness
        .post_json(
            "/review",
            json!({"foodType": "Thai", "maxWords": 30, "friendMessage": "Can't wait"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["text"], "Dinner at 7, smart casual.");
    assert_eq!(body["friendMessage"], "Can't wait");
    assert!(body["prompt"].as_str().unwrap().contains("(maximum 30 words)"));
}

#[tokio::test]
async fn plan_without_credentials_is_config_error() {
    let harness = TestHarness::new(TestDependencies::new().mock_ai(MockAI::new().with_missing_key()));

    let response = harness.post_json("/review", json!({})).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "config_error");
}

#[tokio::test]
async fn plan_upstream_failure_carries_status_and_body() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_ai(MockAI::new().with_failure(429, "quota exceeded")),
    );

    let response = harness.post_json("/review", json!({"foodType": "Sushi"})).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let body = response.json();
    assert_eq!(body["error"], "upstream_error");
    assert_eq!(body["status"], 429);
    assert_eq!(body["body"], "quota exceeded");
    assert!(body["hint"].is_string());
}

// =============================================================================
// POST /reviews/summarize
// =============================================================================

#[tokio::test]
async fn summarize_rejects_missing_lists_without_upstream_call() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .post_json("/reviews/summarize", json!({"positiveReviews": ["Great"]}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["message"],
        "Missing or invalid negativeReviews. Expected an array of strings."
    );
    assert_eq!(harness.deps.ai.call_count(), 0);
}

#[tokio::test]
async fn summarize_rejects_lists_empty_after_cleaning() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .post_json(
            "/reviews/summarize",
            json!({"positiveReviews": ["  ", 3], "negativeReviews": ["Cold food"]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "No valid review strings provided.");
    assert_eq!(harness.deps.ai.call_count(), 0);
}

#[tokio::test]
async fn summarize_extracts_object_from_prose() {
    let harness = TestHarness::new(TestDependencies::new().mock_ai(MockAI::new().with_response(
        "Here is the JSON: {\"positiveSummary\": \"Great fish.\", \"negativeSummary\": \"Long waits.\"} Thanks!",
    )));

    let response = harness
        .post_json(
            "/reviews/summarize",
            json!({
                "restaurantName": "Nagi Sushi",
                "positiveReviews": ["Fresh fish", "Friendly staff"],
                "negativeReviews": ["Long wait"]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"positiveSummary": "Great fish.", "negativeSummary": "Long waits."})
    );
}

#[tokio::test]
async fn summarize_invalid_reply_returns_raw_text() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_ai(MockAI::new().with_response("Sorry, I can't help.")),
    );

    let response = harness
        .post_json(
            "/reviews/summarize",
            json!({"positiveReviews": ["Good"], "negativeReviews": ["Bad"]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let body = response.json();
    assert_eq!(body["error"], "parse_error");
    assert_eq!(body["raw"], "Sorry, I can't help.");
}

// =============================================================================
// POST /restaurants/categorize
// =============================================================================

#[tokio::test]
async fn categorize_coerces_non_member_reply() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_ai(MockAI::new().with_response("Vegan Friendly")),
    );

    let response = harness
        .post_json("/restaurants/categorize", json!({"name": "Green Bowl"}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"category": "Other", "source": "model"}));
}

#[tokio::test]
async fn categorize_never_fails() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_ai(MockAI::new().with_failure(500, "internal")),
    );

    let response = harness
        .post_json(
            "/restaurants/categorize",
            json!({"name": "Nagi", "cuisine": "Sushi"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"category": "Sushi", "source": "fallback"}));
}

// =============================================================================
// POST /restaurants/search
// =============================================================================

#[tokio::test]
async fn search_returns_records_from_fenced_reply() {
    let harness = TestHarness::new(TestDependencies::new().mock_ai(MockAI::new().with_response(
        "```json\n[{\"name\": \"Nagi Sushi\", \"address\": \"1 Rideau St\", \"cuisine\": \"Sushi\"}]\n```",
    )));

    let response = harness
        .post_json("/restaurants/search", json!({"query": "sushi"}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"records": [{"name": "Nagi Sushi", "address": "1 Rideau St", "cuisine": "Sushi"}]})
    );
}

#[tokio::test]
async fn search_requires_query() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness.post_json("/restaurants/search", json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// GET /extract
// =============================================================================

#[tokio::test]
async fn extract_requires_url_and_prompt() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness.get("/extract?url=https%3A%2F%2Fmaps.example").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Missing url or prompt");
    assert!(harness.deps.extractor.calls().is_empty());
}

#[tokio::test]
async fn extract_relays_frames_with_stream_headers() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_extractor(
            MockExtractor::new()
                .with_chunk("event: chunk\ndata: {\"name\":\"Nagi\"}\n\n")
                .with_chunk("event: done\ndata: {}\n\n"),
        ),
    );

    let response = harness
        .get("/extract?url=https%3A%2F%2Fmaps.example%2Fsearch&prompt=list%20restaurants")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("text/event-stream"));
    assert_eq!(response.header("cache-control"), Some("no-cache"));
    assert_eq!(response.header("connection"), Some("keep-alive"));
    assert_eq!(
        response.body,
        "event: chunk\ndata: {\"name\":\"Nagi\"}\n\nevent: done\ndata: {}\n\n"
    );

    let calls = harness.deps.extractor.calls();
    assert_eq!(calls[0].url, "https://maps.example/search");
    assert_eq!(calls[0].prompt, "list restaurants");
}

#[tokio::test]
async fn extract_mid_stream_failure_ends_with_error_frame() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_extractor(
            MockExtractor::new()
                .with_chunk("event: chunk\ndata: {\"name\":\"Nagi\"}\n\n")
                .with_mid_stream_error("upstream reset"),
        ),
    );

    let response = harness
        .get("/extract?url=https%3A%2F%2Fmaps.example&prompt=p")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let (relayed, frame) = response
        .body
        .split_once("event: error\n")
        .expect("error frame present");
    assert_eq!(relayed, "event: chunk\ndata: {\"name\":\"Nagi\"}\n\n");

    let data: serde_json::Value =
        serde_json::from_str(frame.trim_start_matches("data: ").trim_end()).unwrap();
    assert_eq!(data["kind"], "upstream_error");
    assert_eq!(data["message"], "upstream reset");
}

#[tokio::test]
async fn extract_open_failure_is_plain_error() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_extractor(MockExtractor::new().with_open_error(401, "invalid key")),
    );

    let response = harness
        .get("/extract?url=https%3A%2F%2Fmaps.example&prompt=p")
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_ne!(response.header("content-type"), Some("text/event-stream"));
    assert_eq!(response.json()["status"], 401);
}

// =============================================================================
// POST /events
// =============================================================================

#[tokio::test]
async fn event_is_created_and_webhook_dispatched() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .post_json(
            "/events",
            json!({
                "emails": ["ana@example.com"],
                "eventName": "Friday Dinner",
                "restaurant": "Nagi Sushi",
                "dateTime": "2026-10-23-19",
                "output": "Meet at 7."
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["created"], true);
    assert_eq!(
        body["message"],
        "Your event \"Friday Dinner\" at Nagi Sushi has been created!"
    );

    // Detached task; give it a few turns of the runtime
    for _ in 0..50 {
        if !harness.deps.webhook.payloads().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    let payloads = harness.deps.webhook.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["foodType"], "Local Cuisine");
    assert_eq!(payloads[0]["maxWords"], 25);
    assert_eq!(payloads[0]["output"], "Meet at 7.");
}

#[tokio::test]
async fn event_webhook_failure_still_succeeds() {
    let harness = TestHarness::new(TestDependencies::new().mock_webhook(MockWebhook::failing()));

    let response = harness
        .post_json(
            "/events",
            json!({"eventName": "Lunch", "dateTime": "2026-10-24-12"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn event_requires_date_time() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .post_json("/events", json!({"eventName": "Lunch"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Date and time required");
    assert!(harness.deps.webhook.payloads().is_empty());
}

// =============================================================================
// POST /availability/overlap
// =============================================================================

#[tokio::test]
async fn availability_overlap_levels_and_best_slots() {
    let harness = TestHarness::new(TestDependencies::new());

    let response = harness
        .post_json(
            "/availability/overlap",
            json!({
                "availability": {"2026-10-23-18": true, "2026-10-23-19": true},
                "friendAvailabilities": {"f1": {"2026-10-23-19": true}},
                "invitedFriends": ["f1"]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["slots"][0]["level"], "partial");
    assert_eq!(body["slots"][1]["level"], "full");
    assert_eq!(body["best"][0]["slot"], "2026-10-23-19");
}
