//! Integration tests: submit and memory over the HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use journal_api::server::{self, AppState};
use journal_graph::InMemoryGraphStore;
use journal_llm::MockAnalyzer;
use journal_pipeline::EntryPipeline;
use journal_types::{AnalysisResult, AnalyzerError, Journal};
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_app(analyzer: MockAnalyzer) -> axum::Router {
    let journal: Arc<dyn Journal> =
        Arc::new(EntryPipeline::new(InMemoryGraphStore::new(), analyzer));
    server::router(Arc::new(AppState { journal }))
}

async fn post_submit(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let req = Request::builder()
        .method("POST")
        .uri("/journal/submit")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_memory(app: &axum::Router) -> serde_json::Value {
    let req = Request::builder()
        .method("GET")
        .uri("/journal/memory")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submit_then_memory() {
    let analyzer = MockAnalyzer::with_outcome(Ok(AnalysisResult {
        sentiment: Some("positive".to_string()),
        summary: Some("Good run".to_string()),
        suggestions: vec!["Keep it up".to_string()],
        themes: vec!["exercise".to_string()],
        goals: Vec::new(),
    }));
    let app = test_app(analyzer);

    let j = post_submit(
        &app,
        json!({ "entry": "Had a great run today", "history": [] }),
    )
    .await;
    assert_eq!(j["entry_text"], "");
    assert_eq!(j["memory"], "positive (1x)");
    assert!(j["notice"].is_null());
    let history = j["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[0]["content"], "Had a great run today");
    assert_eq!(history[1]["role"], "assistant");
    assert!(history[1]["content"]
        .as_str()
        .unwrap()
        .contains("**Sentiment**: positive"));

    let j = get_memory(&app).await;
    assert_eq!(j["memory"], "positive (1x)");
}

#[tokio::test]
async fn empty_entry_returns_prompt_without_calls() {
    let analyzer = MockAnalyzer::new();
    let app = test_app(analyzer.clone());
    let history = json!([{ "role": "user", "content": "earlier" }]);

    let j = post_submit(&app, json!({ "entry": "   ", "history": history.clone() })).await;

    assert_eq!(j["history"], history);
    assert_eq!(j["notice"], "Please enter a journal entry.");
    assert_eq!(analyzer.calls(), 0);
}

#[tokio::test]
async fn analyzer_failure_rides_back_in_notice() {
    let analyzer = MockAnalyzer::with_outcome(Err(AnalyzerError::MalformedResponse(
        "expected value".to_string(),
    )));
    let app = test_app(analyzer);

    let j = post_submit(&app, json!({ "entry": "Rough day", "history": [] })).await;

    assert_eq!(j["entry_text"], "Rough day");
    assert!(j["history"].as_array().unwrap().is_empty());
    assert!(j["notice"].as_str().unwrap().contains("malformed"));
    assert_eq!(j["memory"], "No past emotions");

    // Nothing was persisted for the failed submission.
    let j = get_memory(&app).await;
    assert_eq!(j["memory"], "No past emotions");
}

#[tokio::test]
async fn memory_starts_with_sentinel() {
    let app = test_app(MockAnalyzer::new());
    let j = get_memory(&app).await;
    assert_eq!(j["memory"], "No past emotions");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app(MockAnalyzer::new());
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
