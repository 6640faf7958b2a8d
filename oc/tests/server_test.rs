//! HTTP surface tests driven through the router with `oneshot`

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{Reply, ScriptedLlm, api};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn router(replies: Vec<Reply>) -> (axum::Router, std::sync::Arc<common::MemorySink>) {
    let (api, sink) = api(ScriptedLlm::new(replies));
    (okrcoach::server::router(api), sink)
}

#[tokio::test]
async fn test_chat_ok() {
    let (router, _) = router(vec![Reply::Text("What matters most to you?")]);
    let (status, body) = send(
        router,
        post(
            "/api/chat",
            json!({"message": "I want to grow", "conversationHistory": [{"role": "ai", "content": "Hi"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "What matters most to you?");
}

#[tokio::test]
async fn test_chat_missing_message_is_400() {
    let (router, _) = router(vec![]);
    let (status, body) = send(router, post("/api/chat", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body.get("isRateLimit").is_none());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (router, _) = router(vec![]);
    let request = Request::post("/api/extract-okr")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_rate_limit_is_429_with_flag() {
    let (router, _) = router(vec![Reply::RateLimited]);
    let (status, body) = send(
        router,
        post("/api/extract-okr", json!({"conversationHistory": [{"role": "user", "content": "hi"}]})),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["isRateLimit"], true);
}

#[tokio::test]
async fn test_classify_persona_unknown_code() {
    let (router, _) = router(vec![Reply::Text(r#"{"persona_code":"Z","confidence":0.9,"reasoning":"x"}"#)]);
    let (status, body) = send(
        router,
        post(
            "/api/classify-persona",
            json!({"okrData": {"objective": "Grow", "keyResults": ["a"]}, "visionData": {}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persona"]["code"], "F");
    assert_eq!(body["persona"]["reasoning"], "x");
}

#[tokio::test]
async fn test_weekly_plan_without_inputs() {
    let (router, _) = router(vec![Reply::Text("no json here")]);
    let (status, body) = send(router, post("/api/generate-weekly-plan", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["weeklyPlan"]["weeklyTheme"].is_string());
    assert!(body["generatedAt"].is_string());
}

#[tokio::test]
async fn test_weekly_plan_with_bare_calendar_events() {
    let llm = ScriptedLlm::texts(&["no json here"]);
    let (api, _) = api(llm.clone());
    let router = okrcoach::server::router(api);
    let (status, body) = send(
        router,
        post(
            "/api/generate-weekly-plan",
            json!({"calendarEvents": {"events": [
                {"id": "1", "title": "Team sync", "start": "2026-10-12T09:00:00Z", "end": "2026-10-12T10:00:00Z"}
            ]}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["weeklyPlan"]["weeklyTheme"].is_string());
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("- 1 events in total"));
    assert!(prompt.contains("- Meetings: 1"));
}

#[tokio::test]
async fn test_feedback_uses_identity_headers() {
    let (router, sink) = router(vec![]);
    let request = Request::post("/api/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-name", "Dana")
        .body(Body::from(json!({"rating": 5, "comment": "great"}).to_string()))
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["feedbackId"], "feedback-1");

    let records = sink.records.lock().unwrap();
    assert_eq!(records[0].user_name, "Dana");
    assert_eq!(records[0].user_id, "anonymous");
}

#[tokio::test]
async fn test_feedback_rating_out_of_range() {
    let (router, sink) = router(vec![]);
    let (status, _) = send(router, post("/api/feedback", json!({"rating": 9}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_calendar_without_source_is_500() {
    let (router, _) = router(vec![]);
    let request = Request::get("/api/calendar").body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("calendar"));
}

#[tokio::test]
async fn test_personas() {
    let (router, _) = router(vec![]);
    let request = Request::get("/api/personas").body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);
    assert_eq!(body[0]["code"], "A");
}
