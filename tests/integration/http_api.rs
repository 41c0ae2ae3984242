//! Integration tests for the HTTP surface, exercised in-process

use super::test_utils::{calls, lessons_text, new_call_log, ScriptedBackend, SAMPLE_SYLLABUS};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use lessonplan::api::{build_router, AppState, LESSON_SOURCE_HEADER};
use lessonplan::backend::Backend;
use lessonplan::config::GenerationConfig;
use lessonplan::orchestrator::LessonOrchestrator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(backends: Vec<Arc<dyn Backend>>, generation: GenerationConfig) -> axum::Router {
    let orchestrator = LessonOrchestrator::new(
        backends,
        generation.fallback_enabled,
        generation.strict_validation,
    );
    build_router(AppState {
        orchestrator: Arc::new(orchestrator),
        generation,
    })
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate-lessons")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_backend_plan_is_returned_with_source_header() {
    let log = new_call_log();
    let backends = vec![ScriptedBackend::new("Groq", &["llama"], &log)
        .answers("llama", lessons_text(4, "Groq"))
        .shared()];
    let router = app(backends, GenerationConfig::default());

    let response = router
        .oneshot(generate_request(json!({"text": SAMPLE_SYLLABUS, "totalLessons": 4})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(LESSON_SOURCE_HEADER).unwrap(), "Groq/llama");
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = read_json(response).await;
    let lessons = body.as_array().unwrap();
    assert_eq!(lessons.len(), 4);
    assert_eq!(lessons[3]["topicTitle"], "Groq 4");
}

#[tokio::test]
async fn test_malformed_request_never_reaches_backends() {
    let log = new_call_log();
    let backends = vec![ScriptedBackend::new("OpenAI", &["gpt"], &log)
        .answers("gpt", lessons_text(20, "OpenAI"))
        .shared()];

    for body in [json!({}), json!({"text": ""}), json!({"text": "Grammar", "totalLessons": 0})] {
        let router = app(backends.clone(), GenerationConfig::default());
        let response = router.oneshot(generate_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = read_json(response).await;
        assert!(error["error"].is_string());
        assert_eq!(error["details"], json!([]));
    }
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_lesson_count_above_configured_maximum_is_rejected() {
    let generation = GenerationConfig {
        max_lessons: 30,
        ..GenerationConfig::default()
    };
    let router = app(Vec::new(), generation);

    let response = router
        .oneshot(generate_request(json!({"text": SAMPLE_SYLLABUS, "totalLessons": 31})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_lesson_count_is_twenty() {
    let router = app(Vec::new(), GenerationConfig::default());

    let response = router
        .oneshot(generate_request(json!({"text": SAMPLE_SYLLABUS})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_exhaustion_without_fallback_returns_details() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("OpenAI", &["gpt-4o-mini"], &log)
            .fails("gpt-4o-mini", "401")
            .shared(),
        ScriptedBackend::new("DeepSeek", &["deepseek-chat"], &log)
            .answers("deepseek-chat", "not json at all")
            .shared(),
    ];
    let generation = GenerationConfig {
        fallback_enabled: false,
        ..GenerationConfig::default()
    };
    let router = app(backends, generation);

    let response = router
        .oneshot(generate_request(json!({"text": SAMPLE_SYLLABUS, "totalLessons": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details[0].as_str().unwrap().starts_with("OpenAI (gpt-4o-mini)"));
    assert!(details[1].as_str().unwrap().starts_with("DeepSeek (deepseek-chat)"));
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let router = app(Vec::new(), GenerationConfig::default());
    let response = router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/generate-lessons")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_health_reports_available_backends_in_order() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("OpenAI", &["gpt"], &log).unavailable().shared(),
        ScriptedBackend::new("Groq", &["llama"], &log).shared(),
        ScriptedBackend::new("Gemini", &["flash"], &log).shared(),
    ];
    let router = app(backends, GenerationConfig::default());

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body, json!({"status": "ok", "backends": ["Groq", "Gemini"]}));
}
