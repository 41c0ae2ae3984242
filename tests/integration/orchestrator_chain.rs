//! Integration tests for the sequential provider chain

use super::test_utils::{calls, lessons_text, new_call_log, ScriptedBackend, SAMPLE_SYLLABUS};
use lessonplan::error::ApiError;
use lessonplan::orchestrator::LessonOrchestrator;
use lessonplan::types::{GenerationRequest, LessonPayload, PlanSource};

fn request(count: usize) -> GenerationRequest {
    GenerationRequest::new(SAMPLE_SYLLABUS, count).unwrap()
}

fn pair(backend: &str, variant: &str) -> (String, String) {
    (backend.to_string(), variant.to_string())
}

#[tokio::test]
async fn test_first_success_wins() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("Primary", &["p-1"], &log)
            .answers("p-1", lessons_text(3, "Primary"))
            .shared(),
        ScriptedBackend::new("Secondary", &["s-1"], &log)
            .answers("s-1", lessons_text(3, "Secondary"))
            .shared(),
    ];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(3)).await.unwrap();
    assert_eq!(
        outcome.source,
        PlanSource::Backend {
            backend: "Primary".to_string(),
            variant: "p-1".to_string()
        }
    );
    assert_eq!(outcome.lessons.len(), 3);
    assert!(outcome.failures.is_empty());
    assert_eq!(calls(&log), vec![pair("Primary", "p-1")]);
}

#[tokio::test]
async fn test_unavailable_backend_is_skipped_silently() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("Missing", &["m-1"], &log)
            .answers("m-1", lessons_text(2, "Missing"))
            .unavailable()
            .shared(),
        ScriptedBackend::new("Present", &["p-1"], &log)
            .answers("p-1", lessons_text(2, "Present"))
            .shared(),
    ];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(2)).await.unwrap();
    assert!(outcome.failures.is_empty());
    assert_eq!(calls(&log), vec![pair("Present", "p-1")]);
    assert_eq!(orchestrator.available_backend_names(), vec!["Present".to_string()]);
}

#[tokio::test]
async fn test_variants_are_exhausted_before_next_backend() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("Gemini", &["flash-latest", "flash", "pro"], &log)
            .fails("flash-latest", "404")
            .answers("flash", lessons_text(3, "Flash"))
            .answers("pro", lessons_text(3, "Pro"))
            .shared(),
        ScriptedBackend::new("Later", &["l-1"], &log)
            .answers("l-1", lessons_text(3, "Later"))
            .shared(),
    ];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(3)).await.unwrap();
    assert_eq!(outcome.source.to_string(), "Gemini/flash");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].variant, "flash-latest");
    assert_eq!(
        calls(&log),
        vec![pair("Gemini", "flash-latest"), pair("Gemini", "flash")]
    );
}

#[tokio::test]
async fn test_wrapped_and_fenced_responses_are_normalized() {
    let log = new_call_log();
    let wrapped = format!("{{\"lessons\": {}}}", lessons_text(2, "Wrapped"));
    let backends = vec![ScriptedBackend::new("Wrapper", &["w-1"], &log)
        .answers("w-1", wrapped)
        .shared()];
    let orchestrator = LessonOrchestrator::new(backends, true, true);
    let outcome = orchestrator.generate(&request(2)).await.unwrap();
    assert_eq!(outcome.lessons.len(), 2);

    let fenced = format!(
        "Here is your plan:\n```json\n{}\n```\nEnjoy!",
        lessons_text(2, "Fenced")
    );
    let backends = vec![ScriptedBackend::new("Chatty", &["c-1"], &log)
        .answers("c-1", fenced)
        .shared()];
    let orchestrator = LessonOrchestrator::new(backends, true, true);
    let outcome = orchestrator.generate(&request(2)).await.unwrap();
    match outcome.lessons {
        LessonPayload::Validated(lessons) => assert_eq!(lessons[1].topic_title, "Fenced 2"),
        other => panic!("expected validated lessons, got {:?}", other),
    }
}

#[tokio::test]
async fn test_strict_validation_rejects_short_array_and_falls_through() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("Short", &["s-1"], &log)
            .answers("s-1", lessons_text(2, "Short"))
            .shared(),
        ScriptedBackend::new("Exact", &["e-1"], &log)
            .answers("e-1", lessons_text(3, "Exact"))
            .shared(),
    ];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(3)).await.unwrap();
    assert_eq!(outcome.source.to_string(), "Exact/e-1");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].backend, "Short");
}

#[tokio::test]
async fn test_lenient_validation_accepts_array_as_is() {
    let log = new_call_log();
    let backends = vec![ScriptedBackend::new("Loose", &["l-1"], &log)
        .answers("l-1", r#"[{"title": "anything"}]"#)
        .shared()];
    let orchestrator = LessonOrchestrator::new(backends, true, false);

    let outcome = orchestrator.generate(&request(5)).await.unwrap();
    assert!(matches!(outcome.lessons, LessonPayload::Raw(ref values) if values.len() == 1));
}

#[tokio::test]
async fn test_unparseable_response_counts_as_failure() {
    let log = new_call_log();
    let backends = vec![ScriptedBackend::new("Prose", &["p-1"], &log)
        .answers("p-1", "I'm sorry, I can't produce a lesson plan today.")
        .shared()];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(3)).await.unwrap();
    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(outcome.lessons.len(), 3);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].message.contains("Unusable provider response"));
}

#[tokio::test]
async fn test_all_failing_without_fallback_reports_every_attempt() {
    let log = new_call_log();
    let backends = vec![
        ScriptedBackend::new("OpenAI", &["gpt-4o-mini"], &log)
            .fails("gpt-4o-mini", "connection reset")
            .shared(),
        ScriptedBackend::new("Gemini", &["flash-latest", "flash"], &log)
            .fails("flash-latest", "quota")
            .fails("flash", "quota")
            .shared(),
    ];
    let orchestrator = LessonOrchestrator::new(backends, false, true);

    let err = orchestrator.generate(&request(3)).await.unwrap_err();
    match err {
        ApiError::ProvidersExhausted { details } => {
            assert_eq!(details.len(), 3);
            assert_eq!(
                details[0],
                "OpenAI (gpt-4o-mini): Provider request failed: connection reset"
            );
            assert!(details[2].starts_with("Gemini (flash)"));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_all_failing_with_fallback_returns_plan_and_log() {
    let log = new_call_log();
    let backends = vec![ScriptedBackend::new("OpenAI", &["gpt-4o-mini"], &log)
        .fails("gpt-4o-mini", "timed out")
        .shared()];
    let orchestrator = LessonOrchestrator::new(backends, true, true);

    let outcome = orchestrator.generate(&request(3)).await.unwrap();
    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(outcome.failures.len(), 1);
    match outcome.lessons {
        LessonPayload::Validated(lessons) => {
            let days: Vec<u32> = lessons.iter().map(|l| l.day_number).collect();
            assert_eq!(days, vec![1, 2, 3]);
        }
        other => panic!("expected validated lessons, got {:?}", other),
    }
}
