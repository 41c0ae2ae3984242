//! Integration tests for the deterministic fallback plan

use super::test_utils::SAMPLE_SYLLABUS;
use lessonplan::fallback::{generate_fallback_lessons, PLACEHOLDER_TOPIC};
use serde_json::json;

#[test]
fn test_sample_syllabus_plan() {
    let lessons = generate_fallback_lessons(SAMPLE_SYLLABUS, 3);
    assert_eq!(lessons.len(), 3);

    let day1 = &lessons[0];
    assert_eq!(day1.day_number, 1);
    assert_eq!(day1.topic_title, "Business Writing Basics");
    assert_eq!(day1.quiz.questions[0].correct_answer, "Formal Communication");
    assert_eq!(
        day1.five_minute_summary,
        "A comprehensive session focusing on Business Writing Basics. This module bridges the gap \
between theoretical knowledge and practical application using the Formal Communication framework."
    );

    let day3 = &lessons[2];
    assert_eq!(day3.topic_title, "Phonics Practice");
    assert_eq!(day3.quiz.questions[0].correct_answer, "Pronunciation Workshop");

    for lesson in &lessons {
        let question = &lesson.quiz.questions[0];
        assert!(question.options.contains(&question.correct_answer));
        assert_eq!(question.options.len(), 4);
    }
}

#[test]
fn test_serialized_shape_uses_camel_case() {
    let lessons = generate_fallback_lessons("Grammar and Tenses for beginners", 1);
    let value = serde_json::to_value(&lessons).unwrap();
    assert_eq!(
        value,
        json!([{
            "dayNumber": 1,
            "topicTitle": "Grammar and Tenses for beginners",
            "fiveMinuteSummary": "A comprehensive session focusing on Grammar and Tenses for beginners. \
This module bridges the gap between theoretical knowledge and practical application using the Tense Review framework.",
            "kidFriendlyExamples": [
                "Tense Review: Hands-on workshop focusing on practical usage.",
                "Interactive peer-review and feedback sessions.",
                "Real-world application exercises based on syllabus requirements."
            ],
            "quiz": {
                "questions": [{
                    "question": "Which core aspect of Grammar and Tenses f was emphasized today?",
                    "options": ["Tense Review", "General Overview", "Casual Conversation", "Theoretical History"],
                    "correctAnswer": "Tense Review"
                }]
            }
        }])
    );
}

#[test]
fn test_more_days_than_lines_repeats_lines() {
    let lessons = generate_fallback_lessons("Vocabulary for travel\nSpeaking with confidence", 6);
    let titles: Vec<&str> = lessons.iter().map(|l| l.topic_title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Vocabulary for travel",
            "Vocabulary for travel",
            "Vocabulary for travel",
            "Speaking with confidence",
            "Speaking with confidence",
            "Speaking with confidence",
        ]
    );
    // vocabulary cycles by day, phonics picks up at day 4
    assert_eq!(lessons[1].quiz.questions[0].correct_answer, "Idiomatic Expressions");
    assert_eq!(lessons[3].quiz.questions[0].correct_answer, "Intonation & Rhythm");
}

#[test]
fn test_only_short_lines_uses_placeholder() {
    let lessons = generate_fallback_lessons("Unit 1\nUnit 2\n\n   \n", 2);
    assert!(lessons.iter().all(|l| l.topic_title == PLACEHOLDER_TOPIC));
}
