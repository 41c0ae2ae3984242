//! Property-based tests for the fallback generator

use lessonplan::fallback::{generate_fallback_lessons, truncate_title, Category};
use proptest::prelude::*;

fn syllabus_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z ]{0,80}", 0..12).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn prop_exactly_n_lessons_with_sequential_days(text in syllabus_strategy(), n in 0usize..60) {
        let lessons = generate_fallback_lessons(&text, n);
        prop_assert_eq!(lessons.len(), n);
        for (idx, lesson) in lessons.iter().enumerate() {
            prop_assert_eq!(lesson.day_number as usize, idx + 1);
        }
    }

    #[test]
    fn prop_output_is_byte_identical_on_repeat(text in syllabus_strategy(), n in 1usize..30) {
        let first = serde_json::to_string(&generate_fallback_lessons(&text, n)).unwrap();
        let second = serde_json::to_string(&generate_fallback_lessons(&text, n)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_every_lesson_is_well_formed(text in syllabus_strategy(), n in 1usize..30) {
        for lesson in generate_fallback_lessons(&text, n) {
            prop_assert!(lesson.validate().is_ok());
            prop_assert!(lesson.topic_title.chars().count() <= 50);
            let question = &lesson.quiz.questions[0];
            prop_assert_eq!(&question.options[0], &question.correct_answer);
        }
    }

    #[test]
    fn prop_truncation_law(line in "\\PC{0,120}") {
        let title = truncate_title(&line);
        if line.chars().count() > 50 {
            prop_assert_eq!(title.chars().count(), 50);
            prop_assert!(title.ends_with("..."));
            let kept: String = line.chars().take(47).collect();
            prop_assert!(title.starts_with(&kept));
        } else {
            prop_assert_eq!(title, line);
        }
    }

    #[test]
    fn prop_workshop_labels_cycle_every_four_days(day in 1usize..1000) {
        for category in [Category::Grammar, Category::Vocabulary, Category::Business, Category::Phonics] {
            prop_assert_eq!(category.workshop_for_day(day), category.workshop_for_day(day + 4));
        }
    }

    #[test]
    fn prop_business_keyword_dominates(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let line = format!("{}business sound word{}", prefix, suffix);
        prop_assert_eq!(Category::detect(&line), Category::Business);
    }
}
