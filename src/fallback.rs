//! Deterministic Fallback Generator
//!
//! Builds a lesson plan straight from the syllabus text when no provider
//! produced a usable result. Each day is mapped proportionally onto a source
//! line, the line is classified into a teaching category by keyword, and the
//! category's workshop labels are cycled across days.
//!
//! The generator is a pure function: no I/O, no clock, no randomness.

use crate::types::{LessonModule, Quiz, QuizQuestion};

/// Minimum trimmed length (exclusive) for a syllabus line to be used as a topic.
const MIN_LINE_LEN: usize = 10;

/// Topic titles longer than this are shortened.
const TITLE_MAX_LEN: usize = 50;

/// Characters kept from an over-long title before the ellipsis.
const TITLE_KEEP_LEN: usize = 47;

/// Characters of the source line quoted in the quiz question.
const QUESTION_EXCERPT_LEN: usize = 20;

/// Used when the syllabus has no usable lines.
pub const PLACEHOLDER_TOPIC: &str = "English Language Proficiency";

const DISTRACTORS: [&str; 3] = ["General Overview", "Casual Conversation", "Theoretical History"];

/// Teaching category detected from a syllabus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Grammar,
    Vocabulary,
    Business,
    Phonics,
}

/// Keyword rules in priority order. First match wins; no match is grammar.
const CATEGORY_RULES: [(Category, &[&str]); 3] = [
    (Category::Business, &["business", "work"]),
    (Category::Phonics, &["sound", "speak", "phonic"]),
    (Category::Vocabulary, &["word", "vocab"]),
];

impl Category {
    /// Classify a syllabus line by keyword.
    pub fn detect(line: &str) -> Self {
        let lower = line.to_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Grammar)
    }

    pub fn workshops(self) -> &'static [&'static str; 4] {
        match self {
            Category::Grammar => &[
                "Tense Review",
                "Sentence Structure",
                "Punctuation Mastery",
                "Grammatical Accuracy",
            ],
            Category::Vocabulary => &[
                "Expanding Lexicon",
                "Idiomatic Expressions",
                "Contextual Meaning",
                "Word Choice",
            ],
            Category::Business => &[
                "Formal Communication",
                "Professional Email Writing",
                "Presentation Skills",
                "Meeting Etiquette",
            ],
            Category::Phonics => &[
                "Vowel Sounds",
                "Consonant Blends",
                "Pronunciation Workshop",
                "Intonation & Rhythm",
            ],
        }
    }

    /// Workshop label for a 1-based day number.
    pub fn workshop_for_day(self, day: usize) -> &'static str {
        let labels = self.workshops();
        labels[(day.saturating_sub(1)) % labels.len()]
    }
}

/// Syllabus lines long enough to anchor a lesson, trimmed, in original order.
pub fn candidate_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_LEN)
        .collect()
}

/// Proportional mapping of a 1-based day onto `line_count` source lines.
///
/// Returns `None` when there are no lines.
pub fn source_index(day: usize, total: usize, line_count: usize) -> Option<usize> {
    if line_count == 0 || total == 0 {
        return None;
    }
    // floor(((day - 1) / total) * line_count) in integer arithmetic
    let idx = (day.saturating_sub(1) * line_count) / total;
    Some(idx.min(line_count - 1))
}

/// Shorten a topic title to 47 characters plus "..." when it exceeds 50.
pub fn truncate_title(line: &str) -> String {
    if line.chars().count() > TITLE_MAX_LEN {
        let kept: String = line.chars().take(TITLE_KEEP_LEN).collect();
        format!("{}...", kept)
    } else {
        line.to_string()
    }
}

/// Generate `total` lesson modules from the syllabus text.
pub fn generate_fallback_lessons(text: &str, total: usize) -> Vec<LessonModule> {
    let lines = candidate_lines(text);

    (1..=total)
        .map(|day| {
            let source_line = source_index(day, total, lines.len())
                .map(|idx| lines[idx])
                .unwrap_or(PLACEHOLDER_TOPIC);
            build_module(day, source_line)
        })
        .collect()
}

fn build_module(day: usize, source_line: &str) -> LessonModule {
    let category = Category::detect(source_line);
    let workshop = category.workshop_for_day(day);
    let excerpt: String = source_line.chars().take(QUESTION_EXCERPT_LEN).collect();

    let mut options = Vec::with_capacity(1 + DISTRACTORS.len());
    options.push(workshop.to_string());
    options.extend(DISTRACTORS.iter().map(|d| d.to_string()));

    LessonModule {
        day_number: day as u32,
        topic_title: truncate_title(source_line),
        five_minute_summary: format!(
            "A comprehensive session focusing on {}. This module bridges the gap between \
             theoretical knowledge and practical application using the {} framework.",
            source_line, workshop
        ),
        kid_friendly_examples: vec![
            format!("{}: Hands-on workshop focusing on practical usage.", workshop),
            "Interactive peer-review and feedback sessions.".to_string(),
            "Real-world application exercises based on syllabus requirements.".to_string(),
        ],
        quiz: Quiz {
            questions: vec![QuizQuestion {
                question: format!(
                    "Which core aspect of {} was emphasized today?",
                    excerpt
                ),
                options,
                correct_answer: workshop.to_string(),
            }],
        },
    }
}
