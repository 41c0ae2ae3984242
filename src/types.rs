//! Core lesson plan types.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single generation request: syllabus text plus the number of days to plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    syllabus_text: String,
    lesson_count: usize,
}

impl GenerationRequest {
    /// Create a request, rejecting empty text and a zero lesson count.
    pub fn new(syllabus_text: impl Into<String>, lesson_count: usize) -> Result<Self, ApiError> {
        let syllabus_text = syllabus_text.into();
        if syllabus_text.trim().is_empty() {
            return Err(ApiError::InvalidRequest("Missing text content".to_string()));
        }
        if lesson_count == 0 {
            return Err(ApiError::InvalidRequest(
                "totalLessons must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            syllabus_text,
            lesson_count,
        })
    }

    pub fn syllabus_text(&self) -> &str {
        &self.syllabus_text
    }

    pub fn lesson_count(&self) -> usize {
        self.lesson_count
    }
}

/// One day of the generated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonModule {
    pub day_number: u32,
    pub topic_title: String,
    pub five_minute_summary: String,
    pub kid_friendly_examples: Vec<String>,
    pub quiz: Quiz,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl LessonModule {
    /// Structural checks applied to provider output under strict validation.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_number == 0 {
            return Err("dayNumber must be at least 1".to_string());
        }
        if self.topic_title.trim().is_empty() {
            return Err(format!("day {}: topicTitle is empty", self.day_number));
        }
        for (idx, question) in self.quiz.questions.iter().enumerate() {
            if !question.options.contains(&question.correct_answer) {
                return Err(format!(
                    "day {} question {}: correctAnswer is not one of the options",
                    self.day_number,
                    idx + 1
                ));
            }
        }
        Ok(())
    }
}

/// Lessons returned to the caller.
///
/// Serializes as a bare JSON array either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LessonPayload {
    Validated(Vec<LessonModule>),
    Raw(Vec<serde_json::Value>),
}

impl LessonPayload {
    pub fn len(&self) -> usize {
        match self {
            LessonPayload::Validated(lessons) => lessons.len(),
            LessonPayload::Raw(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Backend { backend: String, variant: String },
    Fallback,
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::Backend { backend, variant } => write!(f, "{}/{}", backend, variant),
            PlanSource::Fallback => write!(f, "fallback"),
        }
    }
}
