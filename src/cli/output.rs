//! CLI output: error mapping and plan rendering.

use crate::error::ApiError;
use crate::types::LessonPayload;

/// Map domain errors to a string for CLI output, one attempt per line.
pub fn map_error(e: &ApiError) -> String {
    let details = e.details();
    if details.is_empty() {
        return e.to_string();
    }
    let mut out = e.to_string();
    for line in details {
        out.push_str("\n  - ");
        out.push_str(&line);
    }
    out
}

/// Pretty JSON array, the same shape the HTTP endpoint returns.
pub fn format_plan_json(lessons: &LessonPayload) -> Result<String, ApiError> {
    serde_json::to_string_pretty(lessons).map_err(|e| ApiError::SerializationError(e.to_string()))
}
