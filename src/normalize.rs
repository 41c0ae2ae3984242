//! Response Normalizer
//!
//! Turns a provider's raw completion text into a JSON array of lessons.
//! Providers disagree on shape: some wrap the array in a single-key object,
//! some surround it with prose or markdown fences. The normalizer accepts all
//! of these and reports anything else as an unusable response.

use crate::error::ApiError;
use crate::types::{LessonModule, LessonPayload};
use serde_json::Value;

/// Extract the lesson array from raw provider text.
///
/// Order of attempts:
/// 1. whole text parses as an array: use it;
/// 2. whole text parses as an object with exactly one key holding an array: unwrap;
/// 3. otherwise scan for the first balanced `[...]` literal that parses as an array.
pub fn extract_array(raw: &str) -> Result<Vec<Value>, ApiError> {
    candidate_arrays(raw)?.next().ok_or_else(no_array_found)
}

/// Every array the extraction rules can find in `raw`, in the order they are tried.
///
/// A whole-text match is the only candidate; otherwise each balanced `[...]`
/// literal that parses as an array is yielded left to right.
pub fn candidate_arrays(raw: &str) -> Result<impl Iterator<Item = Vec<Value>> + '_, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Normalization("empty response".to_string()));
    }

    let whole = whole_text_array(trimmed);
    let scanned = whole.is_none().then(|| scan_arrays(trimmed));
    Ok(whole.into_iter().chain(scanned.into_iter().flatten()))
}

fn whole_text_array(trimmed: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((_, Value::Array(items))) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Balanced bracket literals that parse as arrays, left to right.
fn scan_arrays(text: &str) -> impl Iterator<Item = Vec<Value>> + '_ {
    text.match_indices('[').filter_map(move |(start, _)| {
        let candidate = balanced_array_at(text, start)?;
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        }
    })
}

fn no_array_found() -> ApiError {
    ApiError::Normalization("no JSON array found in provider response".to_string())
}

/// Return the substring of the bracket literal opening at `start`.
///
/// Brackets inside JSON string literals are ignored. `None` if unbalanced.
pub fn balanced_array_at(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Check an extracted array against the lesson schema.
///
/// Requires exactly `expected` entries. A missing `dayNumber` is filled from
/// the entry's position; a present one must equal it.
pub fn validate_lessons(values: Vec<Value>, expected: usize) -> Result<Vec<LessonModule>, ApiError> {
    if values.len() != expected {
        return Err(ApiError::Normalization(format!(
            "expected {} lessons, got {}",
            expected,
            values.len()
        )));
    }

    values
        .into_iter()
        .enumerate()
        .map(|(idx, mut value)| {
            let position = idx as u64 + 1;
            let object = value.as_object_mut().ok_or_else(|| {
                ApiError::Normalization(format!("lesson {} is not an object", position))
            })?;
            match object.get("dayNumber").cloned() {
                None => {
                    object.insert("dayNumber".to_string(), Value::from(position));
                }
                Some(day) if day.as_u64() == Some(position) => {}
                Some(day) => {
                    return Err(ApiError::Normalization(format!(
                        "lesson {} has dayNumber {}",
                        position, day
                    )));
                }
            }

            let lesson: LessonModule = serde_json::from_value(value).map_err(|e| {
                ApiError::Normalization(format!("lesson {} does not match schema: {}", position, e))
            })?;
            lesson.validate().map_err(ApiError::Normalization)?;
            Ok(lesson)
        })
        .collect()
}

/// Full normalization pipeline for one provider response.
///
/// Strict mode takes the first candidate array that validates; if none does,
/// the first candidate's validation error is reported. Lenient mode takes the
/// first candidate as-is.
pub fn normalize_response(
    raw: &str,
    expected: usize,
    strict: bool,
) -> Result<LessonPayload, ApiError> {
    if strict {
        let mut first_error = None;
        for values in candidate_arrays(raw)? {
            match validate_lessons(values, expected) {
                Ok(lessons) => return Ok(LessonPayload::Validated(lessons)),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        return Err(first_error.unwrap_or_else(no_array_found));
    }

    let values = extract_array(raw)?;
    if values.is_empty() {
        Err(ApiError::Normalization("provider returned an empty array".to_string()))
    } else {
        Ok(LessonPayload::Raw(values))
    }
}
