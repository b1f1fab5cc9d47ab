//! Answer normalization and comparison.
//!
//! A learner's answer is correct when, after normalization, it holds exactly
//! the same strings as the answer key, with the same multiplicity and in any
//! order. This covers single choice, multi-select and free-text questions
//! with one rule.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::strip_tags;
use crate::model::UserAnswer;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize one answer string for comparison.
///
/// 1. Trim surrounding whitespace.
/// 2. Strip markup, keeping text content.
/// 3. If stripping leaves nothing of a non-empty string, keep the trimmed
///    string instead, so `<br>` and `<i>` stay distinct.
/// 4. Collapse whitespace runs to a single space.
/// 5. Lowercase.
pub fn normalize_answer(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let trimmed = raw.trim();
    let stripped = strip_tags(trimmed);
    let content = if stripped.is_empty() && !trimmed.is_empty() {
        trimmed
    } else {
        stripped.as_str()
    };
    WHITESPACE_RUN.replace_all(content, " ").to_lowercase()
}

/// Check a learner's answer against the answer key.
///
/// Returns `false` when the key is absent or empty, when no non-blank answer
/// was given, or when the number of answers differs from the key.
pub fn is_correct(user: Option<&UserAnswer>, correct: Option<&[String]>) -> bool {
    let Some(correct) = correct.filter(|c| !c.is_empty()) else {
        return false;
    };
    let Some(user) = user else {
        return false;
    };

    let given: Vec<&String> = user
        .as_slice()
        .iter()
        .filter(|answer| !answer.trim().is_empty())
        .collect();
    if given.is_empty() || given.len() != correct.len() {
        return false;
    }

    let mut given: Vec<String> = given.into_iter().map(|a| normalize_answer(a)).collect();
    let mut expected: Vec<String> = correct.iter().map(|a| normalize_answer(a)).collect();
    given.sort();
    expected.sort();

    given == expected
}
