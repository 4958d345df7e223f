//! Defensive parsing of completion replies into [`InsightResult`].
//!
//! Only a reply that is not JSON at all is an error. Everything else is
//! coerced into shape: missing summary becomes `""`, a non-array `themes`
//! becomes `[]`, and each theme goes through [`coerce_theme`].

use serde_json::Value;

use crate::error::InsightError;
use crate::models::{InsightResult, Theme};

/// Parse a raw reply into a well-formed result.
pub fn normalize(raw: &str) -> Result<InsightResult, InsightError> {
    let parsed: Value = serde_json::from_str(raw)?;
    Ok(normalize_value(&parsed))
}

/// Coerce an already-parsed JSON value. Never fails.
pub fn normalize_value(value: &Value) -> InsightResult {
    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let themes = value
        .get("themes")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(coerce_theme).collect())
        .unwrap_or_default();

    InsightResult { summary, themes }
}

/// Coerce one element of `themes`.
///
/// Priority:
/// 1. an object with a `title` uses it, plus `description` when present;
/// 2. anything else becomes the title via its string form (string contents
///    for JSON strings, JSON text otherwise), with an empty description.
///
/// This accepts both the older plain-string shape and the newer object shape.
pub fn coerce_theme(item: &Value) -> Theme {
    if let Some(title) = item.get("title") {
        let description = item
            .get("description")
            .map(string_form)
            .unwrap_or_default();
        return Theme {
            title: string_form(title),
            description,
        };
    }

    Theme {
        title: string_form(item),
        description: String::new(),
    }
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
