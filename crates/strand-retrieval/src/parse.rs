//! Parsing of LLM output. Models wrap JSON in prose or code fences, or ignore
//! the requested format entirely, so every parser here is lenient and returns
//! `None`/empty rather than failing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use strand_core::models::Route;

/// Route classification verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteVerdict {
    pub route: Route,
    pub confidence: f64,
    pub rationale: String,
}

#[derive(Deserialize)]
struct RawVerdict {
    route: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    rationale: Option<String>,
}

/// The outermost JSON object or array embedded in `text`.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse `{"route": ..., "confidence": ..., "rationale": ...}`.
pub fn parse_route_verdict(text: &str) -> Option<RouteVerdict> {
    let raw: RawVerdict = serde_json::from_str(extract_json(text)?).ok()?;
    let route = raw.route.parse::<Route>().ok()?;
    let confidence = raw.confidence.unwrap_or(0.5);
    if !confidence.is_finite() {
        return None;
    }
    Some(RouteVerdict {
        route,
        confidence: confidence.clamp(0.0, 1.0),
        rationale: raw.rationale.unwrap_or_default(),
    })
}

/// Numbered (`1.`, `2)`) or bulleted (`-`, `*`) list items.
static LIST_ITEM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.):]|[-*•])\s+(.+?)\s*$").ok());

/// Parse a list of questions: a JSON array of strings, an object with a
/// `sub_questions`/`questions` array, or a numbered/bulleted list.
pub fn parse_question_list(text: &str) -> Vec<String> {
    if let Some(json) = extract_json(text) {
        if let Ok(value) = serde_json::from_str::<Value>(json) {
            let array = match &value {
                Value::Array(items) => Some(items),
                Value::Object(map) => map
                    .get("sub_questions")
                    .or_else(|| map.get("questions"))
                    .and_then(Value::as_array),
                _ => None,
            };
            if let Some(items) = array {
                return items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Object(o) => o
                            .get("text")
                            .or_else(|| o.get("question"))
                            .and_then(Value::as_str)
                            .map(|s| s.trim().to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
    }

    let listed: Vec<String> = match LIST_ITEM.as_ref() {
        Some(re) => text
            .lines()
            .filter_map(|line| re.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };
    if !listed.is_empty() {
        return listed;
    }

    text.lines()
        .map(str::trim)
        .filter(|line| line.ends_with('?'))
        .map(str::to_string)
        .collect()
}
