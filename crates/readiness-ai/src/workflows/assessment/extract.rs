use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

const MIN_FALLBACK_SCORE: i64 = 1;
const MAX_FALLBACK_SCORE: i64 = 10;

fn digit_run() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\b([0-9]+)\b").expect("digit pattern compiles"))
}

/// Parses a scoring reply into a score.
///
/// A `{...}` span (first opening brace to last closing brace) that parses as JSON is
/// authoritative: its `score` is returned unclamped, and a missing or non-numeric
/// `score` means no score. Only when no such span parses does the first standalone
/// integer get used, clamped into `[1, 10]`.
pub fn extract_score(reply: &str) -> Option<i64> {
    if let Some(span) = json_span(reply) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return score_field(&value);
        }
    }

    let digits = digit_run().captures(reply)?.get(1)?.as_str();
    let parsed = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(parsed.clamp(MIN_FALLBACK_SCORE, MAX_FALLBACK_SCORE))
}

fn json_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn score_field(value: &Value) -> Option<i64> {
    let score = value.get("score")?;
    if let Some(whole) = score.as_i64() {
        return Some(whole);
    }
    score
        .as_f64()
        .filter(|value| value.is_finite())
        .map(|value| value.round() as i64)
}
