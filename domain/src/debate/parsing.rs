//! Answer extraction from free-form model output.
//!
//! Responder backends are asked to reply with a JSON object, but models
//! drift: fenced code blocks, prose around the JSON, or a bare
//! `Answer: 3`. These functions extract a `(choice, rationale)` pair from
//! what actually came back. Pure text logic, no I/O.
//!
//! Range validation is NOT done here; the agent enforces 1..=4 and re-asks
//! on violation, so an out-of-range number must survive parsing intact.

use serde_json::Value;

/// Extract a `(choice, rationale)` pair from raw model text.
///
/// Tried in order:
/// 1. A JSON object anywhere in the text with an `answer`/`choice` field
///    (number or numeric string) and an optional `reason`/`rationale` field
/// 2. An `Answer: N` or `Option N` pattern, with the full text as rationale
/// 3. The whole trimmed text as a standalone integer
///
/// Returns `None` when no integer can be found at all.
pub fn parse_answer_text(text: &str) -> Option<(i64, String)> {
    let stripped = strip_code_fences(text);

    if let Some(parsed) = parse_json_object(&stripped) {
        return Some(parsed);
    }

    if let Some(choice) = find_labeled_integer(&stripped, "answer")
        .or_else(|| find_labeled_integer(&stripped, "option"))
        .or_else(|| find_labeled_integer(&stripped, "choice"))
    {
        return Some((choice, stripped.trim().to_string()));
    }

    if let Ok(choice) = stripped.trim().parse::<i64>() {
        return Some((choice, String::new()));
    }

    None
}

/// Remove a surrounding markdown code fence, if present
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the optional language tag on the fence line
        let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
        let body = body.strip_suffix("```").unwrap_or(body);
        return body.trim().to_string();
    }
    trimmed.to_string()
}

/// Locate and parse the first JSON object in the text
fn parse_json_object(text: &str) -> Option<(i64, String)> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
    let object = value.as_object()?;

    let choice = ["answer", "choice", "option"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(json_integer)?;

    let rationale = ["reason", "rationale", "reasoning"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    Some((choice, rationale))
}

/// Read an integer from a JSON number or a numeric string
fn json_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Find `label ... N` (case-insensitive) and return N
fn find_labeled_integer(text: &str, label: &str) -> Option<i64> {
    let lower = text.to_lowercase();
    let at = lower.find(label)?;
    let tail = &lower[at + label.len()..];

    // Take the first run of digits after the label, honoring a minus sign
    let mut digits = String::new();
    let mut seen_digit = false;
    for c in tail.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            seen_digit = true;
        } else if c == '-' && !seen_digit && digits.is_empty() {
            digits.push(c);
        } else if seen_digit {
            break;
        } else if digits == "-" {
            digits.clear();
        }
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let (choice, rationale) =
            parse_answer_text(r#"{"answer": 3, "reason": "gravity wins"}"#).unwrap();
        assert_eq!(choice, 3);
        assert_eq!(rationale, "gravity wins");
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"answer\": 2, \"reason\": \"it fits\"}\n```";
        let (choice, rationale) = parse_answer_text(text).unwrap();
        assert_eq!(choice, 2);
        assert_eq!(rationale, "it fits");
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let text = "Here is my verdict: {\"choice\": 4, \"rationale\": \"best supported\"} done.";
        let (choice, rationale) = parse_answer_text(text).unwrap();
        assert_eq!(choice, 4);
        assert_eq!(rationale, "best supported");
    }

    #[test]
    fn test_parse_json_numeric_string() {
        let (choice, _) = parse_answer_text(r#"{"answer": "1"}"#).unwrap();
        assert_eq!(choice, 1);
    }

    #[test]
    fn test_parse_answer_label() {
        let (choice, rationale) = parse_answer_text("Answer: 2\nBecause the moon.").unwrap();
        assert_eq!(choice, 2);
        assert!(rationale.contains("the moon"));
    }

    #[test]
    fn test_parse_option_label() {
        let (choice, _) = parse_answer_text("I pick Option 3 here.").unwrap();
        assert_eq!(choice, 3);
    }

    #[test]
    fn test_parse_bare_integer() {
        assert_eq!(parse_answer_text("  4 \n").unwrap(), (4, String::new()));
    }

    #[test]
    fn test_out_of_range_survives_parsing() {
        // Range enforcement lives in the agent, not here
        let (choice, _) = parse_answer_text(r#"{"answer": 7, "reason": "oops"}"#).unwrap();
        assert_eq!(choice, 7);
    }

    #[test]
    fn test_unparsable_text() {
        assert!(parse_answer_text("I cannot decide.").is_none());
        assert!(parse_answer_text("").is_none());
    }
}
