//! Result extractor - tolerant JSON recovery from raw model output.
//!
//! Models wrap JSON in prose and markdown fences, truncate long replies,
//! and leave trailing commas. Extraction tries, in order: the first
//! ```json fence, the first fence of any language, the whole text; then a
//! best-effort repair pass; and finally a raw-text placeholder so the
//! sequencer never aborts solely because of malformed output.

use serde_json::Value;

use super::StageResult;

/// Extract a structured value from raw model output. Never fails.
pub fn extract(raw: &str) -> StageResult {
    let candidate = fenced_block(raw, Some("json"))
        .or_else(|| fenced_block(raw, None))
        .unwrap_or(raw)
        .trim();

    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return StageResult::new(value);
    }

    if let Some(value) = repair(candidate) {
        tracing::debug!("stage output required JSON repair");
        return StageResult::new(value);
    }

    let preview: String = raw.chars().take(120).collect();
    tracing::warn!(
        %preview,
        "could not parse stage output as JSON, falling back to raw text"
    );
    StageResult::fallback(raw)
}

/// Content of the first fenced code block; `tag` restricts to e.g. ```json.
fn fenced_block<'a>(raw: &'a str, tag: Option<&str>) -> Option<&'a str> {
    let body = match tag {
        Some(tag) => {
            let marker = format!("```{tag}");
            let start = raw.find(&marker)? + marker.len();
            &raw[start..]
        }
        None => {
            let start = raw.find("```")? + 3;
            // Skip a language tag sitting on the fence line.
            raw[start..].trim_start_matches(|c: char| c.is_alphanumeric() || c == '_')
        }
    };
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Best-effort repair over a failed candidate: pull out the first
/// brace-balanced object, drop trailing commas, close unterminated
/// strings/braces/brackets left by truncation.
fn repair(candidate: &str) -> Option<Value> {
    if let Some(object) = balanced_object(candidate) {
        if let Ok(value) = serde_json::from_str(object) {
            return Some(value);
        }
        if let Ok(value) = serde_json::from_str(&strip_trailing_commas(object)) {
            return Some(value);
        }
    }

    let start = candidate.find('{')?;
    let patched = close_open_scopes(&strip_trailing_commas(&candidate[start..]));
    serde_json::from_str(&patched).ok()
}

/// First `{...}` span with balanced braces, string-aware.
fn balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' if in_string => {
                escaped = true;
                out.push(ch);
            }
            '"' => {
                in_string = !in_string;
                out.push(ch);
            }
            '}' | ']' if !in_string => {
                while out.ends_with(|c: char| c.is_whitespace()) {
                    out.pop();
                }
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Close whatever scopes a truncated reply left open.
fn close_open_scopes(raw: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => stack.push('}'),
            '[' if !in_string => stack.push(']'),
            '}' | ']' if !in_string => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut out = raw.trim_end().trim_end_matches(',').to_string();
    if in_string {
        out.push('"');
    }
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_tagged_fence_and_ignores_prose() {
        let raw = "Here is the result:\n```json\n{\"destination_city\": \"Jaipur\"}\n```\nHope that helps!";
        let result = extract(raw);
        assert_eq!(result.str_or("destination_city", ""), "Jaipur");
    }

    #[test]
    fn parses_an_untagged_fence() {
        let raw = "```\n{\"within_budget\": true}\n```";
        let result = extract(raw);
        assert!(result.bool_or("within_budget", false));
    }

    #[test]
    fn parses_bare_json() {
        let result = extract("{\"computed_total\": 42000}");
        assert_eq!(result.u64_or("computed_total", 0), 42_000);
    }

    #[test]
    fn recovers_an_object_embedded_in_prose() {
        let result = extract("The plan is {\"attractions\": [\"Hawa Mahal\"]} as requested.");
        assert_eq!(result.array("attractions").len(), 1);
    }

    #[test]
    fn repairs_trailing_commas() {
        let result = extract("{\"cuisine\": [\"dal baati\",], \"attractions\": [],}");
        assert_eq!(result.array("cuisine"), [json!("dal baati")]);
    }

    #[test]
    fn repairs_a_truncated_reply() {
        let result = extract("{\"itinerary\": [{\"day\": 1, \"activities\": [");
        assert!(!result.is_fallback());
        assert_eq!(result.array("itinerary").len(), 1);
    }

    #[test]
    fn falls_back_to_raw_text_without_failing() {
        let raw = "I am sorry, I cannot produce a plan.";
        let result = extract(raw);
        assert!(result.is_fallback());
        assert_eq!(result.str_or("raw_output", ""), raw);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let raw = "note: {\"reasoning\": \"use the {old town} loop\", \"destination_city\": \"Kochi\"} done";
        let result = extract(raw);
        assert_eq!(result.str_or("destination_city", ""), "Kochi");
    }
}
