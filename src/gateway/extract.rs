// JSON extraction from free-text model output
//
// Models wrap JSON in code fences, prefix it with prose, or append
// commentary. Extraction is best-effort:
//
// 1. Strip one leading fence (with optional language tag) and one trailing fence.
// 2. Scan for balanced `{...}` regions, skipping braces inside JSON strings,
//    and return the first region that parses. A region that is balanced but
//    does not parse is skipped as a whole; an unterminated region ends the scan.
// 3. Fall back to the widest match: first `{` to last `}`.
//
// Step 3 accepts everything a plain greedy match would. Step 2 comes first
// because the greedy match mis-extracts when prose around the payload also
// contains braces.

use serde_json::Value;

use crate::error::{ForgeError, Result};

/// Remove a leading ```` ```lang ```` fence and a trailing ```` ``` ```` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let rest = &rest[tag_len..];
        s = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    if let Some(rest) = s.strip_suffix("```") {
        s = rest
            .strip_suffix("\r\n")
            .or_else(|| rest.strip_suffix('\n'))
            .unwrap_or(rest);
    }

    s
}

/// End index (exclusive) of the balanced object starting at `start`,
/// or `None` if the text ends first.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes[start], b'{');

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// First balanced `{...}` region that parses as a JSON object.
pub fn extract_json_balanced(text: &str) -> Option<Value> {
    let mut pos = 0;
    while let Some(found) = text[pos..].find('{') {
        let start = pos + found;
        let end = balanced_end(text, start)?;
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&text[start..end]) {
            return Some(value);
        }
        pos = end;
    }
    None
}

/// Widest `{...}` region: first `{` to last `}`.
///
/// Can mis-extract when unrelated braces surround the payload; only used
/// after the balanced scan finds nothing.
pub fn extract_json_greedy(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Locate and parse the JSON object in a model response.
pub fn extract_json_object(raw: &str) -> Result<Value> {
    let text = strip_code_fences(raw);

    if let Some(value) = extract_json_balanced(text) {
        return Ok(value);
    }

    let Some(candidate) = extract_json_greedy(text) else {
        return Err(ForgeError::MalformedResponse(
            "no JSON object found in model response".to_string(),
        ));
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ForgeError::MalformedResponse(
            "model response JSON is not an object".to_string(),
        )),
        Err(e) => Err(ForgeError::MalformedResponse(format!(
            "invalid JSON in model response: {e}"
        ))),
    }
}
