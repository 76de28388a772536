// Output normalizer
// Model replies often arrive wrapped in a Markdown code fence; strip it and
// parse the remainder as JSON. The parsed value is returned as-is: no schema
// validation happens here, consumers receive whatever shape the model made.

use serde_json::Value;

/// Strips a surrounding triple-backtick fence, optionally tagged `json`.
/// Text without a fence is returned trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parses the model reply as JSON after fence stripping.
pub fn parse_analysis(raw: &str) -> serde_json::Result<Value> {
    serde_json::from_str(strip_code_fences(raw))
}
