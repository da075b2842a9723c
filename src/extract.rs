//! Tool-call extraction from raw completion text.
//!
//! The model is asked to emit a flat JSON object (`{"tool": ..., "args":
//! {...}}`) on its own line, but in practice the object arrives embedded in
//! prose. A single regex pass finds the first span of that shape; anything
//! that fails to parse is downgraded to plain explanation text, never an
//! error. `args` is matched one brace level deep on purpose: nested objects
//! are not part of the wire shape, and a wider matcher would start swallowing
//! prose that merely looks like JSON.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

/// A structured invocation recovered from model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Map<String, Value>,
}

fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{[^{}]*"tool"\s*:\s*"[^"]+"\s*,\s*"args"\s*:\s*\{[^}]*\}[^{}]*\}"#)
            .expect("tool-call pattern is valid")
    })
}

/// Split raw completion text into an optional tool call and the surrounding
/// explanation. At most one call is extracted per invocation; the text before
/// and after the matched span, trimmed and space-joined, becomes the
/// explanation.
pub fn extract_tool_call(text: &str) -> (Option<ToolCall>, String) {
    let Some(found) = call_pattern().find(text) else {
        return (None, text.to_string());
    };

    let parsed: Value = match serde_json::from_str(found.as_str()) {
        Ok(value) => value,
        Err(_) => return (None, text.to_string()),
    };

    let name = parsed.get("tool").and_then(Value::as_str);
    let args = parsed.get("args").and_then(Value::as_object);
    let (Some(name), Some(args)) = (name, args) else {
        return (None, text.to_string());
    };

    let before = text[..found.start()].trim();
    let after = text[found.end()..].trim();
    let explanation = format!("{before} {after}").trim().to_string();

    (
        Some(ToolCall {
            name: name.to_string(),
            args: args.clone(),
        }),
        explanation,
    )
}
