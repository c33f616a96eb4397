// src/core/pretty.rs

//! # Result Pretty-Printer
//!
//! Renders an arbitrary JSON result as display text. Every element of an
//! array or object is followed by [`RESULT_LINE_BREAK`], nested containers are
//! flattened into the same stream, and no indentation is produced.

use crate::constants::RESULT_LINE_BREAK;
use serde_json::Value;

/// Renders `value` for display. `depth` is threaded through recursion so a
/// renderer that indents can be dropped in; the output does not depend on it.
pub fn render(value: &Value, depth: usize) -> String {
    let mut out = String::new();
    render_into(&mut out, value, depth);
    out
}

#[allow(clippy::only_used_in_recursion)]
fn render_into(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Null => out.push_str("Null"),
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(items) => {
            for item in items {
                render_into(out, item, depth + 1);
                out.push_str(RESULT_LINE_BREAK);
            }
        }
        Value::Object(entries) => {
            for (key, item) in entries {
                out.push_str(key);
                out.push_str(": ");
                render_into(out, item, depth + 1);
                out.push_str(RESULT_LINE_BREAK);
            }
        }
    }
}
