//! Rendering of entry, exit and failure messages

use std::borrow::Cow;

use serde_json::Value;

use crate::types::{CallArgs, CallContext};

/// Render a value the way it appears in a log line
///
/// Strings are written without quotes, `null` stands for absent values and
/// everything else is compact JSON.
pub fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Render the argument segment: `a=1,b=x`, or `1,x` when names are unavailable
///
/// Arguments beyond the known names are rendered bare.
pub fn render_args(args: &CallArgs) -> String {
    let mut out = String::new();
    for (i, value) in args.values().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if let Some(name) = args.name(i) {
            out.push_str(name);
            out.push('=');
        }
        out.push_str(&render_value(&value));
    }
    out
}

pub fn entry_message(call: &CallContext) -> String {
    format!("Started {} [{}]", call.name(), render_args(call.args()))
}

pub fn exit_message(call: &CallContext, returned: &Value, elapsed_ms: u128) -> String {
    format!(
        "Finished {} [{}] returned [{}] in {} ms",
        call.name(),
        render_args(call.args()),
        render_value(returned),
        elapsed_ms
    )
}

/// Failure line; the bracket after `thrown` is left open on purpose
/// so existing log parsers keep matching.
pub fn failure_message(call: &CallContext, error_type: &str, error_message: &str) -> String {
    format!(
        "Failed {} [{}] thrown [{} with message {}",
        call.name(),
        render_args(call.args()),
        error_type,
        error_message
    )
}
