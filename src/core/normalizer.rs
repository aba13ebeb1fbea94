//! Result normalization: raw captured text to one canonical shape.
//!
//! The template library went through several response-envelope generations
//! (bare JSON, `{error, message}`, `{success, data}`, `{ok, data}`); this
//! module tolerates all of them so templates never have to be rewritten in
//! lockstep. When markers conflict across nesting levels, the innermost one
//! wins — it is the closest to the operation that actually failed.

use super::types::{ClassifiedResult, ErrorKind, Failure, ScriptArtifact};
use serde_json::{Map, Value};

/// Longest raw-output sample attached to an invalid-output failure.
const RAW_SAMPLE_LIMIT: usize = 512;

/// Classify trimmed subprocess output into typed data or a failure.
pub fn normalize(raw: &str, artifact: &ScriptArtifact) -> ClassifiedResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Failure::new(
            ErrorKind::EmptyOutput,
            format!("{} produced no output", artifact.description),
        ));
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        Failure::new(
            ErrorKind::InvalidOutput,
            format!("{} returned unparseable output: {e}", artifact.description),
        )
        .with_details(Value::String(sample(trimmed)))
    })?;

    classify(value)
}

fn sample(raw: &str) -> String {
    if raw.len() <= RAW_SAMPLE_LIMIT {
        return raw.to_string();
    }
    let mut end = RAW_SAMPLE_LIMIT;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}

/// A payload-level error marker: `error: true`, `success: false`, or
/// `ok: false`.
fn marker(obj: &Map<String, Value>) -> Option<Failure> {
    let flagged = obj.get("error") == Some(&Value::Bool(true))
        || obj.get("success") == Some(&Value::Bool(false))
        || obj.get("ok") == Some(&Value::Bool(false));
    if !flagged {
        return None;
    }

    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("script reported an error")
        .to_string();
    let details = obj.get("details").or_else(|| obj.get("context")).cloned();

    let mut failure = Failure::new(ErrorKind::ScriptError, message);
    if let Some(d) = details {
        failure = failure.with_details(d);
    }
    Some(failure)
}

/// Find the most specific error marker, preferring one nested inside `data`
/// over one at the current level.
fn innermost_marker(obj: &Map<String, Value>) -> Option<Failure> {
    if let Some(Value::Object(inner)) = obj.get("data") {
        if let Some(failure) = innermost_marker(inner) {
            return Some(failure);
        }
    }
    marker(obj)
}

/// Envelope with an explicit positive success flag and a data field.
fn is_success_envelope(obj: &Map<String, Value>) -> bool {
    let positive = obj.get("success") == Some(&Value::Bool(true))
        || obj.get("ok") == Some(&Value::Bool(true));
    positive && obj.contains_key("data")
}

fn classify(value: Value) -> ClassifiedResult<Value> {
    match value {
        Value::Object(mut obj) => {
            if let Some(failure) = innermost_marker(&obj) {
                return Err(failure);
            }
            if is_success_envelope(&obj) {
                // Unwrap, then re-classify: data may itself be a legacy
                // envelope whose outer flag lied about success.
                let data = obj.remove("data").unwrap_or(Value::Null);
                return classify(data);
            }
            Ok(Value::Object(obj))
        }
        other => Ok(other),
    }
}
