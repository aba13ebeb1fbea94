//! Script synthesis: strategy selection and dialect-shell composition.
//!
//! `synthesize` is a pure transformation of (operation, payload) to text and
//! never fails; a structurally bad payload surfaces later as a payload-level
//! script error. Injection safety rests on one rule: the payload crosses into
//! script text through a single whole-structure JSON serialization per
//! dialect boundary, never through per-field string concatenation.

use super::types::{ExecutionStrategy, Operation, Payload, ScriptArtifact};
use crate::templates;
use serde_json::Value;

// ============================================================================
// Strategy selection
// ============================================================================

/// Key present with a non-null value.
fn present(payload: &Payload, key: &str) -> bool {
    matches!(payload.get(key), Some(v) if !v.is_null())
}

/// Key present with a non-empty array value.
fn non_empty_array(payload: &Payload, key: &str) -> bool {
    matches!(payload.get(key), Some(Value::Array(items)) if !items.is_empty())
}

/// Decide the execution strategy for an operation given which optional
/// payload fields are present. Pure; decided once per call.
pub fn select_strategy(operation: Operation, payload: &Payload) -> ExecutionStrategy {
    match operation {
        // Collection scans and bulk reads only pay off with direct property
        // access; byIdentifier lookups are O(1) in the bridged dialect.
        Operation::ListTasks
        | Operation::ListProjects
        | Operation::ListTags
        | Operation::ListFolders
        | Operation::ProductivityStats
        | Operation::CompleteTask
        | Operation::DeleteTask => ExecutionStrategy::Bridged,

        // The only usable constructor lives in JXA, but tags and the planned
        // date cannot be set reliably there.
        Operation::CreateTask => {
            if non_empty_array(payload, "tags") || present(payload, "plannedDate") {
                ExecutionStrategy::Hybrid
            } else {
                ExecutionStrategy::Direct
            }
        }

        // Scalar-only updates stay in JXA; tag, planned-date, and recurrence
        // changes need in-process semantics. Key presence (even null / empty
        // array) routes bridged, because clearing those fields also needs it.
        Operation::UpdateTask => {
            let bridge_only = ["tags", "addTags", "removeTags", "plannedDate", "repetitionRule"];
            if bridge_only.iter().any(|k| payload.contains_key(*k)) {
                ExecutionStrategy::Bridged
            } else {
                ExecutionStrategy::Direct
            }
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

/// Serialize a JSON value for direct inclusion in script source.
///
/// JSON is valid JS literal syntax except for unescaped U+2028/U+2029 inside
/// strings, which serde_json emits raw; escape them so the emitted text is a
/// valid literal under every JavaScriptCore generation.
fn json_for_script(value: &Value) -> String {
    value
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Encode arbitrary text as a JS string literal (JSON string encoding).
fn js_string_literal(text: &str) -> String {
    json_for_script(&Value::String(text.to_owned()))
}

/// The single payload-injection statement for one dialect context.
fn payload_decl(payload: &Payload) -> String {
    format!(
        "const params = {};",
        json_for_script(&Value::Object(payload.clone()))
    )
}

// ============================================================================
// Shells
// ============================================================================

/// JXA outer shell: application + document handles, one payload declaration,
/// and a catch boundary that reports errors as a JSON error envelope.
fn direct_shell(payload: &Payload, body: &str) -> String {
    format!(
        "(() => {{\n\
         \x20 const app = Application(\"OmniFocus\");\n\
         \x20 app.includeStandardAdditions = true;\n\
         \x20 const doc = app.defaultDocument;\n\
         \x20 {decl}\n\
         \x20 try {{\n\
         {body}\n\
         \x20 }} catch (err) {{\n\
         \x20   return JSON.stringify({{ error: true, message: String(err && err.message ? err.message : err) }});\n\
         \x20 }}\n\
         }})()",
        decl = payload_decl(payload),
        body = body,
    )
}

/// The Omni Automation program executed through the bridge: its own payload
/// declaration plus the body, behind its own catch boundary.
pub(crate) fn bridged_inner_source(payload: &Payload, body: &str) -> String {
    format!(
        "(() => {{\n\
         \x20 {decl}\n\
         \x20 try {{\n\
         {body}\n\
         \x20 }} catch (err) {{\n\
         \x20   return JSON.stringify({{ error: true, message: String(err && err.message ? err.message : err) }});\n\
         \x20 }}\n\
         }})()",
        decl = payload_decl(payload),
        body = body,
    )
}

/// JXA shell that carries the whole body across the bridge in one
/// `evaluateJavascript` call. The inner program is embedded as one
/// JSON-encoded string literal; no other interpolation points exist.
fn bridged_shell(payload: &Payload, body: &str) -> String {
    let inner = js_string_literal(&bridged_inner_source(payload, body));
    format!(
        "(() => {{\n\
         \x20 const app = Application(\"OmniFocus\");\n\
         \x20 try {{\n\
         \x20   const result = app.evaluateJavascript({inner});\n\
         \x20   return typeof result === \"string\" ? result : JSON.stringify(result);\n\
         \x20 }} catch (err) {{\n\
         \x20   return JSON.stringify({{ error: true, message: String(err && err.message ? err.message : err) }});\n\
         \x20 }}\n\
         }})()",
        inner = inner,
    )
}

/// A nested bridge call issued from inside a direct-dialect body (the hybrid
/// strategy). The nested payload is composed *at script runtime* with
/// `JSON.stringify` over locals (`params_expr`), keyed by the primary
/// action's result — never by re-serializing the outer payload. Bridge
/// failures propagate by returning the bridge's own error envelope.
fn bridge_call(params_expr: &str, body: &str) -> String {
    let body_lit = js_string_literal(&format!("\n{body}\n"));
    format!(
        "const bridgeParams = JSON.stringify({params_expr});\n\
         const bridgeSource = \"(() => {{ try {{ const params = \" + bridgeParams + \";\" + {body_lit} + \"}} catch (err) {{ return JSON.stringify({{ error: true, message: String(err && err.message ? err.message : err) }}); }} }})()\";\n\
         const bridgeResult = app.evaluateJavascript(bridgeSource);\n\
         const bridgeOutcome = JSON.parse(bridgeResult);\n\
         if (bridgeOutcome && bridgeOutcome.error) {{ return bridgeResult; }}"
    )
}

// ============================================================================
// Synthesis
// ============================================================================

/// Build a complete, self-contained script artifact for an operation.
pub fn synthesize(operation: Operation, payload: &Payload) -> ScriptArtifact {
    let strategy = select_strategy(operation, payload);

    let source = match strategy {
        ExecutionStrategy::Direct => {
            let body = templates::body_for(operation, strategy, None);
            direct_shell(payload, &body)
        }
        ExecutionStrategy::Bridged => {
            let body = templates::body_for(operation, strategy, None);
            bridged_shell(payload, &body)
        }
        ExecutionStrategy::Hybrid => {
            let bridge = bridge_call(
                templates::tasks::CREATE_FIXUP_PARAMS_EXPR,
                templates::tasks::create_fixup_body(),
            );
            let body = templates::body_for(operation, strategy, Some(&bridge));
            direct_shell(payload, &body)
        }
    };

    ScriptArtifact {
        source,
        strategy,
        description: format!("{operation} ({strategy})"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExecutionStrategy as S;
    use proptest::prelude::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    /// Pull the injected payload back out of a `const params = ...;` line and
    /// parse it with a JSON parser (the dialect's own literal grammar).
    fn extract_params(source: &str) -> Value {
        let line = source
            .lines()
            .find(|l| l.trim_start().starts_with("const params = "))
            .expect("no payload declaration");
        let json = line
            .trim_start()
            .strip_prefix("const params = ")
            .unwrap()
            .strip_suffix(';')
            .expect("declaration not terminated");
        serde_json::from_str(json).expect("payload does not round-trip")
    }

    #[test]
    fn test_synth_strategy_list_ops_bridged() {
        let empty = Payload::new();
        for op in [
            Operation::ListTasks,
            Operation::ListProjects,
            Operation::ListTags,
            Operation::ListFolders,
            Operation::ProductivityStats,
        ] {
            assert_eq!(select_strategy(op, &empty), S::Bridged, "{op}");
        }
    }

    #[test]
    fn test_synth_strategy_create_determinism() {
        let cheap = payload(json!({ "name": "x" }));
        let cheap_empty_tags = payload(json!({ "name": "x", "tags": [] }));
        let tagged = payload(json!({ "name": "x", "tags": ["errand"] }));
        let planned = payload(json!({ "name": "x", "plannedDate": "2026-03-01 08:00" }));

        assert_eq!(select_strategy(Operation::CreateTask, &cheap), S::Direct);
        assert_eq!(select_strategy(Operation::CreateTask, &cheap_empty_tags), S::Direct);
        assert_eq!(select_strategy(Operation::CreateTask, &tagged), S::Hybrid);
        assert_eq!(select_strategy(Operation::CreateTask, &planned), S::Hybrid);
    }

    #[test]
    fn test_synth_strategy_update_scalar_vs_bridge_fields() {
        let scalar = payload(json!({ "id": "a", "name": "n", "flagged": true }));
        assert_eq!(select_strategy(Operation::UpdateTask, &scalar), S::Direct);

        for bridge_field in ["tags", "addTags", "removeTags", "plannedDate", "repetitionRule"] {
            let mut p = payload(json!({ "id": "a" }));
            p.insert(bridge_field.to_string(), Value::Null);
            assert_eq!(
                select_strategy(Operation::UpdateTask, &p),
                S::Bridged,
                "{bridge_field}"
            );
        }
    }

    #[test]
    fn test_synth_strategy_complete_delete_bridged() {
        let p = payload(json!({ "id": "abc123" }));
        assert_eq!(select_strategy(Operation::CompleteTask, &p), S::Bridged);
        assert_eq!(select_strategy(Operation::DeleteTask, &p), S::Bridged);
    }

    #[test]
    fn test_synth_direct_single_injection_point() {
        let p = payload(json!({ "name": "buy milk" }));
        let artifact = synthesize(Operation::CreateTask, &p);
        assert_eq!(artifact.strategy, S::Direct);
        assert_eq!(artifact.source.matches("const params = ").count(), 1);
        assert_eq!(extract_params(&artifact.source), json!({ "name": "buy milk" }));
    }

    #[test]
    fn test_synth_bridged_single_injection_point() {
        let p = payload(json!({ "id": "abc123" }));
        let artifact = synthesize(Operation::CompleteTask, &p);
        assert_eq!(artifact.strategy, S::Bridged);
        // The one declaration lives inside the embedded inner program.
        assert_eq!(artifact.source.matches("const params = ").count(), 1);
        assert!(artifact.source.contains("evaluateJavascript"));
        assert!(artifact.source.contains("Task.byIdentifier"));
    }

    #[test]
    fn test_synth_hybrid_one_declaration_per_boundary() {
        let p = payload(json!({ "name": "x", "tags": ["home"] }));
        let artifact = synthesize(Operation::CreateTask, &p);
        assert_eq!(artifact.strategy, S::Hybrid);
        // Outer JXA context + one nested bridge context.
        assert_eq!(artifact.source.matches("const params = ").count(), 2);
        // The nested payload is built from the created task's id at runtime.
        assert!(artifact.source.contains("JSON.stringify({ id: taskId"));
        assert!(!artifact.source.contains("JSON.parse(JSON.stringify(params)"));
    }

    #[test]
    fn test_synth_bridged_inner_roundtrip() {
        let p = payload(json!({ "id": "x\"y\\z\nnl", "limit": 5 }));
        let inner = bridged_inner_source(&p, templates::tasks::list_body());
        assert_eq!(extract_params(&inner), json!({ "id": "x\"y\\z\nnl", "limit": 5 }));
    }

    #[test]
    fn test_synth_hostile_payload_roundtrip() {
        let hostile = json!({
            "name": "\"; doShellScript(\"rm -rf ~\"); const x = \"",
            "note": "line1\nline2\\n\u{2028}sep\u{2029}para",
            "emoji": "😀🎉",
            "quote": "it's a 'test' \"quoted\"",
        });
        let p = payload(hostile.clone());
        let artifact = synthesize(Operation::CreateTask, &p);
        assert_eq!(extract_params(&artifact.source), hostile);
        // The declaration line must still be exactly one statement.
        assert_eq!(artifact.source.matches("const params = ").count(), 1);
    }

    #[test]
    fn test_synth_no_catastrophic_primitive_any_op() {
        let payloads = [
            Payload::new(),
            payload(json!({ "id": "a", "name": "n", "tags": ["t"], "plannedDate": "2026-01-01" })),
        ];
        for op in Operation::all() {
            for p in &payloads {
                let artifact = synthesize(op, p);
                assert!(
                    !artifact.source.contains(".whose("),
                    "{op}: catastrophic primitive in artifact"
                );
            }
        }
    }

    #[test]
    fn test_synth_description_names_op_and_strategy() {
        let p = payload(json!({ "id": "abc123" }));
        let artifact = synthesize(Operation::CompleteTask, &p);
        assert_eq!(artifact.description, "completeTask (bridged)");
    }

    #[test]
    fn test_synth_u2028_escaped_in_source() {
        let p = payload(json!({ "note": "a\u{2028}b" }));
        let artifact = synthesize(Operation::CreateTask, &p);
        assert!(!artifact.source.contains('\u{2028}'));
        assert!(artifact.source.contains("\\u2028"));
        assert_eq!(extract_params(&artifact.source), json!({ "note": "a\u{2028}b" }));
    }

    proptest! {
        /// Whole-payload serialization round-trips any string content,
        /// including quotes, backslashes, newlines, and astral characters.
        #[test]
        fn prop_synth_payload_roundtrip(name in any::<String>(), note in any::<String>()) {
            let mut p = Payload::new();
            p.insert("name".to_string(), Value::String(name.clone()));
            p.insert("note".to_string(), Value::String(note.clone()));
            let artifact = synthesize(Operation::CreateTask, &p);
            let round = extract_params(&artifact.source);
            prop_assert_eq!(round, json!({ "name": name, "note": note }));
        }

        /// Strategy is a function of fields present, not field contents.
        #[test]
        fn prop_synth_strategy_ignores_scalar_contents(name in any::<String>()) {
            let mut p = Payload::new();
            p.insert("name".to_string(), Value::String(name));
            prop_assert_eq!(select_strategy(Operation::CreateTask, &p), S::Direct);
        }
    }
}
