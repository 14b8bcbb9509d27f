//! Invocation adapter for the hook tool-call envelope.
//!
//! The hosting agent reports each proposed file mutation as a JSON envelope
//! on stdin: `{ "tool_name": ..., "tool_input": { ... } }`. Only the three
//! content-mutating tools are evaluated; everything else short-circuits to
//! an implicit pass before any scanning happens.

use serde::Deserialize;

use gatecheck_core::errors::EnvelopeError;

/// Raw envelope as received from the hosting agent. Consumed, not designed
/// here; unknown fields are ignored for forward compatibility.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
}

/// Union of the tool-input shapes for Write, Edit, and MultiEdit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolInput {
    pub file_path: String,
    pub content: Option<String>,
    pub new_string: Option<String>,
    pub edits: Option<Vec<EditFragment>>,
}

/// One fragment of a multi-edit request. Only the replacement text is
/// scanned; the text being replaced never reaches the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditFragment {
    pub new_string: String,
}

/// Kind of content mutation being proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    EditFragment,
    MultiEditFragments,
}

/// A proposed change extracted from the envelope, ready for scanning.
/// Fragment order is request order; line-number attribution and
/// adjacency-sensitive rules depend on it.
#[derive(Debug, Clone)]
pub struct ChangeRequest {
    pub kind: OperationKind,
    pub path: String,
    pub fragments: Vec<String>,
}

impl ChangeRequest {
    /// The scannable content: all fragments joined in request order.
    /// Fragments are joined with a newline so a rule can never match across
    /// a fragment boundary as if the texts were contiguous.
    pub fn content(&self) -> String {
        self.fragments.join("\n")
    }
}

/// Parse the raw envelope JSON.
pub fn parse_event(input: &str) -> Result<HookEvent, EnvelopeError> {
    if input.trim().is_empty() {
        return Err(EnvelopeError::EmptyInput);
    }
    serde_json::from_str(input).map_err(|e| EnvelopeError::MalformedJson(e.to_string()))
}

/// Extract a `ChangeRequest` from an event.
///
/// Returns `Ok(None)` for tools that do not mutate file content — the
/// caller treats that as an implicit pass. A mutating tool without a target
/// path is a malformed envelope.
pub fn change_request(event: &HookEvent) -> Result<Option<ChangeRequest>, EnvelopeError> {
    let (kind, fragments) = match event.tool_name.as_str() {
        "Write" => (
            OperationKind::Create,
            vec![event.tool_input.content.clone().unwrap_or_default()],
        ),
        "Edit" => (
            OperationKind::EditFragment,
            vec![event.tool_input.new_string.clone().unwrap_or_default()],
        ),
        "MultiEdit" => (
            OperationKind::MultiEditFragments,
            event
                .tool_input
                .edits
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|e| e.new_string.clone())
                .collect(),
        ),
        _ => return Ok(None),
    };

    if event.tool_input.file_path.is_empty() {
        return Err(EnvelopeError::MissingField { field: "file_path" });
    }

    Ok(Some(ChangeRequest {
        kind,
        path: event.tool_input.file_path.clone(),
        fragments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_envelope_yields_create() {
        let event = parse_event(
            r#"{"tool_name":"Write","tool_input":{"file_path":"src/a.ts","content":"let x = 1;"}}"#,
        )
        .unwrap();
        let req = change_request(&event).unwrap().unwrap();
        assert_eq!(req.kind, OperationKind::Create);
        assert_eq!(req.path, "src/a.ts");
        assert_eq!(req.content(), "let x = 1;");
    }

    #[test]
    fn multi_edit_fragments_preserve_request_order() {
        let event = parse_event(
            r#"{"tool_name":"MultiEdit","tool_input":{"file_path":"src/a.ts","edits":[
                {"old_string":"a","new_string":"first"},
                {"old_string":"b","new_string":"second"}
            ]}}"#,
        )
        .unwrap();
        let req = change_request(&event).unwrap().unwrap();
        assert_eq!(req.kind, OperationKind::MultiEditFragments);
        assert_eq!(req.content(), "first\nsecond");
    }

    #[test]
    fn non_mutating_tool_short_circuits() {
        let event =
            parse_event(r#"{"tool_name":"Read","tool_input":{"file_path":"src/a.ts"}}"#).unwrap();
        assert!(change_request(&event).unwrap().is_none());
    }

    #[test]
    fn mutating_tool_without_path_is_malformed() {
        let event = parse_event(r#"{"tool_name":"Write","tool_input":{"content":"x"}}"#).unwrap();
        assert!(matches!(
            change_request(&event),
            Err(EnvelopeError::MissingField { field: "file_path" })
        ));
    }

    #[test]
    fn garbage_input_is_malformed_json() {
        assert!(matches!(
            parse_event("not json"),
            Err(EnvelopeError::MalformedJson(_))
        ));
        assert!(matches!(parse_event("  "), Err(EnvelopeError::EmptyInput)));
    }
}
