//! Parse model output into document requirements

use crate::error::ChecklistError;
use edict_domain::{DocumentRequirement, ExigenceStatus};
use serde_json::{Map, Value};
use tracing::warn;

/// Top-level keys accepted as the list location, tried in order
pub const ACCEPTED_LIST_KEYS: [&str; 2] = ["checklistItems", "documents"];

/// Parse a raw model response into requirements
///
/// Strips code fences, then looks for the item list under each key of
/// [`ACCEPTED_LIST_KEYS`] in order. Items without a usable name are skipped.
pub fn parse_checklist_response(response: &str) -> Result<Vec<DocumentRequirement>, ChecklistError> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return Err(ChecklistError::EmptyResponse);
    }

    let json: Value = serde_json::from_str(cleaned)
        .map_err(|e| ChecklistError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ChecklistError::MalformedResponse("Expected JSON object".to_string()))?;

    let (key, list) = ACCEPTED_LIST_KEYS
        .iter()
        .find_map(|key| obj.get(*key).map(|list| (*key, list)))
        .ok_or_else(|| {
            ChecklistError::MalformedResponse(format!(
                "None of the keys {:?} present",
                ACCEPTED_LIST_KEYS
            ))
        })?;

    let items = list.as_array().ok_or_else(|| {
        ChecklistError::MalformedResponse(format!("'{}' is not an array", key))
    })?;

    let mut documents = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item.as_object().and_then(normalize_item) {
            Some(document) => documents.push(document),
            None => warn!("Skipping checklist item {}: no usable name", idx),
        }
    }

    Ok(documents)
}

/// Remove a surrounding markdown code fence, if any
///
/// A leading "```json" or "```" and a trailing "```" are dropped, then the
/// remainder is trimmed.
pub fn strip_code_fences(response: &str) -> &str {
    let mut text = response.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn normalize_item(obj: &Map<String, Value>) -> Option<DocumentRequirement> {
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let status = obj
        .get("exigenceStatus")
        .and_then(Value::as_str)
        .map(ExigenceStatus::from_label)
        .unwrap_or_default();

    let additional_info = obj
        .get("additionalInfo")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let possible_to_attach = obj
        .get("possibleToAttach")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Some(
        DocumentRequirement::new(name, status)
            .with_additional_info(additional_info)
            .with_possible_to_attach(possible_to_attach),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_checklist() {
        let response = "```json\n{\"checklistItems\":[{\"name\":\"Certidão\",\"exigenceStatus\":\"OBRIGATORIO\",\"additionalInfo\":\"\",\"possibleToAttach\":true}]}\n```";

        let documents = parse_checklist_response(response).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "Certidão");
        assert!(documents[0].is_mandatory());
        assert!(documents[0].possible_to_attach);
    }

    #[test]
    fn test_parse_documents_key() {
        let response = r#"{"documents": [
            {"name": "Balanço patrimonial", "exigenceStatus": "OPCIONAL", "additionalInfo": "Último exercício", "possibleToAttach": false}
        ]}"#;

        let documents = parse_checklist_response(response).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].additional_info, "Último exercício");
        assert!(!documents[0].is_mandatory());
        assert!(!documents[0].possible_to_attach);
    }

    #[test]
    fn test_checklist_items_key_wins() {
        let response = r#"{
            "documents": [{"name": "B"}],
            "checklistItems": [{"name": "A"}]
        }"#;

        let documents = parse_checklist_response(response).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "A");
    }

    #[test]
    fn test_unknown_shape_is_malformed() {
        let result = parse_checklist_response(r#"{"items": []}"#);
        assert!(matches!(result, Err(ChecklistError::MalformedResponse(_))));

        let result = parse_checklist_response(r#"[{"name": "A"}]"#);
        assert!(matches!(result, Err(ChecklistError::MalformedResponse(_))));

        let result = parse_checklist_response(r#"{"checklistItems": "none"}"#);
        assert!(matches!(result, Err(ChecklistError::MalformedResponse(_))));
    }

    #[test]
    fn test_prose_is_malformed() {
        let result = parse_checklist_response("Desculpe, não consegui ler o edital.");
        assert!(matches!(result, Err(ChecklistError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_after_fences() {
        assert!(matches!(
            parse_checklist_response("```json\n```"),
            Err(ChecklistError::EmptyResponse)
        ));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let documents = parse_checklist_response(r#"{"checklistItems": []}"#).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn test_item_defaults() {
        let response = r#"{"checklistItems": [
            {"name": "Contrato social"},
            {"name": "Alvará", "exigenceStatus": "  mandatory ", "additionalInfo": null},
            {"name": "Procuração", "exigenceStatus": "TALVEZ"}
        ]}"#;

        let documents = parse_checklist_response(response).unwrap();
        assert_eq!(documents.len(), 3);

        assert_eq!(documents[0].exigence_status, ExigenceStatus::Optional);
        assert_eq!(documents[0].additional_info, "");
        assert!(documents[0].possible_to_attach);

        assert!(documents[1].is_mandatory());
        assert_eq!(documents[1].additional_info, "");

        assert_eq!(documents[2].exigence_status, ExigenceStatus::Optional);
    }

    #[test]
    fn test_items_without_name_are_skipped() {
        let response = r#"{"checklistItems": [
            {"name": "A", "exigenceStatus": "OBRIGATORIO"},
            {"exigenceStatus": "OBRIGATORIO"},
            {"name": "   "},
            "loose string",
            {"name": "B"}
        ]}"#;

        let documents = parse_checklist_response(response).unwrap();
        let names: Vec<_> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}\n```"), "{\"a\":1}");
    }
}
