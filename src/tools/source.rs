//! Raw tool file shapes.
//!
//! Two shapes exist on disk:
//!
//! - **Simple**: one tool per object, keyed by `tool_id`.
//! - **Complex**: a `main_system` with a `sub_systems` mapping; each
//!   sub-system is a tool in its own right.
//!
//! Fields are held as raw JSON values so a malformed optional field degrades
//! to its default in [`super::normalize`] instead of failing the whole entry.

use crate::error::{LabError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A tool entry after shape detection.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSource {
    Simple(SimpleTool),
    Complex(ComplexTool),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimpleTool {
    pub tool_id: Value,
    #[serde(default)]
    pub display_name: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub integration_status: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub inputs: Value,
    #[serde(default)]
    pub tags: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplexTool {
    pub main_system: Value,
    pub sub_systems: Map<String, Value>,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub integration_status: Value,
    #[serde(default)]
    pub integration_score: Value,
    #[serde(default)]
    pub tags: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubSystem {
    #[serde(default)]
    pub system_name: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub integration_status: Value,
    #[serde(default)]
    pub inputs: Value,
    #[serde(default)]
    pub tags: Value,
}

impl ToolSource {
    /// Detect the shape of one entry.
    ///
    /// `main_system` together with `sub_systems` means complex; `tool_id`
    /// means simple; anything else is `MalformedToolData`.
    pub fn detect(value: &Value, source_name: &str) -> Result<Self> {
        let malformed = |reason: String| LabError::MalformedToolData {
            source_name: source_name.to_string(),
            reason,
        };

        let Some(obj) = value.as_object() else {
            return Err(malformed(format!(
                "expected a JSON object, found {}",
                json_kind(value)
            )));
        };

        if obj.contains_key("main_system") && obj.contains_key("sub_systems") {
            let complex: ComplexTool = serde_json::from_value(value.clone())
                .map_err(|e| malformed(format!("invalid complex tool: {}", e)))?;
            return Ok(ToolSource::Complex(complex));
        }

        if obj.contains_key("tool_id") {
            let simple: SimpleTool = serde_json::from_value(value.clone())
                .map_err(|e| malformed(format!("invalid simple tool: {}", e)))?;
            return Ok(ToolSource::Simple(simple));
        }

        Err(malformed(
            "entry has neither 'tool_id' nor 'main_system' with 'sub_systems'".to_string(),
        ))
    }
}

/// Parse one sub-system entry, treating a non-object as empty.
pub(crate) fn sub_system(value: &Value) -> SubSystem {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Trimmed, non-empty string content of `value`.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// String items of an array (or a lone string); anything else is empty.
pub(crate) fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        Value::String(_) => text(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_simple() {
        let value = json!({"tool_id": "oura", "display_name": "Oura Ring"});
        assert!(matches!(
            ToolSource::detect(&value, "a.json").unwrap(),
            ToolSource::Simple(_)
        ));
    }

    #[test]
    fn test_detect_complex() {
        let value = json!({"main_system": "Apple Health", "sub_systems": {"steps": {}}});
        match ToolSource::detect(&value, "a.json").unwrap() {
            ToolSource::Complex(c) => assert_eq!(c.sub_systems.len(), 1),
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_main_system_without_sub_systems_falls_back_to_tool_id() {
        let value = json!({"main_system": "X", "tool_id": "x"});
        assert!(matches!(
            ToolSource::detect(&value, "a.json").unwrap(),
            ToolSource::Simple(_)
        ));
    }

    #[test]
    fn test_detect_unknown_shape_names_source() {
        let err = ToolSource::detect(&json!({"name": "?"}), "weird.json[2]").unwrap_err();
        assert!(matches!(err, LabError::MalformedToolData { .. }));
        assert!(err.to_string().contains("weird.json[2]"));
    }

    #[test]
    fn test_detect_non_object() {
        let err = ToolSource::detect(&json!("just a string"), "a.json").unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_sub_systems_must_be_object() {
        let value = json!({"main_system": "X", "sub_systems": ["a", "b"]});
        assert!(ToolSource::detect(&value, "a.json").is_err());
    }

    #[test]
    fn test_lenient_helpers() {
        assert_eq!(text(&json!("  hi  ")), Some("hi".to_string()));
        assert_eq!(text(&json!("   ")), None);
        assert_eq!(text(&json!(null)), None);
        assert_eq!(string_list(&json!(["a", 3, null, " b "])), vec!["a", "3", "b"]);
        assert_eq!(string_list(&json!({"a": 1})), Vec::<String>::new());
        assert_eq!(number(&json!("8.5")), Some(8.5));
        assert_eq!(number(&json!(true)), None);
    }
}
