//! Conversion of raw tool shapes into [`ToolDescriptor`]s.

use super::descriptor::{ToolDescriptor, ToolInput, ToolTags};
use super::source::{ComplexTool, SimpleTool, ToolSource, number, string_list, sub_system, text};
use crate::error::{LabError, Result};
use serde_json::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Normalize a raw tool document: one entry object or an array of them.
///
/// Fails with `MalformedToolData` on the first entry whose shape is unknown.
/// Duplicate ids are resolved with [`dedup_last_wins`].
pub fn normalize(raw: &Value, source_name: &str) -> Result<Vec<ToolDescriptor>> {
    let mut tools = Vec::new();
    match raw {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                tools.extend(normalize_entry(item, &format!("{}[{}]", source_name, i))?);
            }
        }
        other => tools.extend(normalize_entry(other, source_name)?),
    }
    Ok(dedup_last_wins(tools))
}

/// Normalize a single entry. A complex entry yields one descriptor per sub-system.
pub fn normalize_entry(value: &Value, source_name: &str) -> Result<Vec<ToolDescriptor>> {
    Ok(match ToolSource::detect(value, source_name)? {
        ToolSource::Simple(simple) => vec![from_simple(simple, source_name)?],
        ToolSource::Complex(complex) => from_complex(complex),
    })
}

/// Keep one descriptor per `tool_id`: the last one seen, at the first-seen position.
pub fn dedup_last_wins(tools: Vec<ToolDescriptor>) -> Vec<ToolDescriptor> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<ToolDescriptor> = Vec::with_capacity(tools.len());

    for tool in tools {
        match positions.get(&tool.tool_id) {
            Some(&idx) => {
                if splits_different_sources(&out[idx], &tool) {
                    tracing::warn!(
                        tool_id = %tool.tool_id,
                        replaced = out[idx].parent_system.as_deref().unwrap_or("-"),
                        by = tool.parent_system.as_deref().unwrap_or("-"),
                        "tool id defined by two different sources, later entry wins"
                    );
                } else {
                    tracing::debug!(tool_id = %tool.tool_id, "duplicate tool id, later entry wins");
                }
                out[idx] = tool;
            }
            None => {
                positions.insert(tool.tool_id.clone(), out.len());
                out.push(tool);
            }
        }
    }

    out
}

/// Two descriptors with one id that come from different parent systems,
/// e.g. a `sleep` sub-system in both an Oura and an Apple Health file.
fn splits_different_sources(kept: &ToolDescriptor, incoming: &ToolDescriptor) -> bool {
    kept.parent_system != incoming.parent_system
}

/// Lowercase slug: alphanumerics kept, every other run collapsed to `_`.
pub fn slugify(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    let mut pending_sep = false;
    for ch in key.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

fn from_simple(simple: SimpleTool, source_name: &str) -> Result<ToolDescriptor> {
    let tool_id = text(&simple.tool_id).ok_or_else(|| LabError::MalformedToolData {
        source_name: source_name.to_string(),
        reason: "'tool_id' must be a non-empty string".to_string(),
    })?;
    Ok(ToolDescriptor {
        display_name: text(&simple.display_name).unwrap_or_else(|| tool_id.clone()),
        category: text(&simple.category).unwrap_or_default(),
        integration_status: text(&simple.integration_status).unwrap_or_default(),
        description: text(&simple.description),
        inputs: inputs(&simple.inputs),
        tags: tags(&simple.tags),
        integration_score: None,
        parent_system: None,
        tool_id,
    })
}

fn from_complex(complex: ComplexTool) -> Vec<ToolDescriptor> {
    let parent = text(&complex.main_system);
    let parent_category = text(&complex.category).unwrap_or_default();
    let parent_status = text(&complex.integration_status).unwrap_or_default();
    let parent_tags = tags(&complex.tags);
    let score = number(&complex.integration_score);

    complex
        .sub_systems
        .iter()
        .map(|(key, raw)| {
            let sub = sub_system(raw);
            let mut sub_tags = tags(&sub.tags);
            sub_tags.data_types.extend(parent_tags.data_types.iter().cloned());
            sub_tags.domains.extend(parent_tags.domains.iter().cloned());

            let tool_id = match slugify(key) {
                s if s.is_empty() => key.clone(),
                s => s,
            };

            ToolDescriptor {
                tool_id,
                display_name: text(&sub.system_name).unwrap_or_else(|| key.clone()),
                category: text(&sub.category).unwrap_or_else(|| parent_category.clone()),
                integration_status: text(&sub.integration_status)
                    .unwrap_or_else(|| parent_status.clone()),
                description: text(&sub.description),
                inputs: inputs(&sub.inputs),
                tags: sub_tags,
                integration_score: score,
                parent_system: parent.clone(),
            }
        })
        .collect()
}

fn inputs(value: &Value) -> IndexMap<String, ToolInput> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };

    map.iter()
        .map(|(name, raw)| {
            let mut use_cases = string_list(&raw["use_cases"]);
            if use_cases.is_empty() {
                use_cases = attribute_capabilities(&raw["attributes"]);
            }
            let input = ToolInput {
                data_type: text(&raw["data_type"]).unwrap_or_default(),
                use_cases,
            };
            (name.clone(), input)
        })
        .collect()
}

/// String-valued attributes with plain (underscore-free) keys read as capabilities.
fn attribute_capabilities(value: &Value) -> Vec<String> {
    let Some(attrs) = value.as_object() else {
        return Vec::new();
    };
    attrs
        .iter()
        .filter(|(key, _)| !key.contains('_'))
        .filter_map(|(_, v)| match v {
            Value::String(_) => text(v),
            _ => None,
        })
        .collect()
}

fn tags(value: &Value) -> ToolTags {
    ToolTags {
        data_types: string_list(&value["data_types"]).into_iter().collect(),
        domains: string_list(&value["domains"]).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complex_source() -> Value {
        json!({
            "main_system": "Apple Health",
            "category": "health_platform",
            "integration_status": "export_only",
            "integration_score": 7,
            "tags": {"domains": ["health"]},
            "sub_systems": {
                "Sleep Tracking": {
                    "system_name": "Sleep Analysis",
                    "description": "Nightly sleep stages",
                    "inputs": {
                        "sleep_stages": {
                            "data_type": "time_series",
                            "attributes": {
                                "deep": "Deep sleep minutes",
                                "rem": "REM duration",
                                "raw_value": "skipped: underscore key",
                                "count": 4
                            }
                        }
                    }
                },
                "steps": {
                    "category": "activity",
                    "tags": {"data_types": ["counts"]},
                    "inputs": {"daily_steps": {"use_cases": ["Track activity trends"]}}
                },
                "heart-rate": "not an object"
            }
        })
    }

    #[test]
    fn test_complex_yields_one_descriptor_per_sub_system() {
        let source = complex_source();
        let tools = normalize(&source, "health.json").unwrap();
        assert_eq!(tools.len(), source["sub_systems"].as_object().unwrap().len());
    }

    #[test]
    fn test_complex_inherits_parent_fields() {
        let tools = normalize(&complex_source(), "health.json").unwrap();
        let sleep = tools.iter().find(|t| t.tool_id == "sleep_tracking").unwrap();

        assert_eq!(sleep.display_name, "Sleep Analysis");
        assert_eq!(sleep.category, "health_platform");
        assert_eq!(sleep.integration_status, "export_only");
        assert_eq!(sleep.integration_score, Some(7.0));
        assert_eq!(sleep.parent_system.as_deref(), Some("Apple Health"));
        assert_eq!(sleep.description.as_deref(), Some("Nightly sleep stages"));
        assert!(sleep.has_domain("health"));

        let steps = tools.iter().find(|t| t.tool_id == "steps").unwrap();
        assert_eq!(steps.display_name, "steps");
        assert_eq!(steps.category, "activity");
        assert!(steps.tags.data_types.contains("counts"));
        assert!(steps.tags.domains.contains("health"));
    }

    #[test]
    fn test_attributes_become_use_cases() {
        let tools = normalize(&complex_source(), "health.json").unwrap();
        let sleep = tools.iter().find(|t| t.tool_id == "sleep_tracking").unwrap();
        let input = &sleep.inputs["sleep_stages"];

        assert_eq!(input.data_type, "time_series");
        assert_eq!(input.use_cases, vec!["Deep sleep minutes", "REM duration"]);
    }

    #[test]
    fn test_non_object_sub_system_degrades_to_defaults() {
        let tools = normalize(&complex_source(), "health.json").unwrap();
        let hr = tools.iter().find(|t| t.tool_id == "heart_rate").unwrap();
        assert_eq!(hr.display_name, "heart-rate");
        assert!(hr.inputs.is_empty());
    }

    #[test]
    fn test_simple_passthrough_with_coercion() {
        let raw = json!({
            "tool_id": "  notion ",
            "category": "productivity",
            "tags": "not an object",
            "inputs": {
                "pages": {"data_type": "text", "use_cases": ["Meal plans", "  "]},
                "broken": 5
            }
        });
        let tools = normalize(&raw, "notion.json").unwrap();
        assert_eq!(tools.len(), 1);

        let tool = &tools[0];
        assert_eq!(tool.tool_id, "notion");
        assert_eq!(tool.display_name, "notion");
        assert_eq!(tool.integration_status, "");
        assert!(tool.tags.domains.is_empty());
        assert_eq!(tool.inputs["pages"].use_cases, vec!["Meal plans"]);
        assert!(tool.inputs["broken"].use_cases.is_empty());
    }

    #[test]
    fn test_duplicate_ids_last_write_wins_at_first_position() {
        let raw = json!([
            {"tool_id": "a", "display_name": "First A"},
            {"tool_id": "b", "display_name": "B"},
            {"tool_id": "a", "display_name": "Second A"}
        ]);
        let tools = normalize(&raw, "dups.json").unwrap();

        let names: Vec<_> = tools.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, vec!["Second A", "B"]);
    }

    #[test]
    fn test_unknown_entry_fails_with_position() {
        let raw = json!([{"tool_id": "ok"}, {"title": "nope"}]);
        let err = normalize(&raw, "mixed.json").unwrap_err();
        assert!(matches!(err, LabError::MalformedToolData { .. }));
        assert!(err.to_string().contains("mixed.json[1]"));
    }

    #[test]
    fn test_blank_tool_id_is_malformed() {
        let err = normalize(&json!({"tool_id": "  "}), "blank.json").unwrap_err();
        assert!(err.to_string().contains("tool_id"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sleep Tracking"), "sleep_tracking");
        assert_eq!(slugify("  heart--rate (bpm) "), "heart_rate_bpm");
        assert_eq!(slugify("already_slug"), "already_slug");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_sub_systems_and_inputs_keep_file_order() {
        let raw: Value = serde_json::from_str(
            r#"{
                "main_system": "Apple Health",
                "sub_systems": {
                    "workouts": {
                        "inputs": {
                            "sessions": {"use_cases": ["Log training"]},
                            "calories": {"use_cases": ["Estimate burn"]}
                        }
                    },
                    "activity": {}
                }
            }"#,
        )
        .unwrap();

        let tools = normalize(&raw, "apple.json").unwrap();

        let ids: Vec<_> = tools.iter().map(|t| t.tool_id.as_str()).collect();
        assert_eq!(ids, vec!["workouts", "activity"]);
        let inputs: Vec<_> = tools[0].inputs.keys().map(String::as_str).collect();
        assert_eq!(inputs, vec!["sessions", "calories"]);
        let cases: Vec<_> = tools[0].use_cases().collect();
        assert_eq!(cases, vec!["Log training", "Estimate burn"]);
    }

    #[test]
    fn test_same_sub_system_in_two_sources_later_wins() {
        let oura = json!({"main_system": "Oura", "sub_systems": {"sleep": {"system_name": "Oura Sleep"}}});
        let apple = json!({"main_system": "Apple Health", "sub_systems": {"sleep": {}}});

        let mut tools = normalize_entry(&oura, "oura.json").unwrap();
        tools.extend(normalize_entry(&apple, "apple.json").unwrap());
        assert!(splits_different_sources(&tools[0], &tools[1]));
        assert!(!splits_different_sources(&tools[0], &tools[0]));

        let tools = dedup_last_wins(tools);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].parent_system.as_deref(), Some("Apple Health"));
    }
}
