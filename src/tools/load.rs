//! Batch loading of tool files from a directory.

use super::descriptor::ToolDescriptor;
use super::normalize::{dedup_last_wins, normalize_entry};
use crate::error::{LabError, Result};
use serde_json::Value;
use std::path::Path;

/// Tools loaded from one directory, plus every per-file or per-entry error.
#[derive(Debug, Default)]
pub struct ToolLoadReport {
    pub tools: Vec<ToolDescriptor>,
    pub errors: Vec<LabError>,
}

impl ToolLoadReport {
    pub fn find(&self, tool_id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.tool_id == tool_id)
    }
}

/// Load and normalize every `*.json` file in `dir`, in file-name order.
///
/// The whole directory is one batch: a `tool_id` defined in two files
/// resolves to the later definition.
pub fn load_tools<P: AsRef<Path>>(dir: P) -> Result<ToolLoadReport> {
    let mut report = ToolLoadReport::default();
    let mut tools = Vec::new();

    for path in crate::context::json_files(dir.as_ref())? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let value = match crate::problems::read_json(&path) {
            Ok(v) => v,
            Err(reason) => {
                tracing::warn!(file = %file_name, %reason, "skipping tool file");
                report.errors.push(LabError::MalformedToolData {
                    source_name: file_name,
                    reason,
                });
                continue;
            }
        };

        let entries: Vec<(String, Value)> = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("{}[{}]", file_name, i), v))
                .collect(),
            other => vec![(file_name.clone(), other)],
        };

        for (source_name, entry) in entries {
            match normalize_entry(&entry, &source_name) {
                Ok(found) => tools.extend(found),
                Err(err) => {
                    tracing::warn!(source = %source_name, error = %err, "skipping tool entry");
                    report.errors.push(err);
                }
            }
        }
    }

    report.tools = dedup_last_wins(tools);
    Ok(report)
}

/// Pick `ids` out of `tools`, in the order the caller gave them.
///
/// Unknown ids are a user error; repeated ids are kept once.
pub fn select(tools: &[ToolDescriptor], ids: &[String]) -> Result<Vec<ToolDescriptor>> {
    let mut selected: Vec<ToolDescriptor> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if selected.iter().any(|t| t.tool_id == id) {
            continue;
        }
        let tool = tools.iter().find(|t| t.tool_id == id).ok_or_else(|| {
            LabError::UserError(format!(
                "tool '{}' not found.\n\nUse `promptlab tools` to list available tools.",
                id
            ))
        })?;
        selected.push(tool.clone());
    }
    Ok(selected)
}
