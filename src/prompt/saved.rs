//! Named template pairs saved under `templates/saved_templates.json`.
//!
//! The file maps a name to `{"system": ..., "user": ...}`. Older files stored
//! a bare system prompt string per name; those load with an empty user
//! template, which resolves to the configured default user template. A bare
//! string was never rendered, so its braces are escaped and it reaches the
//! model verbatim.

use super::template::escape_braces;
use crate::config::Config;
use crate::error::{LabError, Result};
use crate::fs::atomic_write_file;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const TEMPLATES_FILE: &str = "saved_templates.json";

/// Name of the built-in pair taken from configuration.
pub const DEFAULT_TEMPLATE_NAME: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePair {
    pub system: String,
    #[serde(default)]
    pub user: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTemplate {
    Pair(TemplatePair),
    Legacy(String),
}

impl From<StoredTemplate> for TemplatePair {
    fn from(stored: StoredTemplate) -> Self {
        match stored {
            StoredTemplate::Pair(pair) => pair,
            StoredTemplate::Legacy(system) => TemplatePair {
                system: escape_braces(&system),
                user: String::new(),
            },
        }
    }
}

/// Load saved templates from `dir`. A missing file is an empty set.
pub fn load_templates(dir: &Path) -> Result<BTreeMap<String, TemplatePair>> {
    let path = dir.join(TEMPLATES_FILE);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| {
        LabError::UserError(format!(
            "failed to read templates file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let stored: BTreeMap<String, StoredTemplate> =
        serde_json::from_str(&content).map_err(|e| {
            LabError::UserError(format!(
                "failed to parse templates file '{}': {}",
                path.display(),
                e
            ))
        })?;

    Ok(stored.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Add or replace the template `name`, rewriting the file atomically.
pub fn save_template(dir: &Path, name: &str, system: &str, user: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LabError::UserError("template name must not be empty".to_string()));
    }
    if name == DEFAULT_TEMPLATE_NAME {
        return Err(LabError::UserError(format!(
            "'{}' is the built-in template; choose another name",
            DEFAULT_TEMPLATE_NAME
        )));
    }

    let mut templates = load_templates(dir)?;
    templates.insert(
        name.to_string(),
        TemplatePair {
            system: system.to_string(),
            user: user.to_string(),
        },
    );

    let json = serde_json::to_string_pretty(&templates)
        .map_err(|e| LabError::Internal(format!("failed to serialize templates: {}", e)))?;

    std::fs::create_dir_all(dir).map_err(|e| {
        LabError::UserError(format!(
            "failed to create templates directory '{}': {}",
            dir.display(),
            e
        ))
    })?;
    atomic_write_file(dir.join(TEMPLATES_FILE), &json)
}

/// Resolve a template pair by name. `None` and `"default"` give the configured pair.
pub fn resolve_template(dir: &Path, name: Option<&str>, config: &Config) -> Result<TemplatePair> {
    let default_pair = || TemplatePair {
        system: config.system_prompt.clone(),
        user: config.user_prompt.clone(),
    };

    let name = match name.map(str::trim) {
        None | Some(DEFAULT_TEMPLATE_NAME) => return Ok(default_pair()),
        Some(name) => name,
    };

    let mut pair = load_templates(dir)?.remove(name).ok_or_else(|| {
        LabError::UserError(format!(
            "template '{}' not found.\n\nUse `promptlab templates list` to see saved templates.",
            name
        ))
    })?;

    if pair.user.trim().is_empty() {
        pair.user = config.user_prompt.clone();
    }
    Ok(pair)
}
