//! Problem statement ingestion.
//!
//! Problem files live in `data/problems/*.json`. Each file holds either a
//! single object or an array of objects:
//!
//! ```json
//! [
//!   {
//!     "problem_id": "nutrition_l1_001",
//!     "domain": "health",
//!     "subdomain": "nutrition",
//!     "level": 1,
//!     "problem_text": "I want to understand how different foods affect my energy"
//!   }
//! ]
//! ```
//!
//! All five fields are required; any extra fields are ignored. A bad entry or
//! a bad file is reported in the load report and never blocks the rest.

use crate::error::{LabError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Lowest maturity level.
pub const MIN_LEVEL: u8 = 1;

/// Highest maturity level.
pub const MAX_LEVEL: u8 = 5;

/// A problem the operator wants conversation starters for. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemStatement {
    pub id: String,
    pub domain: String,
    pub subdomain: String,
    pub level: u8,
    pub text: String,
}

/// On-disk problem shape.
#[derive(Deserialize)]
struct RawProblem {
    problem_id: String,
    domain: String,
    subdomain: String,
    level: i64,
    problem_text: String,
}

impl ProblemStatement {
    /// Parse one problem entry. `source_name` identifies it in errors.
    pub fn from_value(value: Value, source_name: &str) -> Result<Self> {
        let raw: RawProblem =
            serde_json::from_value(value).map_err(|e| LabError::MalformedProblemData {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;

        let level = u8::try_from(raw.level)
            .ok()
            .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l))
            .ok_or_else(|| LabError::MalformedProblemData {
                source_name: source_name.to_string(),
                reason: format!(
                    "level must be between {} and {} (found {})",
                    MIN_LEVEL, MAX_LEVEL, raw.level
                ),
            })?;

        let id = raw.problem_id.trim().to_string();
        if id.is_empty() {
            return Err(LabError::MalformedProblemData {
                source_name: source_name.to_string(),
                reason: "problem_id must not be empty".to_string(),
            });
        }

        Ok(Self {
            id,
            domain: raw.domain.trim().to_string(),
            subdomain: raw.subdomain.trim().to_string(),
            level,
            text: raw.problem_text.trim().to_string(),
        })
    }
}

/// Problems loaded from a directory, plus every per-file or per-entry error.
#[derive(Debug, Default)]
pub struct ProblemLoadReport {
    pub problems: Vec<ProblemStatement>,
    pub errors: Vec<LabError>,
}

impl ProblemLoadReport {
    pub fn find(&self, problem_id: &str) -> Option<&ProblemStatement> {
        self.problems.iter().find(|p| p.id == problem_id)
    }

    /// Look up a problem, failing with a user error naming the known ids.
    pub fn require(&self, problem_id: &str) -> Result<&ProblemStatement> {
        self.find(problem_id).ok_or_else(|| {
            LabError::UserError(format!(
                "problem '{}' not found.\n\nUse `promptlab problems` to list available problems.",
                problem_id
            ))
        })
    }
}

/// Load every `*.json` file in `dir`, in file-name order.
///
/// Only an unreadable directory is an error; bad files and entries are
/// collected in the report.
pub fn load_problems<P: AsRef<Path>>(dir: P) -> Result<ProblemLoadReport> {
    let mut report = ProblemLoadReport::default();

    for path in crate::context::json_files(dir.as_ref())? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let value = match read_json(&path) {
            Ok(v) => v,
            Err(reason) => {
                tracing::warn!(file = %file_name, %reason, "skipping problem file");
                report.errors.push(LabError::MalformedProblemData {
                    source_name: file_name,
                    reason,
                });
                continue;
            }
        };

        let entries = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("{}[{}]", file_name, i), v))
                .collect(),
            other => vec![(file_name.clone(), other)],
        };

        for (source_name, entry) in entries {
            match ProblemStatement::from_value(entry, &source_name) {
                Ok(problem) => report.problems.push(problem),
                Err(err) => report.errors.push(err),
            }
        }
    }

    Ok(report)
}

pub(crate) fn read_json(path: &Path) -> std::result::Result<Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("failed to read: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {}", e))
}
