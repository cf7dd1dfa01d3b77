//! Append-only run journal.
//!
//! Events are stored in NDJSON format (one JSON object per line) in
//! `<data>/events.ndjson`. Each event carries:
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`init`, `run`, `run_failed`, `template_saved`)
//! - `actor`: `user@HOST`
//! - `result_id`: the record produced, for successful runs
//! - `details`: freeform, action-specific object
//!
//! The journal is an audit trail, not the source of truth: result records
//! stand on their own.

use crate::context::LabContext;
use crate::error::{LabError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Data directory created
    Init,
    /// Generation run recorded
    Run,
    /// Generation run failed after assembly
    RunFailed,
    /// Named template saved
    TemplateSaved,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Run => write!(f, "run"),
            EventAction::RunFailed => write!(f, "run_failed"),
            EventAction::TemplateSaved => write!(f, "template_saved"),
        }
    }
}

/// An event record for the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
    pub details: Value,
}

impl Event {
    /// Create an event stamped now, attributed to the current user and host.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            result_id: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_result(mut self, result_id: impl Into<String>) -> Self {
        self.result_id = Some(result_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| LabError::Internal(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append `event` as one line to the journal, creating the file if needed.
pub fn append_event(ctx: &LabContext, event: &Event) -> Result<()> {
    let path = &ctx.events_path;
    let json_line = event.to_ndjson_line()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            LabError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LabError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        LabError::UserError(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        LabError::UserError(format!(
            "failed to sync events file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Append an event, logging instead of failing. For journal writes that
/// must not mask the outcome of the operation they describe.
pub fn record_event(ctx: &LabContext, event: &Event) {
    if let Err(err) = append_event(ctx, event) {
        tracing::warn!(action = %event.action, error = %err, "failed to append event");
    }
}

/// Read every event in the journal. Malformed lines are skipped.
pub fn read_events(ctx: &LabContext) -> Result<Vec<Event>> {
    if !ctx.events_path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&ctx.events_path).map_err(|e| {
        LabError::UserError(format!(
            "failed to read events file '{}': {}",
            ctx.events_path.display(),
            e
        ))
    })?;

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
