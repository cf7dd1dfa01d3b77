//! Result record types.

use super::parser::{ParseSummary, parse_solutions};
use super::references::ToolReferenceDetector;
use crate::cost::CostEstimate;
use crate::generation::UsageRecord;
use crate::prompt::GenerationRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One generated conversation starter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub title: String,
    pub uses_tool: bool,
    pub referenced_tool_ids: BTreeSet<String>,
    pub body_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Call statistics reported by the generation adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub latency_ms: u64,
    pub attempts: u32,
}

/// Everything about one run. Written once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub result_id: String,
    pub timestamp: DateTime<Utc>,
    pub request: GenerationRequest,
    pub raw_output: String,
    pub parsed_solutions: Vec<Solution>,
    pub parse: ParseSummary,
    pub usage: UsageRecord,
    pub cost: CostEstimate,
    pub latency_ms: u64,
    pub attempts: u32,
}

/// Headline numbers of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    pub total_tokens: u64,
    pub total_cost: f64,
    pub latency_ms: u64,
    pub solution_count: usize,
    pub tool_solution_count: usize,
}

impl ResultRecord {
    /// Build a record with a fresh id and timestamp, parsing `raw_output`.
    pub fn build(
        request: GenerationRequest,
        raw_output: String,
        usage: UsageRecord,
        cost: CostEstimate,
        call: CallStats,
        detector: &dyn ToolReferenceDetector,
    ) -> Self {
        let parsed = parse_solutions(&raw_output, request.expected_solutions);
        let parsed_solutions = parsed
            .solutions
            .iter()
            .map(|raw| {
                let referenced_tool_ids = detector.detect(raw, &request.tools);
                Solution {
                    title: raw.title.clone(),
                    uses_tool: !referenced_tool_ids.is_empty(),
                    referenced_tool_ids,
                    body_text: raw.prompt.clone(),
                    tags: raw.tags.clone(),
                }
            })
            .collect();

        Self {
            result_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            request,
            raw_output,
            parsed_solutions,
            parse: parsed.summary,
            usage,
            cost,
            latency_ms: call.latency_ms,
            attempts: call.attempts,
        }
    }

    pub fn problem_id(&self) -> &str {
        &self.request.problem.id
    }

    /// Union of tools referenced by any solution.
    pub fn referenced_tools(&self) -> BTreeSet<String> {
        self.parsed_solutions
            .iter()
            .flat_map(|s| s.referenced_tool_ids.iter().cloned())
            .collect()
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            total_tokens: self.usage.total_tokens(),
            total_cost: self.cost.total_cost,
            latency_ms: self.latency_ms,
            solution_count: self.parsed_solutions.len(),
            tool_solution_count: self.parsed_solutions.iter().filter(|s| s.uses_tool).count(),
        }
    }
}
