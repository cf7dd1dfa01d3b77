//! Side-by-side comparison of two result records.

use super::record::ResultRecord;
use crate::cost::round_currency;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A request parameter that differs between the two runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterChange {
    pub name: String,
    pub left: String,
    pub right: String,
}

/// Differences between `left` and `right`. Deltas are `right - left`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordComparison {
    pub left_id: String,
    pub right_id: String,
    pub cost_delta: f64,
    pub token_delta: i64,
    pub latency_delta_ms: i64,
    pub solution_delta: i64,
    pub tool_solution_delta: i64,
    pub parameter_changes: Vec<ParameterChange>,
    pub tools_only_left: BTreeSet<String>,
    pub tools_common: BTreeSet<String>,
    pub tools_only_right: BTreeSet<String>,
    pub tag_frequencies_left: BTreeMap<String, usize>,
    pub tag_frequencies_right: BTreeMap<String, usize>,
}

/// Compare two records.
pub fn compare(left: &ResultRecord, right: &ResultRecord) -> RecordComparison {
    let (lm, rm) = (left.metrics(), right.metrics());
    let (lt, rt) = (left.referenced_tools(), right.referenced_tools());

    RecordComparison {
        left_id: left.result_id.clone(),
        right_id: right.result_id.clone(),
        cost_delta: round_currency(rm.total_cost - lm.total_cost),
        token_delta: rm.total_tokens as i64 - lm.total_tokens as i64,
        latency_delta_ms: rm.latency_ms as i64 - lm.latency_ms as i64,
        solution_delta: rm.solution_count as i64 - lm.solution_count as i64,
        tool_solution_delta: rm.tool_solution_count as i64 - lm.tool_solution_count as i64,
        parameter_changes: parameter_changes(left, right),
        tools_only_left: lt.difference(&rt).cloned().collect(),
        tools_common: lt.intersection(&rt).cloned().collect(),
        tools_only_right: rt.difference(&lt).cloned().collect(),
        tag_frequencies_left: tag_frequencies(left),
        tag_frequencies_right: tag_frequencies(right),
    }
}

/// How often each tag appears across a record's solutions.
pub fn tag_frequencies(record: &ResultRecord) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in record.parsed_solutions.iter().flat_map(|s| s.tags.iter()) {
        *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

fn parameter_changes(left: &ResultRecord, right: &ResultRecord) -> Vec<ParameterChange> {
    let (l, r) = (&left.request, &right.request);
    let fields = [
        ("problem_id", l.problem.id.clone(), r.problem.id.clone()),
        ("model_id", l.model_id.clone(), r.model_id.clone()),
        ("temperature", l.temperature.to_string(), r.temperature.to_string()),
        ("max_tokens", l.max_tokens.to_string(), r.max_tokens.to_string()),
        (
            "tool_solution_ratio",
            format!("{}-{}", l.tool_solution_ratio.min, l.tool_solution_ratio.max),
            format!("{}-{}", r.tool_solution_ratio.min, r.tool_solution_ratio.max),
        ),
        (
            "tools",
            l.tool_ids().collect::<Vec<_>>().join(","),
            r.tool_ids().collect::<Vec<_>>().join(","),
        ),
        (
            "system_prompt_template",
            summarize(&l.system_prompt_template),
            summarize(&r.system_prompt_template),
        ),
        (
            "user_prompt_template",
            summarize(&l.user_prompt_template),
            summarize(&r.user_prompt_template),
        ),
    ];

    fields
        .into_iter()
        .filter(|(_, a, b)| a != b)
        .map(|(name, left, right)| ParameterChange {
            name: name.to_string(),
            left,
            right,
        })
        .collect()
}

/// Templates are long; show length and opening words instead of the whole text.
fn summarize(template: &str) -> String {
    let head: String = template.chars().take(40).collect();
    let head = head.replace('\n', " ");
    if template.chars().count() > 40 {
        format!("{}... ({} chars)", head.trim_end(), template.chars().count())
    } else {
        head
    }
}
