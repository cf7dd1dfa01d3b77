//! Shareable renderings of a result record.

use super::record::ResultRecord;
use crate::cost::display_cost;
use crate::error::{LabError, Result};
use std::fmt::Write;

/// Plain-text report: run header, metrics, then each solution.
pub fn export_text(record: &ResultRecord) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let metrics = record.metrics();
    let request = &record.request;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Result {}", record.result_id);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Created:     {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "Problem:     {} ({} / {}, level {})",
        request.problem.id, request.problem.domain, request.problem.subdomain, request.problem.level
    );
    let _ = writeln!(out, "Model:       {}", request.model_id);
    let _ = writeln!(out, "Temperature: {}", request.temperature);
    let _ = writeln!(
        out,
        "Tools:       {}",
        if request.tools.is_empty() {
            "(none)".to_string()
        } else {
            request.tool_ids().collect::<Vec<_>>().join(", ")
        }
    );
    let _ = writeln!(
        out,
        "Tokens:      {} in / {} out",
        record.usage.input_tokens, record.usage.output_tokens
    );
    let _ = writeln!(out, "Cost:        {}", display_cost(metrics.total_cost));
    let _ = writeln!(
        out,
        "Latency:     {} ms ({} attempt(s))",
        record.latency_ms, record.attempts
    );
    let _ = writeln!(
        out,
        "Parsed:      {}/{}{}",
        record.parse.parsed_count,
        record.parse.expected_count,
        if record.parse.partial { " (partial)" } else { "" }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Problem statement:");
    let _ = writeln!(out, "  {}", request.problem.text);

    for (i, solution) in record.parsed_solutions.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", i + 1, solution.title);
        if solution.uses_tool {
            let ids: Vec<_> = solution.referenced_tool_ids.iter().cloned().collect();
            let _ = writeln!(out, "   Tools: {}", ids.join(", "));
        } else {
            let _ = writeln!(out, "   Tools: none (AI only)");
        }
        if !solution.tags.is_empty() {
            let _ = writeln!(out, "   Tags:  {}", solution.tags.join(", "));
        }
        let _ = writeln!(out);
        for line in solution.body_text.lines() {
            let _ = writeln!(out, "   {}", line);
        }
    }

    if record.parsed_solutions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No solutions could be parsed. Raw output:");
        let _ = writeln!(out);
        out.push_str(&record.raw_output);
        out.push('\n');
    }

    out
}

/// The full record as pretty JSON.
pub fn export_json(record: &ResultRecord) -> Result<String> {
    serde_json::to_string_pretty(record)
        .map_err(|e| LabError::Internal(format!("failed to serialize result record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_record;

    #[test]
    fn test_export_text_lists_solutions() {
        let record = sample_record();
        let text = export_text(&record);

        assert!(text.contains(&record.result_id));
        assert!(text.contains("nutrition_l1_001"));
        assert!(text.contains("Parsed:      5/5"));
        for solution in &record.parsed_solutions {
            assert!(text.contains(&solution.title));
        }
        assert!(text.contains("Tools: none (AI only)"));
    }

    #[test]
    fn test_export_text_falls_back_to_raw_output() {
        let mut record = sample_record();
        record.parsed_solutions.clear();
        record.raw_output = "the model rambled".to_string();

        let text = export_text(&record);
        assert!(text.contains("No solutions could be parsed"));
        assert!(text.contains("the model rambled"));
    }

    #[test]
    fn test_export_json_parses_back() {
        let record = sample_record();
        let json = export_json(&record).unwrap();
        let parsed: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
