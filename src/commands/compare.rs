//! Implementation of the `promptlab compare` command.

use crate::cli::CompareArgs;
use promptlab::context::require_initialized;
use promptlab::cost::display_cost;
use promptlab::error::{LabError, Result};
use promptlab::results::{DeclaredOrMentioned, RecordComparison, ResultStore, compare};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

pub fn cmd_compare(data_dir: Option<&Path>, args: CompareArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let store = ResultStore::new(&ctx.results_dir, Arc::new(DeclaredOrMentioned));

    let left = store.load(&args.left)?;
    let right = store.load(&args.right)?;
    let comparison = compare(&left, &right);

    if args.json {
        let json = serde_json::to_string_pretty(&comparison)
            .map_err(|e| LabError::Internal(format!("failed to serialize comparison: {}", e)))?;
        println!("{}", json);
    } else {
        print!("{}", render(&comparison));
    }
    Ok(())
}

fn signed_cost(delta: f64) -> String {
    if delta < 0.0 {
        format!("-{}", display_cost(-delta))
    } else {
        format!("+{}", display_cost(delta))
    }
}

fn join(ids: &BTreeSet<String>) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn top_tags(counts: &BTreeMap<String, usize>) -> String {
    let mut tags: Vec<_> = counts.iter().collect();
    tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let shown: Vec<String> = tags
        .into_iter()
        .take(8)
        .map(|(tag, n)| format!("{} x{}", tag, n))
        .collect();
    if shown.is_empty() {
        "-".to_string()
    } else {
        shown.join(", ")
    }
}

fn render(cmp: &RecordComparison) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "A: {}", cmp.left_id);
    let _ = writeln!(out, "B: {}", cmp.right_id);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(out, "Cost:            {}", signed_cost(cmp.cost_delta));
    let _ = writeln!(out, "Tokens:          {:+}", cmp.token_delta);
    let _ = writeln!(out, "Latency:         {:+} ms", cmp.latency_delta_ms);
    let _ = writeln!(out, "Solutions:       {:+}", cmp.solution_delta);
    let _ = writeln!(out, "Tool solutions:  {:+}", cmp.tool_solution_delta);
    let _ = writeln!(out);

    if cmp.parameter_changes.is_empty() {
        let _ = writeln!(out, "Parameters: identical");
    } else {
        let _ = writeln!(out, "Parameters:");
        for change in &cmp.parameter_changes {
            let _ = writeln!(out, "  {}: {} -> {}", change.name, change.left, change.right);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Tools referenced:");
    let _ = writeln!(out, "  only A:  {}", join(&cmp.tools_only_left));
    let _ = writeln!(out, "  both:    {}", join(&cmp.tools_common));
    let _ = writeln!(out, "  only B:  {}", join(&cmp.tools_only_right));
    let _ = writeln!(out);

    let _ = writeln!(out, "Tags:");
    let _ = writeln!(out, "  A: {}", top_tags(&cmp.tag_frequencies_left));
    let _ = writeln!(out, "  B: {}", top_tags(&cmp.tag_frequencies_right));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_cost() {
        assert_eq!(signed_cost(0.0025), "+$0.0025");
        assert_eq!(signed_cost(-0.01), "-$0.0100");
        assert_eq!(signed_cost(0.0), "+$0.0000");
    }

    #[test]
    fn test_top_tags_orders_by_count_then_name() {
        let counts = BTreeMap::from([
            ("sleep".to_string(), 1),
            ("beginner".to_string(), 3),
            ("diet".to_string(), 1),
        ]);
        assert_eq!(top_tags(&counts), "beginner x3, diet x1, sleep x1");
        assert_eq!(top_tags(&BTreeMap::new()), "-");
    }
}
