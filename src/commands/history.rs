//! Implementation of the `promptlab history` command.

use crate::cli::HistoryArgs;
use promptlab::context::require_initialized;
use promptlab::cost::display_cost;
use promptlab::error::Result;
use promptlab::results::{DeclaredOrMentioned, RecordFilter, ResultRecord, ResultStore};
use std::path::Path;
use std::sync::Arc;

pub fn cmd_history(data_dir: Option<&Path>, args: HistoryArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let store = ResultStore::new(&ctx.results_dir, Arc::new(DeclaredOrMentioned));

    let filter = RecordFilter {
        problem_id: args.problem,
        tool_ids: args.tools,
        model_id: args.model,
        limit: args.limit,
    };
    let records = store.list_records(&filter)?;

    if records.is_empty() {
        println!("No results recorded.");
        return Ok(());
    }

    for record in &records {
        println!("{}", history_line(record));
    }
    Ok(())
}

fn history_line(record: &ResultRecord) -> String {
    let metrics = record.metrics();
    format!(
        "{}  {}  {:<24} {:<28} {}/{} ({} tool)  {:>8}{}",
        record.result_id,
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.problem_id(),
        record.request.model_id,
        record.parse.parsed_count,
        record.parse.expected_count,
        metrics.tool_solution_count,
        display_cost(metrics.total_cost),
        if record.parse.partial { "  partial" } else { "" }
    )
}
