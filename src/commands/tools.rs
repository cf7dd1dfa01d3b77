//! Implementation of the `promptlab tools` command.

use super::inputs::warn_load_errors;
use crate::cli::ToolsArgs;
use promptlab::context::require_initialized;
use promptlab::error::Result;
use promptlab::prompt::render_tool_catalog;
use promptlab::tools::{ToolDescriptor, load_tools};
use std::path::Path;

pub fn cmd_tools(data_dir: Option<&Path>, args: ToolsArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let report = load_tools(&ctx.tools_dir)?;
    warn_load_errors(&report.errors);

    let shown: Vec<ToolDescriptor> = report
        .tools
        .iter()
        .filter(|t| args.domain.as_deref().is_none_or(|d| t.has_domain(d)))
        .cloned()
        .collect();

    if shown.is_empty() {
        println!("No tools found in {}", ctx.tools_dir.display());
        return Ok(());
    }

    if args.catalog {
        print!("{}", render_tool_catalog(&shown));
        return Ok(());
    }

    for tool in &shown {
        let parent = tool
            .parent_system
            .as_deref()
            .map(|p| format!("  (part of {})", p))
            .unwrap_or_default();
        println!(
            "{:<28} {:<28} {:<18} {}{}",
            tool.tool_id, tool.display_name, tool.category, tool.integration_status, parent
        );
    }
    println!();
    println!("{} of {} tools", shown.len(), report.tools.len());
    Ok(())
}
