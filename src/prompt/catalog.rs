//! Markdown tool catalog substituted for `{tools}`.

use crate::tools::ToolDescriptor;
use std::fmt::Write;

/// Render `tools` as a markdown catalog, in the order given.
///
/// Output is a pure function of the descriptors.
pub fn render_tool_catalog(tools: &[ToolDescriptor]) -> String {
    if tools.is_empty() {
        return "(no tools selected; every solution should be AI-only)\n".to_string();
    }

    let mut out = String::new();
    for tool in tools {
        render_tool(&mut out, tool);
        out.push('\n');
    }
    out
}

fn render_tool(out: &mut String, tool: &ToolDescriptor) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "### {}", tool.display_name);
    let _ = writeln!(out, "- **ID**: `{}`", tool.tool_id);
    let _ = writeln!(out, "- **Category**: {}", or_unknown(&tool.category));
    let _ = writeln!(
        out,
        "- **Integration**: {}",
        or_unknown(&tool.integration_status)
    );
    if let Some(score) = tool.integration_score {
        let _ = writeln!(out, "- **Integration Score**: {}/10", score);
    }
    if let Some(description) = &tool.description {
        let _ = writeln!(out, "- **Description**: {}", description);
    }

    let with_cases: Vec<_> = tool
        .inputs
        .values()
        .filter(|input| !input.use_cases.is_empty())
        .collect();
    if !with_cases.is_empty() {
        out.push_str("- **What you can get from it**:\n");
        for input in with_cases {
            let _ = writeln!(out, "  - {}", input.use_cases.join(", "));
        }
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "Unknown" } else { value }
}
