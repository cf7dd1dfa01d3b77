//! Deciding which catalog tools a solution references.

use super::parser::RawSolution;
use crate::tools::ToolDescriptor;
use regex::Regex;
use std::collections::BTreeSet;

/// Strategy for mapping a solution to the tool ids it uses.
pub trait ToolReferenceDetector: Send + Sync {
    fn name(&self) -> &str;

    /// Ids of tools in `catalog` referenced by `solution`.
    fn detect(&self, solution: &RawSolution, catalog: &[ToolDescriptor]) -> BTreeSet<String>;
}

/// Trust only the model's `tools_used` declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOnly;

/// `tools_used` declarations, plus display names mentioned as a whole phrase
/// in the title or body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOrMentioned;

impl ToolReferenceDetector for DeclaredOnly {
    fn name(&self) -> &str {
        "declared_only"
    }

    fn detect(&self, solution: &RawSolution, catalog: &[ToolDescriptor]) -> BTreeSet<String> {
        catalog
            .iter()
            .filter(|tool| is_declared(solution, tool))
            .map(|tool| tool.tool_id.clone())
            .collect()
    }
}

impl ToolReferenceDetector for DeclaredOrMentioned {
    fn name(&self) -> &str {
        "declared_or_mentioned"
    }

    fn detect(&self, solution: &RawSolution, catalog: &[ToolDescriptor]) -> BTreeSet<String> {
        catalog
            .iter()
            .filter(|tool| {
                is_declared(solution, tool)
                    || mentions(&solution.prompt, &tool.display_name)
                    || mentions(&solution.title, &tool.display_name)
            })
            .map(|tool| tool.tool_id.clone())
            .collect()
    }
}

fn is_declared(solution: &RawSolution, tool: &ToolDescriptor) -> bool {
    solution.tools_used.iter().any(|declared| {
        let declared = declared.trim();
        declared.eq_ignore_ascii_case(&tool.tool_id)
            || declared.to_lowercase() == tool.display_name.to_lowercase()
    })
}

/// Case-insensitive whole-phrase match: `name` must not be embedded in a longer word.
pub fn mentions(text: &str, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let pattern = format!(
        r"(?i)(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
        regex::escape(name)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            tracing::debug!(%name, error = %err, "unusable tool name pattern");
            false
        }
    }
}
