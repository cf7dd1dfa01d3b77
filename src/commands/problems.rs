//! Implementation of the `promptlab problems` command.

use super::inputs::problem_report;
use crate::cli::ProblemsArgs;
use promptlab::context::require_initialized;
use promptlab::error::Result;
use promptlab::problems::ProblemStatement;
use std::path::Path;

pub fn cmd_problems(data_dir: Option<&Path>, args: ProblemsArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let report = problem_report(&ctx)?;

    let shown: Vec<&ProblemStatement> = report
        .problems
        .iter()
        .filter(|p| args.domain.as_deref().is_none_or(|d| p.domain.eq_ignore_ascii_case(d)))
        .filter(|p| args.level.is_none_or(|l| p.level == l))
        .collect();

    if shown.is_empty() {
        println!("No problems found in {}", ctx.problems_dir.display());
        return Ok(());
    }

    for problem in &shown {
        println!(
            "{:<24} {:<10} {:<16} L{}  {}",
            problem.id,
            problem.domain,
            problem.subdomain,
            problem.level,
            preview(&problem.text, 60)
        );
    }
    println!();
    println!("{} of {} problems", shown.len(), report.problems.len());
    Ok(())
}

/// First `max` characters of `text` on one line.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        format!("{}...", flat.chars().take(max).collect::<String>())
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short  text\nhere", 60), "short text here");
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }
}
