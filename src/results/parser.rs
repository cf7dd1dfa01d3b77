//! Lenient extraction of solution blocks from model output.
//!
//! The model is asked for `{"solutions": [{...}, ...]}` but may wrap it in a
//! code fence, add prose, return fewer or more blocks, or be cut off by the
//! token limit. The parser scans the `solutions` array (or, failing that, the
//! first array, or the whole text) for balanced top-level objects and keeps
//! every one that parses and has a title and a prompt. It never fails.

use crate::tools::source::string_list;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How well the output matched the requested shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub parsed_count: u32,
    pub expected_count: u32,
    /// Blocks that were found but were truncated, invalid JSON, or lacked a title/prompt.
    pub skipped_blocks: u32,
    /// Set when anything was skipped or fewer than `expected_count` blocks parsed.
    pub partial: bool,
}

/// A solution block as the model wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSolution {
    pub title: String,
    pub prompt: String,
    pub tools_used: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOutput {
    pub solutions: Vec<RawSolution>,
    pub summary: ParseSummary,
}

/// Extract solutions from `raw`, reporting against `expected` blocks.
pub fn parse_solutions(raw: &str, expected: u32) -> ParsedOutput {
    let region = solutions_region(raw);
    let scan = scan_objects(region);

    let mut solutions = Vec::new();
    let mut skipped = scan.truncated as u32;
    for block in scan.objects {
        match solution_from_block(block) {
            Some(solution) => solutions.push(solution),
            None => skipped += 1,
        }
    }

    let parsed_count = solutions.len() as u32;
    if skipped > 0 || parsed_count < expected {
        tracing::warn!(
            parsed = parsed_count,
            expected,
            skipped,
            "model output only partially parsed"
        );
    }

    ParsedOutput {
        solutions,
        summary: ParseSummary {
            parsed_count,
            expected_count: expected,
            skipped_blocks: skipped,
            partial: skipped > 0 || parsed_count < expected,
        },
    }
}

/// Text starting just inside the solutions array, or the whole input.
fn solutions_region(raw: &str) -> &str {
    let search_from = raw.find("\"solutions\"").unwrap_or(0);
    match raw[search_from..].find('[') {
        Some(offset) => &raw[search_from + offset + 1..],
        None => raw,
    }
}

struct ObjectScan<'a> {
    objects: Vec<&'a str>,
    /// An object was opened but never closed.
    truncated: bool,
}

/// Collect balanced top-level `{...}` slices, stopping at the closing `]`.
fn scan_objects(text: &str) -> ObjectScan<'_> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&text[start..=i]);
                }
            }
            ']' if depth == 0 => break,
            _ => {}
        }
    }

    ObjectScan {
        objects,
        truncated: depth > 0,
    }
}

fn solution_from_block(block: &str) -> Option<RawSolution> {
    let value: Value = serde_json::from_str(block).ok()?;
    let title = value.get("title")?.as_str()?.trim().to_string();
    let prompt = value.get("prompt")?.as_str()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    Some(RawSolution {
        title,
        prompt,
        tools_used: value.get("tools_used").map(string_list).unwrap_or_default(),
        tags: value.get("tags").map(string_list).unwrap_or_default(),
    })
}
