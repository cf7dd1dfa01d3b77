//! Prompt assembly: problem + tools + templates into a [`GenerationRequest`].

use super::catalog::render_tool_catalog;
use super::template::{TemplateVars, render_template, require_placeholders};
use crate::error::{LabError, Result};
use crate::problems::ProblemStatement;
use crate::tools::ToolDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholders every user template must contain.
pub const REQUIRED_USER_PLACEHOLDERS: &[&str] = &["problem", "tools"];

/// Every placeholder a template may use.
pub const PLACEHOLDERS: &[&str] = &[
    "problem",
    "problem_id",
    "domain",
    "subdomain",
    "level",
    "tools",
    "tool_count",
    "solution_count",
    "min_tool_solutions",
    "max_tool_solutions",
];

/// How many of the requested solutions should use tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSolutionRatio {
    pub min: u32,
    pub max: u32,
}

impl Default for ToolSolutionRatio {
    fn default() -> Self {
        Self { min: 3, max: 4 }
    }
}

/// Parameters for one assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptConfig {
    pub system_prompt_template: String,
    pub user_prompt_template: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub model_id: String,
    pub tool_solution_ratio: ToolSolutionRatio,
    pub expected_solutions: u32,
}

/// A fully rendered request. Built fresh per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub problem: ProblemStatement,
    pub tools: Vec<ToolDescriptor>,
    pub system_prompt_template: String,
    pub user_prompt_template: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub model_id: String,
    pub tool_solution_ratio: ToolSolutionRatio,
    pub expected_solutions: u32,
}

impl GenerationRequest {
    pub fn tool_ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.tool_id.as_str())
    }
}

/// Assemble the request for `problem` with `tools`.
///
/// Parameters are validated first (`InvalidRequest`), then both templates
/// are rendered (`TemplateRender`). The result is a pure function of the
/// inputs.
pub fn assemble(
    problem: &ProblemStatement,
    tools: &[ToolDescriptor],
    config: &PromptConfig,
) -> Result<GenerationRequest> {
    validate(tools, config)?;

    require_placeholders(&config.user_prompt_template, REQUIRED_USER_PLACEHOLDERS)?;

    let vars = variables(problem, tools, config);
    let system_prompt = render_template(&config.system_prompt_template, &vars)?;
    let user_prompt = render_template(&config.user_prompt_template, &vars)?;

    Ok(GenerationRequest {
        problem: problem.clone(),
        tools: tools.to_vec(),
        system_prompt_template: config.system_prompt_template.clone(),
        user_prompt_template: config.user_prompt_template.clone(),
        system_prompt,
        user_prompt,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        model_id: config.model_id.clone(),
        tool_solution_ratio: config.tool_solution_ratio,
        expected_solutions: config.expected_solutions,
    })
}

/// Check a template pair without a problem: braces, known placeholders and
/// the required user placeholders.
pub fn check_templates(system: &str, user: &str) -> Result<()> {
    require_placeholders(user, REQUIRED_USER_PLACEHOLDERS)?;
    let blank: TemplateVars = PLACEHOLDERS
        .iter()
        .map(|name| (name.to_string(), String::new()))
        .collect();
    render_template(system, &blank)?;
    render_template(user, &blank)?;
    Ok(())
}

fn validate(tools: &[ToolDescriptor], config: &PromptConfig) -> Result<()> {
    let invalid = |msg: String| Err(LabError::InvalidRequest(msg));

    if !config.temperature.is_finite() || !(0.0..=1.0).contains(&config.temperature) {
        return invalid(format!(
            "temperature must be between 0.0 and 1.0 (got {})",
            config.temperature
        ));
    }
    if config.max_tokens == 0 {
        return invalid("max_tokens must be greater than 0".to_string());
    }
    if config.model_id.trim().is_empty() {
        return invalid("model_id must not be empty".to_string());
    }
    if config.expected_solutions == 0 {
        return invalid("expected_solutions must be greater than 0".to_string());
    }

    let ratio = config.tool_solution_ratio;
    if ratio.min > ratio.max || ratio.max > config.expected_solutions {
        return invalid(format!(
            "tool solution ratio {}-{} must satisfy min <= max <= {}",
            ratio.min, ratio.max, config.expected_solutions
        ));
    }

    let mut seen = HashSet::new();
    for tool in tools {
        if !seen.insert(tool.tool_id.as_str()) {
            return invalid(format!("duplicate tool id '{}'", tool.tool_id));
        }
    }

    Ok(())
}

fn variables(
    problem: &ProblemStatement,
    tools: &[ToolDescriptor],
    config: &PromptConfig,
) -> TemplateVars {
    let ratio = config.tool_solution_ratio;
    super::template::vars([
        ("problem", problem.text.clone()),
        ("problem_id", problem.id.clone()),
        ("domain", problem.domain.clone()),
        ("subdomain", problem.subdomain.clone()),
        ("level", problem.level.to_string()),
        ("tools", render_tool_catalog(tools)),
        ("tool_count", tools.len().to_string()),
        ("solution_count", config.expected_solutions.to_string()),
        ("min_tool_solutions", ratio.min.to_string()),
        ("max_tool_solutions", ratio.max.to_string()),
    ])
}
