//! Loading and overriding the inputs shared by `prompt` and `run`.

use crate::cli::GenerationArgs;
use promptlab::config::Config;
use promptlab::context::LabContext;
use promptlab::error::{LabError, Result};
use promptlab::problems::{ProblemLoadReport, load_problems};
use promptlab::prompt::{PromptConfig, resolve_template};
use promptlab::tools::{ToolDescriptor, load_tools, select};

/// Print load errors as warnings; the rest of the batch stays usable.
pub fn warn_load_errors(errors: &[LabError]) {
    for err in errors {
        eprintln!("Warning: {}", err);
    }
}

pub fn problem_report(ctx: &LabContext) -> Result<ProblemLoadReport> {
    let report = load_problems(&ctx.problems_dir)?;
    warn_load_errors(&report.errors);
    Ok(report)
}

/// The selected tools in the order given. No ids means an AI-only run.
pub fn selected_tools(ctx: &LabContext, ids: &[String]) -> Result<Vec<ToolDescriptor>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let report = load_tools(&ctx.tools_dir)?;
    warn_load_errors(&report.errors);
    select(&report.tools, ids)
}

/// Resolve the template pair and apply command-line overrides.
pub fn prompt_config(
    ctx: &LabContext,
    config: &Config,
    args: &GenerationArgs,
) -> Result<PromptConfig> {
    let pair = resolve_template(&ctx.templates_dir, args.template.as_deref(), config)?;
    let mut prompt_config = config.prompt_config(&pair.system, &pair.user);
    apply_overrides(&mut prompt_config, args);
    Ok(prompt_config)
}

pub fn apply_overrides(config: &mut PromptConfig, args: &GenerationArgs) {
    if let Some(model) = &args.model {
        config.model_id = model.trim().to_string();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(min) = args.min_tool_solutions {
        config.tool_solution_ratio.min = min;
    }
    if let Some(max) = args.max_tool_solutions {
        config.tool_solution_ratio.max = max;
    }
}
