//! Implementation of the `promptlab prompt` command.
//!
//! Assembles exactly what `run` would send and prints it. Nothing is sent
//! and no credential is needed.

use super::inputs::{problem_report, prompt_config, selected_tools};
use crate::cli::PromptArgs;
use promptlab::context::require_initialized;
use promptlab::error::Result;
use promptlab::prompt::assemble;
use std::path::Path;

pub fn cmd_prompt(data_dir: Option<&Path>, args: PromptArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let config = ctx.load_config()?;

    let problems = problem_report(&ctx)?;
    let problem = problems.require(&args.problem)?;
    let tools = selected_tools(&ctx, &args.generation.tools)?;
    let prompt_config = prompt_config(&ctx, &config, &args.generation)?;

    let request = assemble(problem, &tools, &prompt_config)?;

    let rule = "=".repeat(80);
    println!("{}", rule);
    println!(
        "Model: {}  temperature {}  max tokens {}  tool solutions {}-{} of {}",
        request.model_id,
        request.temperature,
        request.max_tokens,
        request.tool_solution_ratio.min,
        request.tool_solution_ratio.max,
        request.expected_solutions
    );
    if config.pricing_table().get(&request.model_id).is_none() {
        eprintln!(
            "Warning: no pricing configured for model '{}'; `run` will reject it",
            request.model_id
        );
    }
    println!("{}", rule);
    println!();
    println!("--- system ---");
    println!("{}", request.system_prompt);
    println!();
    println!("--- user ---");
    println!("{}", request.user_prompt);
    Ok(())
}
