//! Implementation of the `promptlab templates` subcommands.

use crate::cli::TemplateSaveArgs;
use promptlab::context::require_initialized;
use promptlab::error::{LabError, Result};
use promptlab::events::{Event, EventAction, record_event};
use promptlab::prompt::{DEFAULT_TEMPLATE_NAME, check_templates, load_templates, save_template};
use serde_json::json;
use std::path::Path;

pub fn cmd_templates_list(data_dir: Option<&Path>) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let templates = load_templates(&ctx.templates_dir)?;

    println!("{:<20} (from {})", DEFAULT_TEMPLATE_NAME, ctx.config_path.display());
    for (name, pair) in &templates {
        let user = if pair.user.trim().is_empty() {
            "configured user prompt".to_string()
        } else {
            format!("{} chars", pair.user.chars().count())
        };
        println!(
            "{:<20} system {} chars, user {}",
            name,
            pair.system.chars().count(),
            user
        );
    }
    Ok(())
}

pub fn cmd_templates_save(data_dir: Option<&Path>, args: TemplateSaveArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let config = ctx.load_config()?;

    let system = read_template(&args.system_file)?;
    let user = match &args.user_file {
        Some(path) => read_template(path)?,
        None => String::new(),
    };

    // An empty user template falls back to the configured one at run time.
    let effective_user = if user.trim().is_empty() {
        config.user_prompt.as_str()
    } else {
        user.as_str()
    };
    check_templates(&system, effective_user)?;

    save_template(&ctx.templates_dir, &args.name, &system, &user)?;
    record_event(
        &ctx,
        &Event::new(EventAction::TemplateSaved).with_details(json!({ "name": args.name.trim() })),
    );

    println!("Saved template '{}'", args.name.trim());
    Ok(())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        LabError::UserError(format!(
            "failed to read template file '{}': {}",
            path.display(),
            e
        ))
    })
}
