//! Implementation of the `promptlab init` command.
//!
//! Creates the data directory layout and writes a default `promptlab.yaml`.
//! Idempotent: an existing configuration and existing data are never touched.

use promptlab::config::Config;
use promptlab::context::LabContext;
use promptlab::error::Result;
use promptlab::events::{Event, EventAction, record_event};
use promptlab::fs::atomic_write_file;
use serde_json::json;
use std::path::Path;

/// Execute the `promptlab init` command.
pub fn cmd_init(data_dir: Option<&Path>) -> Result<()> {
    let ctx = LabContext::resolve(data_dir)?;
    let config_created = initialize(&ctx)?;

    println!("Initialized promptlab data directory: {}", ctx.data_dir.display());
    println!();
    println!("  problems/   add problem statement files (*.json)");
    println!("  tools/      add tool descriptor files (*.json)");
    println!("  results/    recorded runs");
    println!("  templates/  saved prompt templates");
    if config_created {
        println!();
        println!("Wrote default configuration to {}", ctx.config_path.display());
    }
    Ok(())
}

/// Create the layout; returns whether a new configuration file was written.
fn initialize(ctx: &LabContext) -> Result<bool> {
    ctx.ensure_layout()?;

    let config_created = !ctx.config_path.exists();
    if config_created {
        atomic_write_file(&ctx.config_path, &Config::default().to_yaml()?)?;
    }

    record_event(
        ctx,
        &Event::new(EventAction::Init).with_details(json!({
            "data_dir": ctx.data_dir.display().to_string(),
            "config_created": config_created,
        })),
    );

    Ok(config_created)
}
