//! Command implementations for promptlab.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command resolves its own data directory from the
//! global `--data-dir` flag.

mod compare;
mod export;
mod history;
mod init;
mod inputs;
mod problems;
mod prompt;
mod run;
mod show;
mod templates;
mod tools;

use crate::cli::{Cli, Command, TemplatesAction, TemplatesCommand};
use promptlab::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.as_deref();
    match cli.command {
        Command::Init => init::cmd_init(data_dir),
        Command::Problems(args) => problems::cmd_problems(data_dir, args),
        Command::Tools(args) => tools::cmd_tools(data_dir, args),
        Command::Prompt(args) => prompt::cmd_prompt(data_dir, args),
        Command::Run(args) => run::cmd_run(data_dir, args),
        Command::History(args) => history::cmd_history(data_dir, args),
        Command::Show(args) => show::cmd_show(data_dir, args),
        Command::Compare(args) => compare::cmd_compare(data_dir, args),
        Command::Export(args) => export::cmd_export(data_dir, args),
        Command::Templates(cmd) => dispatch_templates(data_dir, cmd),
    }
}

/// Dispatch template subcommands.
fn dispatch_templates(data_dir: Option<&Path>, cmd: TemplatesCommand) -> Result<()> {
    match cmd.action {
        TemplatesAction::List => templates::cmd_templates_list(data_dir),
        TemplatesAction::Save(args) => templates::cmd_templates_save(data_dir, args),
    }
}
