//! CLI argument parsing for promptlab.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// promptlab: generate, cost and compare AI conversation starters.
///
/// Each run pairs a problem statement with a selection of tools, asks the
/// model for a set of solutions, and stores the result for later comparison.
#[derive(Parser, Debug)]
#[command(name = "promptlab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (default: $PROMPTLAB_DATA_DIR, then ./data).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log pipeline diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptlab.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory layout and a default promptlab.yaml.
    Init,

    /// List problem statements.
    Problems(ProblemsArgs),

    /// List normalized tool descriptors.
    Tools(ToolsArgs),

    /// Assemble and print the prompt for a problem without calling the model.
    Prompt(PromptArgs),

    /// Generate solutions for one or more problems and record the results.
    Run(RunArgs),

    /// List recorded results, newest first.
    History(HistoryArgs),

    /// Show one recorded result.
    Show(ShowArgs),

    /// Compare two recorded results.
    Compare(CompareArgs),

    /// Export a recorded result as text or JSON.
    Export(ExportArgs),

    /// Manage saved prompt templates.
    Templates(TemplatesCommand),
}

/// Arguments for the `problems` command.
#[derive(Parser, Debug)]
pub struct ProblemsArgs {
    /// Only problems in this domain.
    #[arg(long)]
    pub domain: Option<String>,

    /// Only problems at this level (1-5).
    #[arg(long)]
    pub level: Option<u8>,
}

/// Arguments for the `tools` command.
#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Only tools tagged with this domain.
    #[arg(long)]
    pub domain: Option<String>,

    /// Print each tool's catalog entry as sent to the model.
    #[arg(long)]
    pub catalog: bool,
}

/// Prompt and model settings shared by `prompt` and `run`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Tool ids to include, comma separated, in catalog order.
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Saved template name (default: the configured templates).
    #[arg(long)]
    pub template: Option<String>,

    /// Override the configured model id.
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured temperature (0.0-1.0).
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Override the configured max output tokens.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Minimum number of solutions that should use a tool.
    #[arg(long)]
    pub min_tool_solutions: Option<u32>,

    /// Maximum number of solutions that should use a tool.
    #[arg(long)]
    pub max_tool_solutions: Option<u32>,
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Problem id to assemble a prompt for.
    #[arg(long)]
    pub problem: String,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Problem id to run; repeat for several problems.
    #[arg(long = "problem", required = true)]
    pub problems: Vec<String>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the `history` command.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Only results for this problem id.
    #[arg(long)]
    pub problem: Option<String>,

    /// Only results whose tool selection includes all of these ids.
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Only results generated with this model.
    #[arg(long)]
    pub model: Option<String>,

    /// Show at most this many results.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Result id to show.
    pub result_id: String,

    /// Print the raw model output instead of the parsed solutions.
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the `compare` command.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Baseline result id.
    pub left: String,

    /// Result id compared against the baseline.
    pub right: String,

    /// Print the comparison as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Export formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the `export` command.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Result id to export.
    pub result_id: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Template subcommands.
#[derive(Parser, Debug)]
pub struct TemplatesCommand {
    #[command(subcommand)]
    pub action: TemplatesAction,
}

/// Available template actions.
#[derive(Subcommand, Debug)]
pub enum TemplatesAction {
    /// List saved templates.
    List,

    /// Save a template pair under a name, replacing any existing one.
    Save(TemplateSaveArgs),
}

/// Arguments for the `templates save` command.
#[derive(Parser, Debug)]
pub struct TemplateSaveArgs {
    /// Template name.
    pub name: String,

    /// File holding the system prompt template.
    #[arg(long)]
    pub system_file: PathBuf,

    /// File holding the user prompt template (default: the configured one).
    #[arg(long)]
    pub user_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["promptlab", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert!(cli.data_dir.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["promptlab", "history", "--data-dir", "/tmp/lab", "-v"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/lab")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_run_full() {
        let cli = Cli::try_parse_from([
            "promptlab",
            "run",
            "--problem",
            "nutrition_l1_001",
            "--problem",
            "sleep_l2_004",
            "--tools",
            "oura_ring,myfitnesspal",
            "--template",
            "terse",
            "--temperature",
            "0.4",
            "--max-tokens",
            "2000",
            "--min-tool-solutions",
            "2",
            "--max-tool-solutions",
            "3",
        ])
        .unwrap();

        if let Command::Run(args) = cli.command {
            assert_eq!(args.problems, vec!["nutrition_l1_001", "sleep_l2_004"]);
            assert_eq!(args.generation.tools, vec!["oura_ring", "myfitnesspal"]);
            assert_eq!(args.generation.template.as_deref(), Some("terse"));
            assert_eq!(args.generation.temperature, Some(0.4));
            assert_eq!(args.generation.max_tokens, Some(2000));
            assert_eq!(args.generation.min_tool_solutions, Some(2));
            assert_eq!(args.generation.max_tool_solutions, Some(3));
            assert!(args.generation.model.is_none());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn run_requires_problem() {
        assert!(Cli::try_parse_from(["promptlab", "run", "--tools", "notion"]).is_err());
    }

    #[test]
    fn parse_export_defaults_to_text() {
        let cli = Cli::try_parse_from(["promptlab", "export", "abc"]).unwrap();
        if let Command::Export(args) = cli.command {
            assert_eq!(args.format, ExportFormat::Text);
            assert!(args.output.is_none());
        } else {
            panic!("Expected Export command");
        }

        let cli = Cli::try_parse_from(["promptlab", "export", "abc", "--format", "json", "-o", "out.json"])
            .unwrap();
        if let Command::Export(args) = cli.command {
            assert_eq!(args.format, ExportFormat::Json);
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
        } else {
            panic!("Expected Export command");
        }
    }

    #[test]
    fn parse_templates_save() {
        let cli = Cli::try_parse_from([
            "promptlab",
            "templates",
            "save",
            "terse",
            "--system-file",
            "system.txt",
        ])
        .unwrap();
        if let Command::Templates(cmd) = cli.command {
            match cmd.action {
                TemplatesAction::Save(args) => {
                    assert_eq!(args.name, "terse");
                    assert_eq!(args.system_file, PathBuf::from("system.txt"));
                    assert!(args.user_file.is_none());
                }
                TemplatesAction::List => panic!("Expected Save action"),
            }
        } else {
            panic!("Expected Templates command");
        }
    }

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from(["promptlab", "compare", "a1", "b2", "--json"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert_eq!((args.left.as_str(), args.right.as_str()), ("a1", "b2"));
            assert!(args.json);
        } else {
            panic!("Expected Compare command");
        }
    }
}
