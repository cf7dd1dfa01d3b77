//! Implementation of the `promptlab show` command.

use crate::cli::ShowArgs;
use promptlab::context::require_initialized;
use promptlab::error::Result;
use promptlab::results::{DeclaredOrMentioned, ResultStore, export_text};
use std::path::Path;
use std::sync::Arc;

/// Print a stored record: the text report, or the raw model output with `--raw`.
pub fn cmd_show(data_dir: Option<&Path>, args: ShowArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let store = ResultStore::new(&ctx.results_dir, Arc::new(DeclaredOrMentioned));
    let record = store.load(&args.result_id)?;

    if args.raw {
        println!("{}", record.raw_output);
    } else {
        print!("{}", export_text(&record));
    }
    Ok(())
}
