//! Implementation of the `promptlab export` command.

use crate::cli::{ExportArgs, ExportFormat};
use promptlab::context::require_initialized;
use promptlab::error::Result;
use promptlab::fs::atomic_write_file;
use promptlab::results::{DeclaredOrMentioned, ResultStore, export_json, export_text};
use std::path::Path;
use std::sync::Arc;

pub fn cmd_export(data_dir: Option<&Path>, args: ExportArgs) -> Result<()> {
    let ctx = require_initialized(data_dir)?;
    let store = ResultStore::new(&ctx.results_dir, Arc::new(DeclaredOrMentioned));
    let record = store.load(&args.result_id)?;

    let content = match args.format {
        ExportFormat::Text => export_text(&record),
        ExportFormat::Json => export_json(&record)?,
    };

    match args.output {
        Some(path) => {
            atomic_write_file(&path, &content)?;
            eprintln!("Exported {} to {}", record.result_id, path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
