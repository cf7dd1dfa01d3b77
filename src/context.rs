//! Data directory resolution for promptlab.
//!
//! Every command works against one data directory:
//!
//! ```text
//! data/
//!   promptlab.yaml        configuration (optional; defaults apply)
//!   events.ndjson         append-only run journal
//!   problems/*.json       problem statements
//!   tools/*.json          tool descriptors (simple or complex shape)
//!   results/<id>.json     one file per result record
//!   templates/saved_templates.json
//! ```
//!
//! The directory is chosen by `--data-dir`, then `PROMPTLAB_DATA_DIR`, then
//! `./data`.

use crate::config::Config;
use crate::error::{LabError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PROMPTLAB_DATA_DIR";

/// Data directory used when neither the flag nor the environment sets one.
pub const DEFAULT_DATA_DIR: &str = "data";

pub const CONFIG_FILE: &str = "promptlab.yaml";
pub const EVENTS_FILE: &str = "events.ndjson";

/// Resolved paths for one data directory. All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabContext {
    pub data_dir: PathBuf,
    pub problems_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub results_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub config_path: PathBuf,
    pub events_path: PathBuf,
}

impl LabContext {
    /// Build the layout rooted at `data_dir`.
    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            problems_dir: data_dir.join("problems"),
            tools_dir: data_dir.join("tools"),
            results_dir: data_dir.join("results"),
            templates_dir: data_dir.join("templates"),
            config_path: data_dir.join(CONFIG_FILE),
            events_path: data_dir.join(EVENTS_FILE),
            data_dir,
        }
    }

    /// Resolve from the `--data-dir` flag, the environment and the working directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            LabError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::resolve_with(
            explicit,
            env::var(DATA_DIR_ENV).ok(),
            &cwd,
        ))
    }

    /// Resolution with every input supplied; relative paths are joined onto `cwd`.
    pub fn resolve_with(explicit: Option<&Path>, env_value: Option<String>, cwd: &Path) -> Self {
        let chosen = explicit
            .map(Path::to_path_buf)
            .or_else(|| {
                env_value
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| PathBuf::from(v.trim()))
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let absolute = if chosen.is_absolute() {
            chosen
        } else {
            cwd.join(chosen)
        };
        Self::from_data_dir(absolute)
    }

    pub fn exists(&self) -> bool {
        self.data_dir.is_dir()
    }

    /// Create the data directory and every subdirectory. Idempotent.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            &self.data_dir,
            &self.problems_dir,
            &self.tools_dir,
            &self.results_dir,
            &self.templates_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                LabError::UserError(format!(
                    "failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Fail with a pointer to `promptlab init` when the data directory is missing.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.exists() {
            return Err(LabError::UserError(format!(
                "data directory not found: {}\n\n\
                 Run `promptlab init` to create it, or pass --data-dir.",
                self.data_dir.display()
            )));
        }
        Ok(())
    }

    /// Load `promptlab.yaml`, or defaults when it does not exist.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_path)
    }
}

/// Resolve the context and require that it exists.
pub fn require_initialized(explicit: Option<&Path>) -> Result<LabContext> {
    let ctx = LabContext::resolve(explicit)?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}

/// Visible `*.json` files directly inside `dir`, sorted by file name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        LabError::UserError(format!(
            "failed to read directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && !path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let ctx = LabContext::from_data_dir("/srv/lab");
        assert_eq!(ctx.problems_dir, PathBuf::from("/srv/lab/problems"));
        assert_eq!(ctx.tools_dir, PathBuf::from("/srv/lab/tools"));
        assert_eq!(ctx.results_dir, PathBuf::from("/srv/lab/results"));
        assert_eq!(ctx.templates_dir, PathBuf::from("/srv/lab/templates"));
        assert_eq!(ctx.config_path, PathBuf::from("/srv/lab/promptlab.yaml"));
        assert_eq!(ctx.events_path, PathBuf::from("/srv/lab/events.ndjson"));
    }

    #[test]
    fn test_resolution_precedence() {
        let cwd = Path::new("/work");

        let flag = LabContext::resolve_with(
            Some(Path::new("custom")),
            Some("/from/env".to_string()),
            cwd,
        );
        assert_eq!(flag.data_dir, PathBuf::from("/work/custom"));

        let env = LabContext::resolve_with(None, Some("/from/env".to_string()), cwd);
        assert_eq!(env.data_dir, PathBuf::from("/from/env"));

        let blank_env = LabContext::resolve_with(None, Some("  ".to_string()), cwd);
        assert_eq!(blank_env.data_dir, PathBuf::from("/work/data"));

        let default = LabContext::resolve_with(None, None, cwd);
        assert_eq!(default.data_dir, PathBuf::from("/work/data"));
    }

    #[test]
    #[serial]
    fn test_resolve_reads_environment() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: serialized with other env-mutating tests.
        unsafe { env::set_var(DATA_DIR_ENV, temp_dir.path()) };
        let ctx = LabContext::resolve(None).unwrap();
        unsafe { env::remove_var(DATA_DIR_ENV) };

        assert_eq!(ctx.data_dir, temp_dir.path());
    }

    #[test]
    fn test_ensure_layout_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = LabContext::from_data_dir(temp_dir.path().join("data"));

        assert!(ctx.ensure_initialized().is_err());
        ctx.ensure_layout().unwrap();
        ctx.ensure_layout().unwrap();

        assert!(ctx.ensure_initialized().is_ok());
        assert!(ctx.problems_dir.is_dir());
        assert!(ctx.results_dir.is_dir());
    }

    #[test]
    fn test_json_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for name in ["b.json", "a.json", ".hidden.json", "notes.md", "c.json.tmp"] {
            std::fs::write(dir.join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.join("nested.json")).unwrap();

        let names: Vec<_> = json_files(dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_missing_config_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = LabContext::from_data_dir(temp_dir.path());
        let config = ctx.load_config().unwrap();
        assert_eq!(config, Config::default());
    }
}
