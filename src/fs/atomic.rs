//! Atomic filesystem operations for promptlab.
//!
//! All writes go through a temporary file in the target's directory:
//! 1. Write content to `.{filename}.{random}.tmp`
//! 2. Sync the file to disk (fsync)
//! 3. Move it into place
//!
//! [`atomic_write`] replaces the target if it exists (saved templates,
//! config scaffolding). [`atomic_create`] refuses to touch an existing target,
//! which is what the append-only result store needs: a record file is
//! written exactly once and never overwritten.
//!
//! Source and destination must be on the same filesystem for the final step
//! to be atomic. On crash a temporary file may remain next to the target.

use crate::error::{LabError, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, replacing any existing content.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LabError::UserError(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e
        ))
    })?;

    sync_parent(path);
    Ok(())
}

/// Atomically write a string to a file, replacing any existing content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically create a new file. Fails if `path` already exists.
///
/// The temp file is hard-linked into place, which fails with `AlreadyExists`
/// instead of clobbering a concurrent writer's file.
pub fn atomic_create<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => {
            sync_parent(path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(LabError::Internal(format!(
            "refusing to overwrite existing file '{}'",
            path.display()
        ))),
        Err(e) => Err(LabError::UserError(format!(
            "failed to create '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            LabError::UserError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Generate a unique temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LabError::UserError("invalid file path".to_string()))?;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Ok(parent.join(format!(".{}.{}.tmp", filename, &suffix[..8])))
}

/// Write content to a file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        LabError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        LabError::UserError(format!("failed to write to temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        LabError::UserError(format!("failed to sync temporary file to disk: {}", e))
    })?;

    Ok(())
}

/// Sync the parent directory so the new directory entry is persisted.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}
