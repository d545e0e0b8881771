use crate::models::target::{CACHE_MARKER, PROVIDER_MARKER};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pre-flight validation failures. Both abort the run with a non-zero
/// exit status before anything is touched.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("The directory {} does not exist or is not accessible.", .0.display())]
    PathNotFound(PathBuf),
    #[error("The specified path {} is not the expected Adobe CameraRaw Cache2 folder.", .0.display())]
    UnexpectedPath(PathBuf),
}

/// Existence check first, then the marker check. The marker check is a
/// heuristic guard against pointing the tool at an arbitrary directory,
/// not an ownership proof.
pub fn validate(target: &Path) -> Result<(), GateError> {
    if !target.is_dir() {
        return Err(GateError::PathNotFound(target.to_path_buf()));
    }
    let shown = target.to_string_lossy();
    if !shown.contains(PROVIDER_MARKER) || !shown.contains(CACHE_MARKER) {
        return Err(GateError::UnexpectedPath(target.to_path_buf()));
    }
    Ok(())
}

/// Blocking yes/no prompt on stdin. Anything other than `y`/`yes` is a no.
pub fn confirm_deletion(target: &Path) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "Are you sure you want to DELETE ALL files in:\n  {}\nProceed? [y/N] ",
        target.display()
    )
    .context("failed to write confirmation prompt")?;
    stdout.flush().context("failed to flush confirmation prompt")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("failed to read confirmation")?;
    Ok(matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
