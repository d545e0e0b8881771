use crate::logging::run_log::RunLog;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Snapshot of the target's contents, taken once before deletion starts.
pub struct Scan {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub files_deleted: usize,
    pub files_failed: usize,
    pub dirs_removed: usize,
    pub dirs_failed: usize,
    pub skipped_outside: usize,
}

impl SweepStats {
    pub fn failures(&self) -> usize {
        self.files_failed + self.dirs_failed + self.skipped_outside
    }
}

/// Walk the target once, partitioning entries into files and directories.
/// Symlinks are not followed and count as files, so the links themselves
/// get unlinked. Directories are ordered by descending path length, which
/// keeps every directory after its descendants.
pub fn scan(target: &Path) -> Scan {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(target)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }
    dirs.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));
    Scan { files, dirs }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    Vanished,
}

/// The scan snapshot may be stale by the time an entry is acted on;
/// resolve it again and require it to still live under the target. A
/// symlink pointing outside the tree resolves to its destination and is
/// rejected here; an entry that can no longer be resolved at all is
/// reported separately.
pub fn containment(entry: &Path, target: &Path) -> Containment {
    match entry.canonicalize() {
        Ok(resolved) if resolved.starts_with(target) => Containment::Inside,
        Ok(_) => Containment::Outside,
        Err(_) => Containment::Vanished,
    }
}

/// Delete every scanned file, one attempt each. Failures are logged and
/// the loop continues.
pub fn delete_files<F>(
    files: &[PathBuf],
    target: &Path,
    log: &mut RunLog,
    stats: &mut SweepStats,
    mut progress: F,
) where
    F: FnMut(&Path),
{
    for file in files {
        progress(file);
        match containment(file, target) {
            Containment::Inside => {}
            Containment::Outside => {
                stats.skipped_outside += 1;
                log.warning(&format!("Skipping file outside target: {}", file.display()));
                continue;
            }
            Containment::Vanished => {
                stats.skipped_outside += 1;
                log.warning(&format!(
                    "Skipping file that no longer exists: {}",
                    file.display()
                ));
                continue;
            }
        }
        match fs::remove_file(file) {
            Ok(()) => {
                stats.files_deleted += 1;
                log.info(&format!("Deleted file: {}", file.display()));
            }
            Err(e) => {
                stats.files_failed += 1;
                log.error(&format!("Failed to delete file {}: {}", file.display(), e));
            }
        }
    }
}

/// Remove the scanned directories deepest-first. `remove_dir` only
/// succeeds on an empty directory; a parent left non-empty by an earlier
/// failure is logged and skipped over.
pub fn remove_dirs(dirs: &[PathBuf], target: &Path, log: &mut RunLog, stats: &mut SweepStats) {
    for dir in dirs {
        match containment(dir, target) {
            Containment::Inside => {}
            Containment::Outside => {
                stats.skipped_outside += 1;
                log.warning(&format!(
                    "Skipping directory outside target: {}",
                    dir.display()
                ));
                continue;
            }
            Containment::Vanished => {
                stats.skipped_outside += 1;
                log.warning(&format!(
                    "Skipping directory that no longer exists: {}",
                    dir.display()
                ));
                continue;
            }
        }
        match fs::remove_dir(dir) {
            Ok(()) => {
                stats.dirs_removed += 1;
                log.info(&format!("Deleted directory: {}", dir.display()));
            }
            Err(e) => {
                stats.dirs_failed += 1;
                log.error(&format!(
                    "Failed to delete directory {}: {}",
                    dir.display(),
                    e
                ));
            }
        }
    }
}
