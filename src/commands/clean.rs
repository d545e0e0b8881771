use crate::cli::parser::Cli;
use crate::logging::run_log::{self, RunLog};
use crate::models::target;
use crate::services::gate;
use crate::services::sweep::{self, SweepStats};
use anyhow::Result;
use colored::Colorize;
use comfy_table::Table;
use comfy_table::presets::NOTHING;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug)]
pub enum Outcome {
    Cancelled,
    Swept(SweepStats),
}

pub fn run(cli: &Cli) -> ExitCode {
    let mut log = match RunLog::create(run_log::default_log_path()) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", "=== Cache2 Deletion Warning ===".red().bold());
    println!(
        "{}",
        "This operation will permanently DELETE ALL files in the Adobe CameraRaw Cache2 folder."
            .yellow()
    );
    println!("The files will NOT be moved to the Recycle Bin.\n");

    let target = match &cli.path {
        Some(path) => target::normalize_path(path),
        None => target::default_target(),
    };
    println!("{} {}", "Target Cache2 directory:".bold(), target.display());
    log::debug!("resolved target: {}", target.display());

    match execute(&target, cli.yes, &mut log, gate::confirm_deletion) {
        Ok(Outcome::Cancelled) => ExitCode::SUCCESS,
        Ok(Outcome::Swept(stats)) => {
            print_summary(&target, &stats, log.path());
            if let Err(e) = log.flush() {
                log::debug!("{e:#}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            log.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Validate, confirm, then sweep. The confirmation callback is injectable
/// so the flow is testable without a terminal.
fn execute<C>(target: &Path, yes: bool, log: &mut RunLog, confirm: C) -> Result<Outcome>
where
    C: FnOnce(&Path) -> Result<bool>,
{
    gate::validate(target)?;

    if !yes && !confirm(target)? {
        println!("{}", "Operation cancelled by user.".green());
        log.info("Operation cancelled by user.");
        return Ok(Outcome::Cancelled);
    }

    let scan = sweep::scan(target);
    let mut stats = SweepStats::default();
    if scan.files.is_empty() {
        println!("{}", "No files to delete in the target directory.".yellow());
        log.info("No files to delete in the target directory.");
        return Ok(Outcome::Swept(stats));
    }

    println!("{}", format!("Deleting {} files...", scan.files.len()).cyan());
    let bar = progress_bar(scan.files.len() as u64);
    sweep::delete_files(&scan.files, target, log, &mut stats, |file| {
        if let Some(name) = file.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
        bar.inc(1);
    });
    sweep::remove_dirs(&scan.dirs, target, log, &mut stats);
    bar.finish_and_clear();

    println!("{}\n", "Deletion process completed.".green());
    log.info("Deletion process completed.");
    Ok(Outcome::Swept(stats))
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Deleting {msg}\n{bar:40.cyan/blue} {pos}/{len}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_summary(target: &Path, stats: &SweepStats, log_path: &Path) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["Item", "Detail"]);
    table.add_row(vec![
        "Target Directory".to_string(),
        target.display().to_string(),
    ]);
    table.add_row(vec![
        "Files Deleted".to_string(),
        stats.files_deleted.to_string(),
    ]);
    if stats.failures() > 0 {
        table.add_row(vec!["Failures".to_string(), stats.failures().to_string()]);
    }
    table.add_row(vec!["Log File".to_string(), log_path.display().to_string()]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gate::GateError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cache2_fixture() -> (TempDir, PathBuf, RunLog) {
        let dir = tempfile::tempdir().unwrap();
        let target = dir
            .path()
            .canonicalize()
            .unwrap()
            .join("CameraRaw")
            .join("Cache2");
        fs::create_dir_all(&target).unwrap();
        let log = RunLog::create(dir.path().join("test.log")).unwrap();
        (dir, target, log)
    }

    fn read_log(dir: &TempDir, log: RunLog) -> String {
        drop(log);
        fs::read_to_string(dir.path().join("test.log")).unwrap()
    }

    #[test]
    fn test_declined_confirmation_deletes_nothing() {
        let (dir, target, mut log) = cache2_fixture();
        fs::write(target.join("a.dat"), "a").unwrap();

        let outcome = execute(&target, false, &mut log, |_| Ok(false)).unwrap();
        assert!(matches!(outcome, Outcome::Cancelled));
        assert!(target.join("a.dat").exists());

        let content = read_log(&dir, log);
        let cancellations = content
            .lines()
            .filter(|l| l.contains("Operation cancelled by user."))
            .count();
        assert_eq!(cancellations, 1);
    }

    #[test]
    fn test_yes_flag_never_prompts() {
        let (_dir, target, mut log) = cache2_fixture();
        fs::write(target.join("a.dat"), "a").unwrap();
        fs::write(target.join("b.dat"), "b").unwrap();
        fs::create_dir(target.join("sub")).unwrap();

        let outcome = execute(&target, true, &mut log, |_| {
            panic!("prompt shown despite --yes")
        })
        .unwrap();

        match outcome {
            Outcome::Swept(stats) => {
                assert_eq!(stats.files_deleted, 2);
                assert_eq!(stats.dirs_removed, 1);
                assert_eq!(stats.failures(), 0);
            }
            Outcome::Cancelled => panic!("expected a sweep"),
        }
        assert!(target.is_dir());
        assert!(!target.join("sub").exists());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_second_run_on_empty_target_reports_zero() {
        let (_dir, target, mut log) = cache2_fixture();
        fs::write(target.join("a.dat"), "a").unwrap();

        execute(&target, true, &mut log, |_| Ok(true)).unwrap();
        let outcome = execute(&target, true, &mut log, |_| Ok(true)).unwrap();

        match outcome {
            Outcome::Swept(stats) => assert_eq!(stats, SweepStats::default()),
            Outcome::Cancelled => panic!("expected a sweep"),
        }
        assert!(target.is_dir());
    }

    #[test]
    fn test_missing_target_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("CameraRaw").join("Cache2");
        let mut log = RunLog::create(dir.path().join("test.log")).unwrap();

        let err = execute(&target, false, &mut log, |_| {
            panic!("prompt shown for a missing target")
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GateError>(),
            Some(GateError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_unexpected_path_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();
        let mut log = RunLog::create(dir.path().join("test.log")).unwrap();

        let err = execute(&target, false, &mut log, |_| {
            panic!("prompt shown for an unexpected path")
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GateError>(),
            Some(GateError::UnexpectedPath(_))
        ));
    }
}
