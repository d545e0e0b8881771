use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "delete_cache.log";

/// Per-run log of every deletion attempt and outcome.
///
/// The file is truncated on every run, records are line-oriented
/// `timestamp LEVEL: message` entries. Constructed once in the clean
/// command and passed to each component; buffered output is flushed on
/// drop so a normal exit never loses trailing records.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    pub fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&mut self, message: &str) {
        self.record("INFO", message);
    }

    pub fn warning(&mut self, message: &str) {
        self.record("WARNING", message);
    }

    pub fn error(&mut self, message: &str) {
        self.record("ERROR", message);
    }

    // A record that cannot be written must not abort the run.
    fn record(&mut self, level: &str, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Err(e) = writeln!(self.writer, "{stamp} {level}: {message}") {
            log::debug!("log write failed: {e}");
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush log file")
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// The log lives next to the running binary, falling back to the current
/// directory when the executable path cannot be determined.
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}
