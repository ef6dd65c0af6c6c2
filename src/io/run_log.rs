use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat};
use tracing::warn;

/// Append-only, timestamped processing log kept next to the run's
/// artifacts. Lines are held in memory until `open` is called, so a run
/// that dies during input validation leaves the output directory alone.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    pending: Vec<String>,
    opened: bool,
}

impl RunLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pending: Vec::new(),
            opened: false,
        }
    }

    pub fn open(&mut self) -> Result<()> {
        self.opened = true;
        self.flush()
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn record(&mut self, message: &str) {
        let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        self.pending.push(format!("{} {}", stamp, message));
        if let Err(err) = self.flush() {
            warn!(log = %self.path.display(), error = %err, "processing log write failed");
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.opened || self.pending.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        for line in &self.pending {
            writeln!(file, "{}", line)?;
        }
        self.pending.clear();
        Ok(())
    }
}
