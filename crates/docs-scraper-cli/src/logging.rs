//! Logging setup: stderr plus a size-rotated log file.
//!
//! Rotation:
//! - the file rotates once it reaches `MAX_LOG_SIZE` (1 MB)
//! - rotated files are named `.1`, `.2`, ... (at most `MAX_ROTATIONS`)

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Maximum log size before rotation (1 MB).
pub const MAX_LOG_SIZE: u64 = 1_000_000;

/// Maximum number of rotated log files to keep.
pub const MAX_ROTATIONS: u32 = 5;

/// Timestamp format of log lines.
pub const LOG_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Filter variable checked before `RUST_LOG`.
pub const LOG_FILTER_VAR: &str = "DOCS_SCRAPER_LOG";

/// Append-only log file that rotates itself by size.
pub struct RotatingFile {
    file: File,
    path: PathBuf,
    max_size: u64,
    max_rotations: u32,
    /// Approximate current size (re-read on open).
    current_size: u64,
}

impl RotatingFile {
    /// Open or create the log file, creating its directory if needed.
    pub fn open(path: &Path, max_size: u64, max_rotations: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file: {}", path.display()))?;

        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            max_size,
            max_rotations,
            current_size,
        })
    }

    /// Rotate: parser.log → parser.log.1, .1 → .2, etc.
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = rotation_path(&self.path, self.max_rotations);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }

        for i in (1..self.max_rotations).rev() {
            let from = rotation_path(&self.path, i);
            if from.exists() {
                std::fs::rename(&from, rotation_path(&self.path, i + 1))?;
            }
        }

        if self.max_rotations > 0 {
            std::fs::rename(&self.path, rotation_path(&self.path, 1))?;
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.current_size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.current_size > 0 && self.current_size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.current_size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Build path for a rotated log file: `parser.log.1`, `parser.log.2`, etc.
fn rotation_path(base: &Path, index: u32) -> PathBuf {
    let name = format!(
        "{}.{index}",
        base.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("parser.log")
    );
    base.with_file_name(name)
}

/// Install the global subscriber: stderr and the rotated file at `log_file`.
///
/// The level filter comes from `DOCS_SCRAPER_LOG`, then `RUST_LOG`, then `info`.
pub fn init(log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = RotatingFile::open(log_file, MAX_LOG_SIZE, MAX_ROTATIONS)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(())
}
