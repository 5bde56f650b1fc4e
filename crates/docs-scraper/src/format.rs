//! Rendering of tabular results: plain lines, a bordered table, or a CSV file.
//!
//! Every writer is deterministic, so the same result always yields the same
//! bytes. CSV uses the "unix" dialect: all fields quoted, quotes doubled,
//! `\n` line endings.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::constants::DATETIME_FORMAT;
use crate::routines::Mode;
use crate::types::{ScrapeResult, TabularResult};

/// How a result is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One line per row, cells separated by a space.
    #[default]
    Plain,
    /// Bordered table with left-aligned columns.
    Pretty,
    /// CSV file under the results directory.
    File,
}

/// Render `result` for `mode`. Returns the file path when one was written.
pub fn render(
    result: &TabularResult,
    output: OutputMode,
    mode: Mode,
    results_dir: &Path,
) -> ScrapeResult<Option<PathBuf>> {
    match output {
        OutputMode::Plain => {
            write_plain(result, &mut io::stdout().lock())?;
            Ok(None)
        }
        OutputMode::Pretty => {
            write_pretty(result, &mut io::stdout().lock())?;
            Ok(None)
        }
        OutputMode::File => {
            let path = save_csv(result, mode, results_dir, Local::now())?;
            tracing::info!("Results saved to file: {}", path.display());
            Ok(Some(path))
        }
    }
}

pub fn write_plain<W: Write>(result: &TabularResult, w: &mut W) -> io::Result<()> {
    for row in result.all_rows() {
        writeln!(w, "{}", row.join(" "))?;
    }
    Ok(())
}

pub fn write_pretty<W: Write>(result: &TabularResult, w: &mut W) -> io::Result<()> {
    w.write_all(pretty_table(result).as_bytes())
}

/// Bordered table, first row as column titles.
pub fn pretty_table(result: &TabularResult) -> String {
    let mut widths = vec![0usize; result.width()];
    for row in result.all_rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let format_row = |row: &[String]| {
        let mut line = String::from("|");
        for (cell, &width) in row.iter().zip(&widths) {
            line.push_str(&format!(" {cell:<width$} |"));
        }
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_row(result.header()));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in result.rows() {
        out.push_str(&format_row(row.as_slice()));
        out.push('\n');
    }
    if !result.is_empty() {
        out.push_str(&border);
        out.push('\n');
    }
    out
}

pub fn write_csv<W: Write>(result: &TabularResult, w: &mut W) -> io::Result<()> {
    for row in result.all_rows() {
        let fields: Vec<String> = row
            .iter()
            .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
            .collect();
        w.write_all(fields.join(",").as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// `<mode>_<timestamp>.csv`
pub fn csv_file_name(mode: Mode, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", mode, now.format(DATETIME_FORMAT))
}

/// Write `result` as CSV into `results_dir`, creating it if needed.
pub fn save_csv(
    result: &TabularResult,
    mode: Mode,
    results_dir: &Path,
    now: DateTime<Local>,
) -> ScrapeResult<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(csv_file_name(mode, now));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_csv(result, &mut writer)?;
    writer.flush()?;
    Ok(path)
}
