//! Extraction routines, one per scraping mode.
//!
//! Every routine fetches a root page, locates an anchor element and walks its
//! children. Pages are fetched strictly one after another. A missing root
//! page yields [`RoutineOutput::Empty`]; a missing detail page skips that
//! item. Only structural errors (`TagNotFound`, `VersionsListNotFound`)
//! abort a routine.

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::fetch::Fetcher;
use crate::types::{ScrapeResult, Sites, TabularResult};

pub use download::download;
pub use latest_versions::latest_versions;
pub use pep::pep;
pub use whats_new::whats_new;

/// Scraping mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::WhatsNew,
        Mode::LatestVersions,
        Mode::Download,
        Mode::Pep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsNew => "whats-new",
            Self::LatestVersions => "latest-versions",
            Self::Download => "download",
            Self::Pep => "pep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

/// What a routine produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineOutput {
    /// Rows to hand to the formatter.
    Table(TabularResult),
    /// A file was written to this path.
    Saved(PathBuf),
    /// Nothing to show (the root page or archive never arrived).
    Empty,
}

impl From<Option<TabularResult>> for RoutineOutput {
    fn from(result: Option<TabularResult>) -> Self {
        result.map(Self::Table).unwrap_or(Self::Empty)
    }
}

/// Run the routine for `mode`.
pub async fn run_mode(
    mode: Mode,
    fetcher: &Fetcher,
    sites: &Sites,
    downloads_dir: &Path,
) -> ScrapeResult<RoutineOutput> {
    let output: RoutineOutput = match mode {
        Mode::WhatsNew => whats_new(fetcher, sites).await?.into(),
        Mode::LatestVersions => latest_versions(fetcher, sites).await?.into(),
        Mode::Download => download(fetcher, sites, downloads_dir)
            .await?
            .map(RoutineOutput::Saved)
            .unwrap_or(RoutineOutput::Empty),
        Mode::Pep => pep(fetcher, sites).await?.into(),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
        assert!("whats_new".parse::<Mode>().is_err());
    }

    #[test]
    fn test_output_from_option() {
        assert_eq!(RoutineOutput::from(None), RoutineOutput::Empty);
        let table = TabularResult::new(&["a"]);
        assert_eq!(
            RoutineOutput::from(Some(table.clone())),
            RoutineOutput::Table(table)
        );
    }
}
