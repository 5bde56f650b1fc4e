//! Core data types shared by the extraction routines and the formatter.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{MAIN_DOC_URL, PEP_DOC_URL};

/// Errors that can escape a scraping routine.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// An expected element is missing; the page layout no longer matches.
    #[error("Tag not found: <{tag}> {filter}")]
    TagNotFound { tag: String, filter: String },

    #[error("No list of Python versions found in the sidebar")]
    VersionsListNotFound,

    #[error("Row has {found} cells, header has {expected}")]
    RowArity { expected: usize, found: usize },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Base URLs of the two scraped sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sites {
    pub main_doc_url: String,
    pub pep_doc_url: String,
}

impl Default for Sites {
    fn default() -> Self {
        Self {
            main_doc_url: MAIN_DOC_URL.to_string(),
            pep_doc_url: PEP_DOC_URL.to_string(),
        }
    }
}

/// Resolve `href` against `base` the way a browser would.
pub fn join_url(base: &str, href: &str) -> ScrapeResult<String> {
    let base_url = url::Url::parse(base).map_err(|source| ScrapeError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    base_url
        .join(href)
        .map(|u| u.to_string())
        .map_err(|source| ScrapeError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}

/// Header row plus data rows, all of the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularResult {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularResult {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row. Rejects rows whose width differs from the header.
    pub fn push_row<I, T>(&mut self, cells: I) -> ScrapeResult<()>
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let row: Vec<String> = cells.into_iter().map(|c| c.to_string()).collect();
        if row.len() != self.header.len() {
            return Err(ScrapeError::RowArity {
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header followed by every data row.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(|r| r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

impl fmt::Display for TabularResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.all_rows() {
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// Occurrence count per status label.
///
/// Backed by a `BTreeMap`, so iteration is always in lexicographic label
/// order no matter in which order statuses were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    counts: BTreeMap<String, u64>,
}

impl StatusTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, status: &str) -> u64 {
        self.counts.get(status).copied().unwrap_or(0)
    }

    /// Sum of every per-status count.
    pub fn counted(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Render as `header`, sorted `(label, count)` rows, then `("Total", total)`.
    pub fn into_result(self, header: &[&str], total: u64) -> ScrapeResult<TabularResult> {
        let mut result = TabularResult::new(header);
        for (status, count) in self.counts {
            result.push_row([status, count.to_string()])?;
        }
        result.push_row(["Total".to_string(), total.to_string()])?;
        Ok(result)
    }
}
