//! Settings resolution: explicit value, then environment, then default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

pub const HOME_VAR: &str = "DOCS_SCRAPER_HOME";
pub const CACHE_TTL_VAR: &str = "DOCS_SCRAPER_CACHE_TTL";
pub const TIMEOUT_VAR: &str = "DOCS_SCRAPER_TIMEOUT";

const LOGS_DIR: &str = "logs";
const LOG_FILE: &str = "parser.log";
const CACHE_DIR: &str = "http_cache";

/// Where files go and how the HTTP client behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root for logs, downloads, results and the HTTP cache.
    pub base_dir: PathBuf,
    /// Cached responses older than this are refetched; `None` keeps them forever.
    pub cache_ttl: Option<Duration>,
    /// Per-request timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Settings rooted at `base_dir` with defaults for everything else.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache_ttl: None,
            timeout: None,
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an optional explicit base directory and a
    /// variable lookup.
    pub fn resolve(
        explicit_home: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_dir = match explicit_home {
            Some(path) => path.to_path_buf(),
            None => match lookup(HOME_VAR) {
                Some(home) if !home.is_empty() => PathBuf::from(home),
                _ => std::env::current_dir().context("failed to read current directory")?,
            },
        };

        Ok(Self {
            base_dir,
            cache_ttl: parse_secs(CACHE_TTL_VAR, lookup(CACHE_TTL_VAR))?,
            timeout: parse_secs(TIMEOUT_VAR, lookup(TIMEOUT_VAR))?,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join(LOGS_DIR).join(LOG_FILE)
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join(docs_scraper::constants::DOWNLOADS_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join(docs_scraper::constants::RESULTS_DIR)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join(CACHE_DIR)
    }
}

fn parse_secs(var: &str, value: Option<String>) -> Result<Option<Duration>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .with_context(|| format!("{var} must be a whole number of seconds, got '{raw}'")),
    }
}
