//! `latest-versions`: documented Python versions and their support status.

use std::backtrace::Backtrace;
use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

use crate::constants::{ALL_VERSIONS_MARKER, LATEST_VERSIONS_HEADER, PYTHON_VERSION_STATUS};
use crate::fetch::Fetcher;
use crate::locate::{locate, text_of, TagQuery, TagTree};
use crate::types::{ScrapeError, ScrapeResult, Sites, TabularResult};

fn version_status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PYTHON_VERSION_STATUS).expect("valid regex"))
}

/// Gather every version listed in the docs sidebar with its status.
pub async fn latest_versions(
    fetcher: &Fetcher,
    sites: &Sites,
) -> ScrapeResult<Option<TabularResult>> {
    let Some(response) = fetcher.fetch(&sites.main_doc_url).await.into_response() else {
        tracing::error!("no response from {}, nothing collected", sites.main_doc_url);
        return Ok(None);
    };
    parse_versions(&response.text()).map(Some)
}

/// Build the versions table from the docs index page.
///
/// The sidebar holds several lists; only the one mentioning "All versions"
/// is read. Every candidate is checked before giving up.
pub fn parse_versions(html: &str) -> ScrapeResult<TabularResult> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let sidebar = locate(&root, &TagQuery::new("div").class("sphinxsidebarwrapper"))?;

    let versions_list = sidebar
        .find_all(&TagQuery::new("ul"))
        .into_iter()
        .find(|ul| text_of(ul).contains(ALL_VERSIONS_MARKER))
        .ok_or_else(|| {
            tracing::error!(
                "No list of Python versions found\n{}",
                Backtrace::force_capture()
            );
            ScrapeError::VersionsListNotFound
        })?;

    let mut results = TabularResult::new(&LATEST_VERSIONS_HEADER);
    for a in versions_list.find_all(&TagQuery::new("a")) {
        let link = a.value().attr("href").unwrap_or_default();
        let (version, status) = split_version_status(&text_of(&a));
        results.push_row([link.to_string(), version, status])?;
    }
    Ok(results)
}

/// Split "Python 3.12 (stable)" into `("3.12", "stable")`.
///
/// Text that does not look like that is returned whole with an empty status.
pub fn split_version_status(text: &str) -> (String, String) {
    match version_status_re().captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}
