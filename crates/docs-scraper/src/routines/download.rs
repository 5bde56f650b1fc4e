//! `download`: fetch the A4 PDF documentation archive.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use scraper::Html;

use crate::constants::PDF_ZIP_LINK;
use crate::fetch::Fetcher;
use crate::locate::{locate, TagQuery};
use crate::types::{join_url, ScrapeResult, Sites};

/// Download the PDF archive into `downloads_dir`, returning the written path.
///
/// Returns `Ok(None)` when either the downloads page or the archive never
/// arrived.
pub async fn download(
    fetcher: &Fetcher,
    sites: &Sites,
    downloads_dir: &Path,
) -> ScrapeResult<Option<PathBuf>> {
    let downloads_url = join_url(&sites.main_doc_url, "download.html")?;
    let Some(response) = fetcher.fetch(&downloads_url).await.into_response() else {
        tracing::error!("no response from {downloads_url}, nothing downloaded");
        return Ok(None);
    };

    let archive_url = archive_link(&response.text(), &downloads_url)?;
    let Some(archive) = fetcher.fetch(&archive_url).await.into_response() else {
        tracing::error!("no response from {archive_url}, nothing downloaded");
        return Ok(None);
    };

    fs::create_dir_all(downloads_dir)?;
    let archive_path = downloads_dir.join(archive_file_name(&archive_url));
    fs::write(&archive_path, &archive.body)?;

    tracing::info!("Archive downloaded and saved: {}", archive_path.display());
    Ok(Some(archive_path))
}

/// Absolute URL of the A4 PDF archive listed in the downloads table.
pub fn archive_link(html: &str, downloads_url: &str) -> ScrapeResult<String> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let table = locate(&root, &TagQuery::new("table").class("docutils"))?;

    let pdf_link = Regex::new(PDF_ZIP_LINK).expect("valid regex");
    let a = locate(&table, &TagQuery::new("a").attr_matches("href", pdf_link))?;
    join_url(downloads_url, a.value().attr("href").unwrap_or_default())
}

/// Last path segment of `url`, used verbatim as the file name.
pub fn archive_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWNLOADS: &str = r#"
        <table class="docutils align-default">
          <tr><td>PDF (US-Letter)</td><td><a href="archives/python-3.12-docs-pdf-letter.zip">zip</a></td></tr>
          <tr><td>PDF (A4)</td><td><a href="archives/python-3.12-docs-pdf-a4.zip">zip</a></td></tr>
        </table>
    "#;

    #[test]
    fn test_archive_link() {
        let url = archive_link(DOWNLOADS, "https://docs.python.org/3/download.html").unwrap();
        assert_eq!(
            url,
            "https://docs.python.org/3/archives/python-3.12-docs-pdf-a4.zip"
        );
        assert_eq!(archive_file_name(&url), "python-3.12-docs-pdf-a4.zip");
    }

    #[test]
    fn test_no_archive_link_is_fatal() {
        let html = r#"<table class="docutils"><tr><td><a href="x.tar.bz2">x</a></td></tr></table>"#;
        assert!(archive_link(html, "https://docs.python.org/3/download.html").is_err());
    }
}
