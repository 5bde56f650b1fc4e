//! `pep`: count proposals per status as stated on each proposal's own page.
//!
//! `Total` counts every row of the index, including rows whose detail page
//! never arrived; the per-status counts only include pages that were read.

use scraper::Html;

use crate::constants::{expected_statuses, STATUS_HEADER};
use crate::fetch::Fetcher;
use crate::locate::{locate, text_of, TagQuery, TagTree};
use crate::progress::item_bar;
use crate::types::{join_url, ScrapeResult, Sites, StatusTally, TabularResult};

/// One row of the numerical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// Status letter from the index (may be empty).
    pub letter: String,
    /// Absolute URL of the proposal page.
    pub url: String,
}

/// Tally proposals by the status their own page declares.
pub async fn pep(fetcher: &Fetcher, sites: &Sites) -> ScrapeResult<Option<TabularResult>> {
    let Some(response) = fetcher.fetch(&sites.pep_doc_url).await.into_response() else {
        tracing::error!("no response from {}, nothing counted", sites.pep_doc_url);
        return Ok(None);
    };

    let rows = index_rows(&response.text(), &sites.pep_doc_url)?;
    let mut tally = StatusTally::new();
    let mut total = 0u64;

    let bar = item_bar(rows.len(), "pep");
    for row in rows {
        bar.inc(1);
        total += 1;
        let Some(page) = fetcher.fetch(&row.url).await.into_response() else {
            continue;
        };
        let status = page_status(&page.text())?;
        let expected = expected_statuses(&row.letter);
        if !expected.contains(&status.as_str()) {
            tracing::warn!(
                "\nMismatched statuses:\n{}\nStatus on page: {}\nExpected statuses: {:?}",
                row.url,
                status,
                expected
            );
        }
        tally.record(&status);
    }
    bar.finish_and_clear();

    tally.into_result(&STATUS_HEADER, total).map(Some)
}

/// Rows of the numerical index table with their status letter and link.
pub fn index_rows(html: &str, base_url: &str) -> ScrapeResult<Vec<IndexRow>> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let section = locate(&root, &TagQuery::new("section").attr("id", "numerical-index"))?;
    let tbody = locate(&section, &TagQuery::new("tbody"))?;

    tbody
        .find_all(&TagQuery::new("tr"))
        .iter()
        .map(|tr| {
            let td = locate(tr, &TagQuery::new("td"))?;
            let abbr = locate(&td, &TagQuery::new("abbr"))?;
            // First letter is the proposal type, the rest is the status.
            let letter: String = text_of(&abbr).chars().skip(1).collect();
            let a = locate(tr, &TagQuery::new("a"))?;
            let url = join_url(base_url, a.value().attr("href").unwrap_or_default())?;
            Ok(IndexRow { letter, url })
        })
        .collect()
}

/// Status declared in the header fields of a proposal page.
pub fn page_status(html: &str) -> ScrapeResult<String> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let content = locate(&root, &TagQuery::new("section").attr("id", "pep-content"))?;
    Ok(text_of(&locate(&content, &TagQuery::new("abbr"))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <section id="numerical-index"><table><thead><tr><th>Type</th></tr></thead><tbody>
          <tr><td><abbr title="Informational, Active">IA</abbr></td>
              <td><a href="pep-0001/">1</a></td><td>PEP Purpose and Guidelines</td></tr>
          <tr><td><abbr title="Standards Track">S</abbr></td>
              <td><a href="pep-0750/">750</a></td><td>Template Strings</td></tr>
        </tbody></table></section>
    "#;

    #[test]
    fn test_index_rows() {
        let rows = index_rows(INDEX, "https://peps.python.org/").unwrap();
        assert_eq!(
            rows,
            [
                IndexRow {
                    letter: "A".to_string(),
                    url: "https://peps.python.org/pep-0001/".to_string(),
                },
                IndexRow {
                    letter: String::new(),
                    url: "https://peps.python.org/pep-0750/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_page_status() {
        let html = r#"
            <section id="pep-content"><dl class="rfc2822 field-list simple">
              <dt>Author:</dt><dd>Barry Warsaw</dd>
              <dt>Status:</dt><dd><abbr title="Currently valid informational guidance">Active</abbr></dd>
            </dl></section>
        "#;
        assert_eq!(page_status(html).unwrap(), "Active");
    }

    #[test]
    fn test_row_without_abbr_is_fatal() {
        let html = r#"<section id="numerical-index"><table><tbody>
            <tr><td>IA</td><td><a href="pep-0001/">1</a></td></tr>
        </tbody></table></section>"#;
        assert!(index_rows(html, "https://peps.python.org/").is_err());
    }
}
