//! `whats-new`: article per release with its title and editors.

use scraper::Html;

use crate::constants::WHATS_NEW_HEADER;
use crate::fetch::Fetcher;
use crate::locate::{locate, text_of, TagQuery, TagTree};
use crate::progress::item_bar;
use crate::types::{join_url, ScrapeResult, Sites, TabularResult};

/// Collect the "What's New" articles with their titles and editors.
pub async fn whats_new(fetcher: &Fetcher, sites: &Sites) -> ScrapeResult<Option<TabularResult>> {
    let whats_new_url = join_url(&sites.main_doc_url, "whatsnew/")?;
    let Some(response) = fetcher.fetch(&whats_new_url).await.into_response() else {
        tracing::error!("no response from {whats_new_url}, nothing collected");
        return Ok(None);
    };

    let links = article_links(&response.text(), &whats_new_url)?;
    let mut results = TabularResult::new(&WHATS_NEW_HEADER);

    let bar = item_bar(links.len(), "whats-new");
    for url in links {
        bar.inc(1);
        let Some(article) = fetcher.fetch(&url).await.into_response() else {
            continue;
        };
        let (title, editors) = parse_article(&article.text())?;
        results.push_row([url, title, editors])?;
    }
    bar.finish_and_clear();

    Ok(Some(results))
}

/// Absolute article URLs from the table of contents, in page order.
pub fn article_links(html: &str, base_url: &str) -> ScrapeResult<Vec<String>> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let toc = locate(&root, &TagQuery::new("div").class("toctree-wrapper"))?;

    toc.find_all(&TagQuery::new("li").class("toctree-l1"))
        .iter()
        .map(|li| {
            let a = locate(li, &TagQuery::new("a"))?;
            join_url(base_url, a.value().attr("href").unwrap_or_default())
        })
        .collect()
}

/// Page title and the first definition list flattened onto one line.
pub fn parse_article(html: &str) -> ScrapeResult<(String, String)> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let title = text_of(&locate(&root, &TagQuery::new("h1"))?);
    let editors = text_of(&locate(&root, &TagQuery::new("dl"))?).replace('\n', " ");
    Ok((title, editors))
}
