//! Run controller: build the client, dispatch the mode, render the result.

use anyhow::{Context, Result};
use docs_scraper::{render, run_mode, Fetcher, ResponseCache, RoutineOutput, Sites};

use crate::args::RunRequest;
use crate::config::Settings;

/// Execute one parser run and return what the routine produced.
pub async fn execute(
    request: &RunRequest,
    settings: &Settings,
    sites: &Sites,
) -> Result<RoutineOutput> {
    tracing::info!("Parser started");
    tracing::info!("Command-line arguments: {request:?}");

    let cache = ResponseCache::new(settings.cache_dir(), settings.cache_ttl)
        .context("failed to open the HTTP cache")?;
    let fetcher = Fetcher::new(Some(cache), settings.timeout)
        .context("failed to build the HTTP client")?;

    if request.clear_cache {
        fetcher.clear_cache().context("failed to clear the HTTP cache")?;
    }

    let output = run_mode(request.mode, &fetcher, sites, &settings.downloads_dir())
        .await
        .map_err(|e| {
            tracing::error!("{} failed: {e}", request.mode);
            e
        })
        .with_context(|| format!("mode '{}' failed", request.mode))?;

    if let RoutineOutput::Table(result) = &output {
        render(result, request.output, request.mode, &settings.results_dir())
            .context("failed to write results")?;
    }

    tracing::info!("Parser finished");
    Ok(output)
}
