//! Cache-aware HTTP fetcher wrapping reqwest.
//!
//! Transport failures never leave this module as errors: they are logged
//! with a backtrace and reported as [`FetchOutcome::NoResponse`].

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::types::ScrapeResult;

const USER_AGENT: &str = concat!("docs-scraper/", env!("CARGO_PKG_VERSION"));

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Whether this response was served from the cache.
    pub from_cache: bool,
}

impl HttpResponse {
    /// Body decoded as UTF-8, whatever charset the server declared.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of a fetch: a response, or an explicit marker that none arrived.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Response(HttpResponse),
    NoResponse { url: String },
}

impl FetchOutcome {
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Self::Response(r) => Some(r),
            Self::NoResponse { .. } => None,
        }
    }

    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse { .. })
    }
}

/// HTTP client with an optional response cache in front of it.
pub struct Fetcher {
    client: reqwest::Client,
    cache: Option<ResponseCache>,
}

impl Fetcher {
    /// Build a fetcher. `timeout` of `None` keeps the client default.
    pub fn new(cache: Option<ResponseCache>, timeout: Option<Duration>) -> ScrapeResult<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            cache,
        })
    }

    /// Fetcher without a cache.
    pub fn uncached() -> ScrapeResult<Self> {
        Self::new(None, None)
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Drop every cached response. No-op without a cache.
    pub fn clear_cache(&self) -> ScrapeResult<usize> {
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(0),
        }
    }

    /// GET `url`, serving from the cache when a fresh entry exists.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(url)) {
            tracing::debug!("cache hit: {url}");
            return FetchOutcome::Response(cached);
        }

        match self.get(url).await {
            Ok(response) => {
                if response.is_success() {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.put(&response) {
                            tracing::warn!("failed to cache {url}: {e}");
                        }
                    }
                }
                FetchOutcome::Response(response)
            }
            Err(e) => {
                tracing::error!(
                    "Error while loading page {url}: {}\n{}",
                    error_chain(&e),
                    Backtrace::force_capture()
                );
                FetchOutcome::NoResponse {
                    url: url.to_string(),
                }
            }
        }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let r = self.client.get(url).send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let headers: Vec<(String, String)> = r
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = r.bytes().await?.to_vec();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            headers,
            body,
            from_cache: false,
        })
    }
}

/// Render an error and its sources as `outer: inner: root`.
fn error_chain(e: &dyn StdError) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
