//! On-disk response cache: store and retrieve successful GET responses.
//!
//! One JSON file per URL, named by the FNV hash of the URL. Entries carry the
//! time they were stored; with a TTL configured, older entries are treated as
//! missing. Without a TTL, entries live until the cache is cleared.

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::HttpResponse;
use crate::types::{ScrapeError, ScrapeResult};

const ENTRY_EXTENSION: &str = "json";

/// Serialized form of a cached response.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    url: String,
    final_url: String,
    status: u16,
    headers: Vec<(String, String)>,
    /// Body bytes, base64-encoded.
    body: String,
    cached_at: DateTime<Utc>,
}

/// Response cache backed by the filesystem.
pub struct ResponseCache {
    cache_dir: PathBuf,
    /// `None` keeps entries until cleared.
    ttl: Option<Duration>,
}

impl ResponseCache {
    /// Open (creating if needed) a cache in the given directory.
    pub fn new(cache_dir: PathBuf, ttl: Option<Duration>) -> ScrapeResult<Self> {
        fs::create_dir_all(&cache_dir)?;
        let cache = Self { cache_dir, ttl };
        tracing::debug!(
            "ResponseCache opened: {} entries in {}",
            cache.len(),
            cache.cache_dir.display()
        );
        Ok(cache)
    }

    /// Look up a fresh cached response for `url`.
    ///
    /// Unreadable or corrupt entries are dropped and reported as a miss.
    pub fn get(&self, url: &str) -> Option<HttpResponse> {
        let path = self.entry_path(url);
        let data = fs::read(&path).ok()?;

        let record: CacheRecord = match serde_json::from_slice(&data) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("dropping corrupt cache entry {}: {e}", path.display());
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if record.url != url || self.is_expired(&record) {
            return None;
        }

        let body = BASE64.decode(record.body.as_bytes()).ok()?;
        Some(HttpResponse {
            url: record.url,
            final_url: record.final_url,
            status: record.status,
            headers: record.headers,
            body,
            from_cache: true,
        })
    }

    /// Store a response under its requested URL.
    pub fn put(&self, response: &HttpResponse) -> ScrapeResult<PathBuf> {
        let record = CacheRecord {
            url: response.url.clone(),
            final_url: response.final_url.clone(),
            status: response.status,
            headers: response.headers.clone(),
            body: BASE64.encode(&response.body),
            cached_at: Utc::now(),
        };
        let data = serde_json::to_vec(&record)
            .map_err(|e| ScrapeError::Cache(format!("failed to serialize {}: {e}", record.url)))?;

        let path = self.entry_path(&response.url);
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Remove the cached entry for `url`, if any.
    pub fn invalidate(&self, url: &str) {
        let _ = fs::remove_file(self.entry_path(url));
    }

    /// Remove every cached entry. Returns how many were removed.
    pub fn clear(&self) -> ScrapeResult<usize> {
        let mut removed = 0;
        for path in self.entry_paths() {
            fs::remove_file(&path)?;
            removed += 1;
        }
        tracing::info!("cleared {removed} cached responses");
        Ok(removed)
    }

    /// Number of entries on disk (including expired).
    pub fn len(&self) -> usize {
        self.entry_paths().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn is_expired(&self, record: &CacheRecord) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let age = Utc::now().signed_duration_since(record.cached_at);
        age.to_std().map(|age| age > ttl).unwrap_or(false)
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = fnv::FnvHasher::default();
        hasher.write(url.as_bytes());
        self.cache_dir
            .join(format!("{:016x}.{ENTRY_EXTENSION}", hasher.finish()))
    }

    fn entry_paths(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(url: &str, body: &[u8]) -> HttpResponse {
        HttpResponse {
            url: url.to_string(),
            final_url: url.to_string(),
            status: 200,
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: body.to_vec(),
            from_cache: false,
        }
    }

    #[test]
    fn test_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().to_path_buf(), None).unwrap();

        let path = cache.put(&response("https://a.test/", b"\x00\xffbytes")).unwrap();
        assert!(path.exists());

        let loaded = cache.get("https://a.test/").unwrap();
        assert_eq!(loaded.body, b"\x00\xffbytes");
        assert_eq!(loaded.status, 200);
        assert!(loaded.from_cache);
        assert!(cache.get("https://b.test/").is_none());
    }

    #[test]
    fn test_cache_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let cache =
            ResponseCache::new(dir.path().to_path_buf(), Some(Duration::from_secs(0))).unwrap();
        cache.put(&response("https://a.test/", b"x")).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("https://a.test/").is_none());
    }

    #[test]
    fn test_cache_clear_and_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().to_path_buf(), None).unwrap();
        cache.put(&response("https://a.test/", b"a")).unwrap();
        cache.put(&response("https://b.test/", b"b")).unwrap();
        assert_eq!(cache.len(), 2);

        cache.invalidate("https://a.test/");
        assert!(cache.get("https://a.test/").is_none());
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().to_path_buf(), None).unwrap();
        let path = cache.put(&response("https://a.test/", b"a")).unwrap();
        fs::write(&path, b"{not json").unwrap();

        assert!(cache.get("https://a.test/").is_none());
        assert!(!path.exists());
    }
}
