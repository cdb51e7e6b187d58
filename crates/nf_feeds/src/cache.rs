//! TTL memoization of fetch results, kept outside the fetchers themselves.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use nf_core::{Article, FeedFetcher, Result};
use tokio::sync::RwLock;
use tracing::debug;

struct CachedEntry {
    articles: Vec<Article>,
    fetched_at: Instant,
}

/// Wraps a fetcher and replays its successful results for `ttl`.
///
/// Failed fetches are never cached. Keys are the exact keyword text.
/// Expired entries are dropped whenever a fresh result is stored.
pub struct CachedFetcher {
    inner: Arc<dyn FeedFetcher>,
    entries: RwLock<HashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl CachedFetcher {
    pub fn new(inner: Arc<dyn FeedFetcher>, ttl: Duration) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    async fn lookup(&self, keyword: &str) -> Option<Vec<Article>> {
        let entries = self.entries.read().await;
        let entry = entries.get(keyword)?;
        if entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.articles.clone())
    }
}

#[async_trait]
impl FeedFetcher for CachedFetcher {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        if let Some(articles) = self.lookup(keyword).await {
            debug!("Cache hit for {:?} ({} articles)", keyword, articles.len());
            return Ok(articles);
        }

        let articles = self.inner.fetch(keyword).await?;

        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        if entries.len() < before {
            debug!("Dropped {} expired cache entries", before - entries.len());
        }
        entries.insert(
            keyword.to_string(),
            CachedEntry {
                articles: articles.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(articles)
    }
}
