use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use nf_core::{ArticleTable, CollectionRun, FeedFetcher, FetchFailure, Result};
use tokio::time::sleep;

use crate::cache::CachedFetcher;
use crate::config::CollectorConfig;
use crate::fetchers::GoogleNewsFetcher;
use crate::logging::Logger;

pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// Receives per-keyword progress while a run is in flight.
pub trait CollectProgress: Send + Sync {
    fn keyword_started(&self, _index: usize, _total: usize, _keyword: &str) {}

    /// `outcome` is the number of articles fetched, or the failure message.
    fn keyword_finished(
        &self,
        _index: usize,
        _total: usize,
        _keyword: &str,
        _outcome: std::result::Result<usize, &str>,
    ) {
    }
}

/// Progress sink that ignores everything.
pub struct NoProgress;

impl CollectProgress for NoProgress {}

/// Runs a fetcher over a keyword list, one keyword at a time, and merges
/// the results into a single deduplicated table.
pub struct FeedCollector {
    fetcher: Arc<dyn FeedFetcher>,
    pace: Duration,
}

impl FeedCollector {
    pub fn new(fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            fetcher,
            pace: DEFAULT_PACE,
        }
    }

    /// Google News fetcher, wrapped in a TTL cache unless the TTL is zero.
    pub fn from_config(config: &CollectorConfig) -> Result<Self> {
        let fetcher: Arc<dyn FeedFetcher> = Arc::new(GoogleNewsFetcher::new(config)?);
        let fetcher: Arc<dyn FeedFetcher> = if config.cache_ttl().is_zero() {
            fetcher
        } else {
            Arc::new(CachedFetcher::new(fetcher, config.cache_ttl()))
        };
        Ok(Self::new(fetcher).with_pace(config.pace()))
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn pace(&self) -> Duration {
        self.pace
    }

    pub fn fetcher(&self) -> &Arc<dyn FeedFetcher> {
        &self.fetcher
    }

    pub async fn collect(&self, keywords: &[String]) -> CollectionRun {
        self.collect_with_progress(keywords, &NoProgress).await
    }

    /// Fetches every keyword in order, waiting `pace` between requests.
    ///
    /// A failing keyword contributes no articles and is recorded in
    /// `failures`; it never aborts the run. Duplicate URLs keep the first
    /// article seen, in keyword order.
    pub async fn collect_with_progress(
        &self,
        keywords: &[String],
        progress: &dyn CollectProgress,
    ) -> CollectionRun {
        let total = keywords.len();
        let mut articles = Vec::new();
        let mut failures = Vec::new();

        for (i, keyword) in keywords.iter().enumerate() {
            let logger = Logger::new()
                .with_prefix(format!("[{}/{}]", i + 1, total))
                .with_prefix(format!("[{}]", keyword));

            if i > 0 && !self.pace.is_zero() {
                logger.debug(&format!("⏳ Waiting {:?} before fetching", self.pace));
                sleep(self.pace).await;
            }

            logger.info(&format!("📡 Fetching from {}", self.fetcher.name()));
            progress.keyword_started(i, total, keyword);

            match self.fetcher.fetch(keyword).await {
                Ok(mut batch) => {
                    logger.info(&format!("📰 {} articles", batch.len()));
                    progress.keyword_finished(i, total, keyword, Ok(batch.len()));
                    articles.append(&mut batch);
                }
                Err(e) => {
                    let message = e.to_string();
                    logger.warn(&format!("⚠️ Error fetching: {}", message));
                    progress.keyword_finished(i, total, keyword, Err(message.as_str()));
                    failures.push(FetchFailure {
                        keyword: keyword.clone(),
                        message,
                    });
                }
            }
        }

        let fetched = articles.len();
        let table = ArticleTable::from_articles(articles);
        Logger::new().info(&format!(
            "✅ Collected {} unique articles ({} fetched, {} keywords failed)",
            table.len(),
            fetched,
            failures.len()
        ));

        CollectionRun {
            keywords: keywords.to_vec(),
            table,
            failures,
            collected_at: Local::now(),
        }
    }
}
