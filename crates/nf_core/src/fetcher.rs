use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Fetch and normalize every entry the feed returns for `keyword`.
    /// Whole-document failures are returned as errors; the collector
    /// decides what to do with them.
    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>>;
}
