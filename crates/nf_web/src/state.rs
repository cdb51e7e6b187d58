use nf_core::CollectionRun;
use nf_feeds::FeedCollector;
use tokio::sync::RwLock;

/// Host-side session: the collector plus the most recent run, if any.
pub struct AppState {
    pub collector: FeedCollector,
    pub keywords: Vec<String>,
    latest: RwLock<Option<CollectionRun>>,
}

impl AppState {
    pub fn new(collector: FeedCollector, keywords: Vec<String>) -> Self {
        Self {
            collector,
            keywords,
            latest: RwLock::new(None),
        }
    }

    pub async fn latest(&self) -> Option<CollectionRun> {
        self.latest.read().await.clone()
    }

    /// Each run replaces the previous table entirely.
    pub async fn replace(&self, run: CollectionRun) {
        *self.latest.write().await = Some(run);
    }
}
