use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Source label used when a feed entry does not name its publisher.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// One normalized feed entry, tagged with the keyword query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub keyword: String,
    pub title: String,
    pub url: String,
    /// Timestamp text exactly as the feed supplied it.
    pub published_raw: String,
    /// `None` when `published_raw` could not be parsed.
    pub published_at: Option<DateTime<FixedOffset>>,
    pub source: String,
    pub description: String,
}

impl Article {
    pub fn new(keyword: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            title: String::new(),
            url: url.into(),
            published_raw: String::new(),
            published_at: None,
            source: UNKNOWN_SOURCE.to_string(),
            description: String::new(),
        }
    }

    /// Calendar date of publication in the offset the feed reported it in.
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_at.map(|d| d.naive_local().date())
    }
}

/// A keyword whose fetch failed during a collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub keyword: String,
    pub message: String,
}

/// Result of one collection run: the deduplicated table plus what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRun {
    pub keywords: Vec<String>,
    pub table: crate::ArticleTable,
    pub failures: Vec<FetchFailure>,
    pub collected_at: DateTime<Local>,
}

impl CollectionRun {
    /// True when the run found no articles at all. This is not a failure.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn summary(&self) -> crate::TableSummary {
        self.table.summary(self.keywords.len())
    }
}
