pub mod cache;
pub mod cli;
pub mod collector;
pub mod config;
pub mod fetchers;
pub mod logging;

pub use cache::CachedFetcher;
pub use cli::{handle_command, FeedArgs, FeedCommands, FilterArgs};
pub use collector::{CollectProgress, FeedCollector, NoProgress};
pub use config::{CollectorConfig, FeedLocale, DEFAULT_KEYWORDS};
pub use fetchers::GoogleNewsFetcher;

pub mod prelude {
    pub use super::collector::FeedCollector;
    pub use nf_core::{Article, ArticleTable, Error, FeedFetcher, FilterCriteria, Result};
}
