pub mod criteria;
pub mod dates;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod table;
pub mod types;

pub use criteria::{DatePreset, DateRange, FilterCriteria};
pub use error::{Error, Result};
pub use export::{export_file_name, ExportFormat};
pub use fetcher::FeedFetcher;
pub use table::{ArticleTable, KeywordCount, TableSummary};
pub use types::{Article, CollectionRun, FetchFailure, UNKNOWN_SOURCE};
