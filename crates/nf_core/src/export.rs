use chrono::{DateTime, Local};
use serde::Serialize;

use crate::table::ArticleTable;
use crate::types::Article;
use crate::{Error, Result};

pub const COLUMNS: [&str; 7] = [
    "Keyword",
    "Title",
    "URL",
    "Published",
    "Published_Date",
    "Source",
    "Description",
];

const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn render(&self, table: &ArticleTable) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Csv => to_csv(table),
            ExportFormat::Json => to_json(table).map(String::into_bytes),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Export(format!("Unsupported export format: {}", other))),
        }
    }
}

/// One exported row, field names matching the CSV header.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Keyword")]
    keyword: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "URL")]
    url: &'a str,
    #[serde(rename = "Published")]
    published: &'a str,
    #[serde(rename = "Published_Date")]
    published_date: Option<String>,
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
}

impl<'a> ExportRow<'a> {
    fn new(article: &'a Article, date_format: impl Fn(&Article) -> Option<String>) -> Self {
        Self {
            keyword: &article.keyword,
            title: &article.title,
            url: &article.url,
            published: &article.published_raw,
            published_date: date_format(article),
            source: &article.source,
            description: &article.description,
        }
    }
}

pub fn to_csv(table: &ArticleTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for article in table {
        let row = ExportRow::new(article, |a| {
            a.published_at.map(|d| d.format(CSV_DATE_FORMAT).to_string())
        });
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to flush CSV: {}", e)))
}

/// Pretty-printed JSON array of row objects.
pub fn to_json(table: &ArticleTable) -> Result<String> {
    let rows: Vec<ExportRow<'_>> = table
        .iter()
        .map(|article| ExportRow::new(article, |a| a.published_at.map(|d| d.to_rfc3339())))
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// `rss_feed_<timestamp>.<ext>`, or `filtered_results_<timestamp>.<ext>`
/// when the table went through an active filter.
pub fn export_file_name(format: ExportFormat, filtered: bool, now: DateTime<Local>) -> String {
    let prefix = if filtered { "filtered_results" } else { "rss_feed" };
    format!("{}_{}.{}", prefix, now.format("%Y%m%d_%H%M%S"), format.extension())
}
