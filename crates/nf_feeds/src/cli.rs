use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use nf_core::export::export_file_name;
use nf_core::{
    ArticleTable, CollectionRun, DatePreset, DateRange, ExportFormat, FilterCriteria, Result,
};

use crate::collector::{CollectProgress, FeedCollector};
use crate::config::CollectorConfig;

const PREVIEW_ROWS: usize = 20;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// Collect articles for every keyword, then optionally filter and export them
    Collect {
        /// Keyword to query; repeat to override the configured list
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
        #[command(flatten)]
        filters: FilterArgs,
        /// Export the (filtered) table in this format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Write the export here; a directory gets a timestamped file name. Defaults to stdout
        #[arg(short, long, requires = "format")]
        output: Option<PathBuf>,
        /// Number of articles to preview
        #[arg(long, default_value_t = PREVIEW_ROWS)]
        preview: usize,
    },
    /// Fetch a single keyword and list its entries
    Fetch {
        keyword: String,
    },
    /// List the configured keywords
    Keywords,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text to look for in titles and descriptions
    #[arg(long)]
    pub search: Option<String>,
    /// Keep only articles collected for this keyword (repeatable)
    #[arg(long = "filter-keyword")]
    pub filter_keywords: Vec<String>,
    /// Keep only articles from this source (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<String>,
    /// First publication day to keep (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last publication day to keep, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Quick date range; overrides --from/--to
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    Today,
    #[value(name = "7days")]
    Last7Days,
    #[value(name = "30days")]
    Last30Days,
    All,
}

impl From<PresetArg> for DatePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Today => DatePreset::Today,
            PresetArg::Last7Days => DatePreset::Last7Days,
            PresetArg::Last30Days => DatePreset::Last30Days,
            PresetArg::All => DatePreset::All,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

impl FilterArgs {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.filter_keywords.is_empty()
            && self.sources.is_empty()
            && self.from.is_none()
            && self.to.is_none()
            && self.preset.is_none()
    }

    /// Resolves relative date options against `today` and the table's own bounds.
    pub fn to_criteria(&self, table: &ArticleTable, today: NaiveDate) -> Result<FilterCriteria> {
        let bounds = table.date_bounds();
        let date_range = match self.preset {
            Some(preset) => DatePreset::from(preset).resolve(today, bounds),
            None if self.from.is_some() || self.to.is_some() => {
                DateRange::resolve(self.from, self.to, bounds)?
            }
            None => None,
        };

        Ok(FilterCriteria {
            search_text: self.search.clone().filter(|s| !s.is_empty()),
            keywords: self.filter_keywords.iter().cloned().collect(),
            sources: self.sources.iter().cloned().collect(),
            date_range,
        })
    }
}

/// Status lines on stderr while a collection runs.
struct TerminalProgress;

impl CollectProgress for TerminalProgress {
    fn keyword_started(&self, index: usize, total: usize, keyword: &str) {
        eprintln!("[{}/{}] Fetching articles for: {}", index + 1, total, keyword);
    }

    fn keyword_finished(
        &self,
        _index: usize,
        _total: usize,
        keyword: &str,
        outcome: std::result::Result<usize, &str>,
    ) {
        if let Err(message) = outcome {
            eprintln!("Error fetching {}: {}", keyword, message);
        }
    }
}

pub async fn handle_command(args: FeedArgs, config: &CollectorConfig) -> Result<()> {
    match args.command {
        FeedCommands::Collect {
            keywords,
            filters,
            format,
            output,
            preview,
        } => {
            let config = config.clone().with_keywords(keywords);
            config.validate()?;
            let collector = FeedCollector::from_config(&config)?;

            let run = collector
                .collect_with_progress(&config.keywords, &TerminalProgress)
                .await;

            // Keep stdout clean when the export itself goes there.
            let mut out: Box<dyn Write> = if format.is_some() && output.is_none() {
                Box::new(std::io::stderr())
            } else {
                Box::new(std::io::stdout())
            };

            print_run(&mut out, &run, preview)?;
            if run.is_empty() {
                return Ok(());
            }

            let (table, is_filtered) = if filters.is_empty() {
                (run.table, false)
            } else {
                let criteria = filters.to_criteria(&run.table, Local::now().date_naive())?;
                let filtered = run.table.filter(&criteria);
                writeln!(out, "\nResults: {} articles", filtered.len())?;
                print_articles(&mut out, &filtered, preview)?;
                (filtered, !criteria.is_unrestricted())
            };

            if let Some(format) = format {
                export(&table, format.into(), output.as_deref(), is_filtered)?;
            }
        }
        FeedCommands::Fetch { keyword } => {
            let collector = FeedCollector::from_config(config)?;
            let articles = collector.fetcher().fetch(&keyword).await?;
            println!("Found {} articles for {:?}", articles.len(), keyword);
            for article in &articles {
                println!("- {} ({}) {}", article.title, article.source, article.published_raw);
                println!("  {}", article.url);
            }
        }
        FeedCommands::Keywords => {
            println!("Keywords monitored:");
            for (i, keyword) in config.keywords.iter().enumerate() {
                println!("  {}. {}", i + 1, keyword);
            }
        }
    }
    Ok(())
}

fn print_run(out: &mut dyn Write, run: &CollectionRun, preview: usize) -> Result<()> {
    for failure in &run.failures {
        eprintln!("⚠️ {}: {}", failure.keyword, failure.message);
    }

    if run.is_empty() {
        writeln!(out, "No articles found. Try again later.")?;
        return Ok(());
    }

    let summary = run.summary();
    writeln!(out, "✅ Collection complete! Found {} unique articles", summary.total)?;
    writeln!(out, "Total articles:     {}", summary.total)?;
    writeln!(out, "Keywords searched:  {}", summary.keywords_searched)?;
    writeln!(out, "Unique sources:     {}", summary.unique_sources)?;
    writeln!(out, "\nArticles by keyword:")?;
    for entry in &summary.by_keyword {
        writeln!(out, "  {:>4}  {}", entry.count, entry.keyword)?;
    }
    writeln!(out, "\nRecent articles:")?;
    print_articles(out, &run.table, preview)
}

fn print_articles(out: &mut dyn Write, table: &ArticleTable, limit: usize) -> Result<()> {
    for article in table.head(limit) {
        writeln!(
            out,
            "- {} | {} | {} | {}",
            article.title, article.source, article.keyword, article.published_raw
        )?;
        writeln!(out, "  {}", article.url)?;
    }
    Ok(())
}

fn export(
    table: &ArticleTable,
    format: ExportFormat,
    output: Option<&Path>,
    is_filtered: bool,
) -> Result<()> {
    let bytes = format.render(table)?;
    match output {
        None => std::io::stdout().write_all(&bytes)?,
        Some(path) => {
            let path = if path.is_dir() {
                path.join(export_file_name(format, is_filtered, Local::now()))
            } else {
                path.to_path_buf()
            };
            std::fs::write(&path, bytes)?;
            eprintln!("💾 Wrote {} articles to {}", table.len(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nf_core::dates::parse_published;
    use nf_core::Article;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: FeedCommands,
    }

    fn table() -> ArticleTable {
        let mut first = Article::new("a", "u1");
        first.published_at = parse_published("2025-01-02");
        let mut second = Article::new("b", "u2");
        second.published_at = parse_published("2025-01-20");
        ArticleTable::from_articles(vec![first, second])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_collect_args() {
        let cli = TestCli::try_parse_from([
            "nf", "collect", "-k", "methane", "--keyword", "scope 3",
            "--search", "exxon", "--source", "Reuters", "--preset", "7days",
            "--format", "csv",
        ])
        .unwrap();

        match cli.command {
            FeedCommands::Collect { keywords, filters, format, output, preview } => {
                assert_eq!(keywords, vec!["methane", "scope 3"]);
                assert_eq!(filters.search.as_deref(), Some("exxon"));
                assert_eq!(filters.sources, vec!["Reuters"]);
                assert_eq!(filters.preset, Some(PresetArg::Last7Days));
                assert_eq!(format, Some(FormatArg::Csv));
                assert!(output.is_none());
                assert_eq!(preview, PREVIEW_ROWS);
            }
            _ => panic!("expected collect"),
        }
    }

    #[test]
    fn test_output_requires_format() {
        assert!(TestCli::try_parse_from(["nf", "collect", "-o", "out.csv"]).is_err());
    }

    #[test]
    fn test_to_criteria_fills_missing_bound() {
        let filters = FilterArgs {
            from: Some(date(2025, 1, 10)),
            ..FilterArgs::default()
        };
        let criteria = filters.to_criteria(&table(), date(2025, 2, 1)).unwrap();
        let range = criteria.date_range.unwrap();
        assert_eq!(range.start(), date(2025, 1, 10));
        assert_eq!(range.end(), date(2025, 1, 20));
    }

    #[test]
    fn test_to_criteria_preset_wins() {
        let filters = FilterArgs {
            from: Some(date(2024, 1, 1)),
            preset: Some(PresetArg::Today),
            ..FilterArgs::default()
        };
        let criteria = filters.to_criteria(&table(), date(2025, 2, 1)).unwrap();
        let range = criteria.date_range.unwrap();
        assert_eq!((range.start(), range.end()), (date(2025, 2, 1), date(2025, 2, 1)));
    }

    #[test]
    fn test_to_criteria_rejects_inverted_range() {
        let filters = FilterArgs {
            from: Some(date(2025, 2, 1)),
            to: Some(date(2025, 1, 1)),
            ..FilterArgs::default()
        };
        assert!(filters.to_criteria(&table(), date(2025, 2, 1)).is_err());
    }

    #[test]
    fn test_export_to_directory() {
        let dir = tempfile::tempdir().unwrap();

        export(&table(), ExportFormat::Json, Some(dir.path()), false).unwrap();
        let written: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("rss_feed_") && written[0].ends_with(".json"));
    }

    #[test]
    fn test_filtered_export_to_directory() {
        let dir = tempfile::tempdir().unwrap();

        export(&table(), ExportFormat::Csv, Some(dir.path()), true).unwrap();
        let written: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("filtered_results_") && written[0].ends_with(".csv"));
    }

    #[test]
    fn test_print_empty_run() {
        let run = CollectionRun {
            keywords: vec!["methane".to_string()],
            table: ArticleTable::new(),
            failures: Vec::new(),
            collected_at: Local::now(),
        };
        let mut out = Vec::new();
        print_run(&mut out, &run, PREVIEW_ROWS).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No articles found. Try again later.\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.csv");

        export(&table(), ExportFormat::Csv, Some(&path), false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Keyword,Title,URL"));
        assert_eq!(text.lines().count(), 3);
    }
}
