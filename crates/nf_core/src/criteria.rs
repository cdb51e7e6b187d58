use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Article;
use crate::{Error, Result};

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from optional user bounds, filling the missing side
    /// from the bounds of the data. `None` when neither side can be known.
    ///
    /// Only a range with both sides given can be inverted; a lone bound
    /// outside the data yields a range that matches no dated article.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Option<Self>> {
        match (from, to) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            (Some(start), None) => {
                let end = bounds.map_or(start, |(_, max)| max.max(start));
                Ok(Some(Self { start, end }))
            }
            (None, Some(end)) => {
                let start = bounds.map_or(end, |(min, _)| min.min(end));
                Ok(Some(Self { start, end }))
            }
            (None, None) => Ok(None),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Quick date filters relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    Last7Days,
    Last30Days,
    All,
}

impl DatePreset {
    /// `All` spans the data bounds and yields no range when nothing is dated.
    pub fn resolve(
        self,
        today: NaiveDate,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> Option<DateRange> {
        let days_back = match self {
            DatePreset::Today => 0,
            DatePreset::Last7Days => 7,
            DatePreset::Last30Days => 30,
            DatePreset::All => {
                return bounds.map(|(start, end)| DateRange { start, end });
            }
        };
        let start = today.checked_sub_days(Days::new(days_back)).unwrap_or(today);
        Some(DateRange { start, end: today })
    }
}

impl std::str::FromStr for DatePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DatePreset::Today),
            "7days" | "last7days" | "last_7_days" => Ok(DatePreset::Last7Days),
            "30days" | "last30days" | "last_30_days" => Ok(DatePreset::Last30Days),
            "all" => Ok(DatePreset::All),
            other => Err(Error::Config(format!("Unknown date preset: {}", other))),
        }
    }
}

/// An active filter combination. Every empty or absent field means
/// "no restriction"; active fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub sources: BTreeSet<String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.needle().is_none()
            && self.keywords.is_empty()
            && self.sources.is_empty()
            && self.date_range.is_none()
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.matcher().matches(article)
    }

    pub(crate) fn matcher(&self) -> Matcher<'_> {
        Matcher {
            criteria: self,
            needle: self.needle(),
        }
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }
}

/// Criteria with the search text lowercased once per filter pass.
pub(crate) struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    needle: Option<String>,
}

impl Matcher<'_> {
    pub(crate) fn matches(&self, article: &Article) -> bool {
        if let Some(needle) = &self.needle {
            let in_title = article.title.to_lowercase().contains(needle.as_str());
            if !in_title && !article.description.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if !self.criteria.keywords.is_empty() && !self.criteria.keywords.contains(&article.keyword) {
            return false;
        }

        if !self.criteria.sources.is_empty() && !self.criteria.sources.contains(&article.source) {
            return false;
        }

        // Undated articles are never excluded by a date range.
        match (&self.criteria.date_range, article.published_date()) {
            (Some(range), Some(date)) => range.contains(date),
            _ => true,
        }
    }
}
