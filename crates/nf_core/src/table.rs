use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::criteria::FilterCriteria;
use crate::types::Article;

/// Articles in collection order, unique by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArticleTable {
    articles: Vec<Article>,
}

/// Deserializes through `from_articles` so a stored table stays unique by URL.
impl<'de> Deserialize<'de> for ArticleTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Article>::deserialize(deserializer).map(Self::from_articles)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub total: usize,
    pub keywords_searched: usize,
    pub unique_sources: usize,
    /// Most frequent keyword first; ties keep first-appearance order.
    pub by_keyword: Vec<KeywordCount>,
}

impl ArticleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table keeping only the first article seen for each URL.
    pub fn from_articles<I>(articles: I) -> Self
    where
        I: IntoIterator<Item = Article>,
    {
        let mut seen = HashSet::new();
        let articles = articles
            .into_iter()
            .filter(|article| seen.insert(article.url.clone()))
            .collect();
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }

    pub fn head(&self, n: usize) -> &[Article] {
        &self.articles[..n.min(self.articles.len())]
    }

    /// Derives the subset matching `criteria`, preserving order.
    pub fn filter(&self, criteria: &FilterCriteria) -> ArticleTable {
        let matcher = criteria.matcher();
        Self {
            articles: self
                .articles
                .iter()
                .filter(|article| matcher.matches(article))
                .cloned()
                .collect(),
        }
    }

    /// Distinct keywords in order of first appearance.
    pub fn keywords(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.articles
            .iter()
            .map(|a| a.keyword.as_str())
            .filter(|k| seen.insert(*k))
            .collect()
    }

    /// Distinct sources, sorted.
    pub fn sources(&self) -> Vec<&str> {
        self.articles
            .iter()
            .map(|a| a.source.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest publication dates among dated articles.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.articles.iter().filter_map(Article::published_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    pub fn summary(&self, keywords_searched: usize) -> TableSummary {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for article in &self.articles {
            *counts.entry(article.keyword.as_str()).or_default() += 1;
        }

        let mut by_keyword: Vec<KeywordCount> = self
            .keywords()
            .into_iter()
            .map(|keyword| KeywordCount {
                keyword: keyword.to_string(),
                count: counts.get(keyword).copied().unwrap_or_default(),
            })
            .collect();
        // Stable sort keeps first-appearance order among equal counts.
        by_keyword.sort_by(|a, b| b.count.cmp(&a.count));

        TableSummary {
            total: self.articles.len(),
            keywords_searched,
            unique_sources: self.sources().len(),
            by_keyword,
        }
    }
}

impl FromIterator<Article> for ArticleTable {
    fn from_iter<T: IntoIterator<Item = Article>>(iter: T) -> Self {
        Self::from_articles(iter)
    }
}

impl IntoIterator for ArticleTable {
    type Item = Article;
    type IntoIter = std::vec::IntoIter<Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArticleTable {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::DateRange;
    use crate::dates::parse_published;

    fn article(keyword: &str, url: &str, source: &str, published: &str) -> Article {
        let mut article = Article::new(keyword, url);
        article.title = format!("Story at {}", url);
        article.source = source.to_string();
        article.published_raw = published.to_string();
        article.published_at = parse_published(published);
        article
    }

    fn sample() -> ArticleTable {
        ArticleTable::from_articles(vec![
            article("carbon measures", "u1", "Reuters", "Mon, 06 Jan 2025 10:00:00 GMT"),
            article("carbon measures", "u2", "Bloomberg", "Fri, 10 Jan 2025 10:00:00 GMT"),
            article("scope 3 emissions", "u3", "Reuters", ""),
            article("scope 3 emissions", "u4", "ESG Today", "Wed, 01 Jan 2025 09:00:00 GMT"),
            article("exxon scope 3", "u5", "Reuters", "Sat, 04 Jan 2025 09:00:00 GMT"),
        ])
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let table = ArticleTable::from_articles(vec![
            article("a", "u1", "Reuters", ""),
            article("b", "u1", "Bloomberg", ""),
            article("b", "u2", "Bloomberg", ""),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.articles()[0].keyword, "a");
        assert_eq!(table.articles()[0].source, "Reuters");
        assert_eq!(table.articles()[1].url, "u2");
    }

    #[test]
    fn test_deserialize_drops_duplicate_urls() {
        let json = serde_json::json!([
            { "keyword": "a", "title": "first", "url": "u1", "published_raw": "",
              "published_at": null, "source": "Reuters", "description": "" },
            { "keyword": "b", "title": "again", "url": "u1", "published_raw": "",
              "published_at": null, "source": "Bloomberg", "description": "" },
        ]);
        let table: ArticleTable = serde_json::from_value(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.articles()[0].title, "first");

        let round_trip: ArticleTable =
            serde_json::from_str(&serde_json::to_string(&table).unwrap()).unwrap();
        assert_eq!(round_trip, table);
    }

    #[test]
    fn test_empty_keyword_set_is_no_restriction() {
        let table = sample();
        let filtered = table.filter(&FilterCriteria::new().with_keywords(Vec::<String>::new()));
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let table = sample();
        let criteria = FilterCriteria::new()
            .with_search("story")
            .with_sources(["Reuters"])
            .with_date_range(
                DateRange::new(
                    NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                )
                .unwrap(),
            );
        let once = table.filter(&criteria);
        let twice = once.filter(&criteria);
        assert_eq!(once, twice);

        let urls: Vec<_> = once.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u3"]);
    }

    #[test]
    fn test_filter_does_not_mutate_table() {
        let table = sample();
        let _ = table.filter(&FilterCriteria::new().with_search("nothing matches this"));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_keywords_and_sources() {
        let table = sample();
        assert_eq!(
            table.keywords(),
            vec!["carbon measures", "scope 3 emissions", "exxon scope 3"]
        );
        assert_eq!(table.sources(), vec!["Bloomberg", "ESG Today", "Reuters"]);
    }

    #[test]
    fn test_date_bounds() {
        let table = sample();
        let (min, max) = table.date_bounds().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());

        let undated = ArticleTable::from_articles(vec![article("a", "u1", "Reuters", "")]);
        assert!(undated.date_bounds().is_none());
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary(6);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.keywords_searched, 6);
        assert_eq!(summary.unique_sources, 3);
        assert_eq!(summary.by_keyword[0].keyword, "carbon measures");
        assert_eq!(summary.by_keyword[0].count, 2);
        assert_eq!(summary.by_keyword[1].keyword, "scope 3 emissions");
        assert_eq!(summary.by_keyword[2].count, 1);
    }

    #[test]
    fn test_head() {
        let table = sample();
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(20).len(), 5);
        assert!(ArticleTable::new().head(20).is_empty());
    }
}
