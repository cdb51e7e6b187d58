use std::path::Path;
use std::time::Duration;

use nf_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Queries monitored when no other list is given.
pub const DEFAULT_KEYWORDS: [&str; 6] = [
    "carbon measures",
    "scope 3 emissions",
    "exxon scope 3",
    "greenhouse gas protocol scope 3",
    "Amy Bracchio",
    "Karthik Ramanna",
];

/// Language and region flags appended to every search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLocale {
    pub hl: String,
    pub gl: String,
    pub ceid: String,
}

impl Default for FeedLocale {
    fn default() -> Self {
        Self {
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: "US:en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub keywords: Vec<String>,
    /// Delay between successive keyword fetches.
    pub pace_secs: u64,
    /// Zero disables the result cache.
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub endpoint: String,
    pub locale: FeedLocale,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            pace_secs: 1,
            cache_ttl_secs: 3600,
            request_timeout_secs: None,
            endpoint: GOOGLE_NEWS_SEARCH_URL.to_string(),
            locale: FeedLocale::default(),
        }
    }
}

impl CollectorConfig {
    /// Reads a JSON config file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::Config("Keywords must not be blank".to_string()));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;
        Ok(())
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.keywords = keywords;
        }
        self
    }

    pub fn pace(&self) -> Duration {
        Duration::from_secs(self.pace_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.keywords.len(), 6);
        assert_eq!(config.keywords[0], "carbon measures");
        assert_eq!(config.pace(), Duration::from_secs(1));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CollectorConfig =
            serde_json::from_str(r#"{ "keywords": ["methane"], "pace_secs": 0 }"#).unwrap();
        assert_eq!(config.keywords, vec!["methane".to_string()]);
        assert_eq!(config.pace_secs, 0);
        assert_eq!(config.locale, FeedLocale::default());
        assert_eq!(config.endpoint, GOOGLE_NEWS_SEARCH_URL);
    }

    #[test]
    fn test_validate_rejects_blank_keyword() {
        let config = CollectorConfig::default().with_keywords(vec!["  ".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_keywords_ignores_empty_override() {
        let config = CollectorConfig::default().with_keywords(Vec::new());
        assert_eq!(config.keywords.len(), 6);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.json");
        std::fs::write(&path, r#"{ "keywords": ["net zero"], "cache_ttl_secs": 0 }"#).unwrap();

        let config = CollectorConfig::from_file(&path).unwrap();
        assert_eq!(config.keywords, vec!["net zero".to_string()]);
        assert_eq!(config.cache_ttl(), Duration::ZERO);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(CollectorConfig::from_file(&path).is_err());
        assert!(CollectorConfig::from_file(dir.path().join("missing.json")).is_err());
    }
}
