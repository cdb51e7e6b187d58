use nf_core::dates::parse_published;
use nf_core::{Article, Error, Result, UNKNOWN_SOURCE};
use tracing::debug;

pub mod google_news;

pub use google_news::GoogleNewsFetcher;

/// Parses a feed document into articles tagged with `keyword`.
///
/// RSS 2.0 is tried first, then Atom. A document that is neither is an error.
pub fn parse_feed(keyword: &str, bytes: &[u8]) -> Result<Vec<Article>> {
    match rss::Channel::read_from(bytes) {
        Ok(channel) => Ok(from_rss(keyword, &channel)),
        Err(rss_err) => match atom_syndication::Feed::read_from(bytes) {
            Ok(feed) => Ok(from_atom(keyword, &feed)),
            Err(atom_err) => Err(Error::Feed(format!(
                "Not an RSS or Atom document (rss: {}, atom: {})",
                rss_err, atom_err
            ))),
        },
    }
}

fn from_rss(keyword: &str, channel: &rss::Channel) -> Vec<Article> {
    channel
        .items()
        .iter()
        .map(|item| {
            utils::normalize_entry(
                keyword,
                utils::RawEntry {
                    title: item.title(),
                    link: item.link(),
                    published: item.pub_date(),
                    source: item.source().and_then(|s| s.title()),
                    description: item.description(),
                },
            )
        })
        .collect()
}

fn from_atom(keyword: &str, feed: &atom_syndication::Feed) -> Vec<Article> {
    feed.entries()
        .iter()
        .map(|entry| {
            let published = entry
                .published()
                .unwrap_or_else(|| entry.updated())
                .to_rfc3339();
            utils::normalize_entry(
                keyword,
                utils::RawEntry {
                    title: Some(entry.title().as_str()),
                    link: entry.links().first().map(|l| l.href()),
                    published: Some(published.as_str()),
                    source: entry.source().map(|s| s.title().as_str()),
                    description: entry.summary().map(|s| s.as_str()),
                },
            )
        })
        .collect()
}

/// Common utilities for fetchers
pub(crate) mod utils {
    use super::*;

    /// Entry fields as found in the document, before defaults are applied.
    pub struct RawEntry<'a> {
        pub title: Option<&'a str>,
        pub link: Option<&'a str>,
        pub published: Option<&'a str>,
        pub source: Option<&'a str>,
        pub description: Option<&'a str>,
    }

    pub fn normalize_entry(keyword: &str, entry: RawEntry<'_>) -> Article {
        let published_raw = entry.published.unwrap_or_default().to_string();
        let published_at = parse_published(&published_raw);
        if published_at.is_none() && !published_raw.is_empty() {
            debug!("Unparseable publication date {:?} for {:?}", published_raw, entry.link);
        }

        let source = entry
            .source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE);

        Article {
            keyword: keyword.to_string(),
            title: entry.title.unwrap_or_default().to_string(),
            url: entry.link.unwrap_or_default().to_string(),
            published_raw,
            published_at,
            source: source.to_string(),
            description: entry.description.unwrap_or_default().to_string(),
        }
    }
}
