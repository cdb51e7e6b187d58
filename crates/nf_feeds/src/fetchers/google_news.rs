use async_trait::async_trait;
use nf_core::{Article, Error, FeedFetcher, Result};
use reqwest::Client;
use std::fmt;
use url::Url;

use crate::config::{CollectorConfig, FeedLocale};

/// Google News search RSS, one query per keyword.
pub struct GoogleNewsFetcher {
    client: Client,
    endpoint: Url,
    locale: FeedLocale,
}

impl GoogleNewsFetcher {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            locale: config.locale.clone(),
        })
    }

    /// Query URL for `keyword`; the keyword is form-encoded (spaces become `+`).
    pub fn search_url(&self, keyword: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("hl", &self.locale.hl)
            .append_pair("gl", &self.locale.gl)
            .append_pair("ceid", &self.locale.ceid);
        url
    }
}

impl fmt::Debug for GoogleNewsFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleNewsFetcher")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("locale", &self.locale)
            .finish()
    }
}

#[async_trait]
impl FeedFetcher for GoogleNewsFetcher {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>> {
        let url = self.search_url(keyword);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Feed(format!("{} returned HTTP {}", url, status)));
        }

        let body = response.bytes().await?;
        super::parse_feed(keyword, &body)
    }
}
