//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::fetcher::PageFetcher;
use crate::{Result, SearchError};

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("gosearch/", env!("CARGO_PKG_VERSION"));

/// Transport settings for [`HttpFetcher`].
///
/// Proxies are taken from the environment (`HTTP_PROXY`, `HTTPS_PROXY`,
/// `NO_PROXY`).
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// A page fetcher that uses plain HTTP GET requests via reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` from the given transport settings.
    pub fn new(config: &HttpFetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.insecure)
            .build()?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }
        let html = response.text().await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_config_default() {
        let config = HttpFetcherConfig::default();
        assert!(!config.insecure);
        assert!(config.user_agent.starts_with("gosearch/"));
    }

    #[test]
    fn test_http_fetcher_new() {
        assert!(HttpFetcher::new(&HttpFetcherConfig::default()).is_ok());
    }

    #[test]
    fn test_http_fetcher_new_insecure() {
        let config = HttpFetcherConfig {
            insecure: true,
            ..Default::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_http_fetcher_with_client() {
        let client = Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap();
        let _fetcher = HttpFetcher::with_client(client);
    }
}
