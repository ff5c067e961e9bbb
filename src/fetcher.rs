//! Page fetcher abstraction for retrieving HTML content.

use async_trait::async_trait;

use crate::Result;

/// Trait for fetching the HTML content of a URL.
///
/// All transport configuration (proxy, TLS verification, user-agent) is set
/// at construction time; `fetch` is a simple URL-in, HTML-out interface.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML content of the given URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or(crate::SearchError::Status(404))
        }
    }

    #[tokio::test]
    async fn test_fetcher_trait_object() {
        let mut pages = HashMap::new();
        pages.insert("https://index.test/".to_string(), "<html></html>".to_string());
        let fetcher: Box<dyn PageFetcher> = Box::new(StaticFetcher { pages });

        assert_eq!(fetcher.fetch("https://index.test/").await.unwrap(), "<html></html>");
        assert!(fetcher.fetch("https://index.test/missing").await.is_err());
    }
}
