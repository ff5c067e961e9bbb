//! Package index search client.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::fetcher::PageFetcher;
use crate::parser::SnippetParser;
use crate::{Package, Result, SearchError};

/// Base URL of the official Go package index.
pub const OFFICIAL_INDEX_URL: &str = "https://pkg.go.dev";

/// Trait for looking up packages by keyword.
///
/// An empty list means the index had no matches; an error means the query
/// itself failed.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Searches the index for a single keyword.
    async fn search(&self, cancel: &CancellationToken, keyword: &str) -> Result<Vec<Package>>;
}

/// Searcher that scrapes the index's public search page.
pub struct IndexSearcher {
    fetcher: Arc<dyn PageFetcher>,
    parser: SnippetParser,
    search_url: Url,
}

impl IndexSearcher {
    /// Creates a searcher for the official index.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Self::with_base_url(fetcher, OFFICIAL_INDEX_URL)
    }

    /// Creates a searcher for an index hosted at `base_url`.
    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let mut search_url = base_url.clone();
        search_url
            .path_segments_mut()
            .map_err(|_| SearchError::InvalidIndexUrl(base_url.to_string()))?
            .pop_if_empty()
            .push("search");
        Ok(Self {
            fetcher,
            parser: SnippetParser::new(base_url)?,
            search_url,
        })
    }

    /// Returns the search page URL for a keyword.
    pub fn search_url(&self, keyword: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", keyword);
        url
    }
}

#[async_trait]
impl Searcher for IndexSearcher {
    async fn search(&self, cancel: &CancellationToken, keyword: &str) -> Result<Vec<Package>> {
        let url = self.search_url(keyword);

        let html = tokio::select! {
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
            html = self.fetcher.fetch(url.as_str()) => html?,
        };

        let packages = self.parser.parse_document(&html);
        debug!("Keyword {:?} matched {} packages", keyword, packages.len());
        Ok(packages)
    }
}
