//! Per-invocation options.

use std::collections::HashSet;

use crate::fetcher_http::HttpFetcherConfig;
use crate::formatter::{Field, RenderConfig, RenderMode};
use crate::searcher::OFFICIAL_INDEX_URL;

/// Options for one search run, as collected from the command line.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Raw keyword arguments; each may hold several comma-separated keywords.
    pub keywords: Vec<String>,
    /// Render values without field titles.
    pub omit_title: bool,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Render each package on a single line.
    pub short: bool,
    /// Render each package as a JSON object.
    pub json: bool,
    /// Base URL of the package index.
    pub index_url: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            omit_title: false,
            insecure: false,
            short: false,
            json: false,
            index_url: OFFICIAL_INDEX_URL.to_string(),
        }
    }
}

impl SearchOptions {
    /// Returns the distinct atomic keywords, in order of first appearance.
    pub fn keywords(&self) -> Vec<String> {
        split_keywords(&self.keywords)
    }

    /// Returns the output style. JSON takes precedence over short output.
    pub fn render_mode(&self) -> RenderMode {
        if self.json {
            RenderMode::Json
        } else if self.short {
            RenderMode::Compact
        } else {
            RenderMode::Verbose
        }
    }

    /// Returns the render configuration: every field, empty values skipped.
    pub fn render_config(&self) -> RenderConfig {
        let config = RenderConfig::new().with_fields(Field::ALL).omit_empty();
        if self.omit_title {
            config.omit_title()
        } else {
            config
        }
    }

    /// Returns the HTTP transport settings.
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            insecure: self.insecure,
            ..Default::default()
        }
    }
}

/// Splits raw arguments on `,` into distinct, non-empty keywords.
pub fn split_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.to_string()))
        .map(str::to_string)
        .collect()
}
