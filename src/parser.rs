//! Extraction of package records from the index's search result markup.
//!
//! The index renders each result as a `.SearchSnippet` element inside a
//! `.SearchResults` container:
//!
//! ```html
//! <div class="SearchSnippet">
//!   <div class="SearchSnippet-headerContainer">
//!     <h2><a href="/github.com/spf13/cobra">cobra
//!       <span>(github.com/spf13/cobra)</span></a></h2>
//!   </div>
//!   <p class="SearchSnippet-synopsis">Package cobra is a commander ...</p>
//!   <div class="SearchSnippet-infoLabel">
//!     <a>Imported by <strong>40,110</strong></a>
//!     <span><strong>v1.8.0</strong> published on <strong>Nov 1, 2023</strong></span>
//!     <span class="snippet-license"><a>Apache-2.0</a></span>
//!   </div>
//! </div>
//! ```

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::{Package, Result, SearchError};

const RESULTS_SELECTOR: &str = ".SearchResults .SearchSnippet";
const HEADER_SELECTOR: &str = ".SearchSnippet-headerContainer";
const SYNOPSIS_SELECTOR: &str = ".SearchSnippet-synopsis";
const INFO_SELECTOR: &str = ".SearchSnippet-infoLabel";
const LICENSE_SELECTOR: &str = ".snippet-license";

/// Parses search snippets into [`Package`] records.
///
/// Selectors are compiled once and reused for every snippet.
#[derive(Debug, Clone)]
pub struct SnippetParser {
    base_url: Url,
    results: Selector,
    header: Selector,
    anchor: Selector,
    synopsis: Selector,
    info: Selector,
    license: Selector,
    strong: Selector,
}

impl SnippetParser {
    /// Creates a parser that prefixes snippet links with `base_url`.
    pub fn new(base_url: Url) -> Result<Self> {
        Ok(Self {
            base_url,
            results: selector(RESULTS_SELECTOR)?,
            header: selector(HEADER_SELECTOR)?,
            anchor: selector("a")?,
            synopsis: selector(SYNOPSIS_SELECTOR)?,
            info: selector(INFO_SELECTOR)?,
            license: selector(LICENSE_SELECTOR)?,
            strong: selector("strong")?,
        })
    }

    /// Returns the base URL used for home site links.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parses every snippet of a search results page, in document order.
    ///
    /// Snippets whose header cannot be split into name and import path are
    /// skipped. A page without results yields an empty list.
    pub fn parse_document(&self, html: &str) -> Vec<Package> {
        let document = Html::parse_document(html);
        let mut packages = Vec::new();

        for snippet in document.select(&self.results) {
            match self.parse_snippet(snippet) {
                Ok(package) => packages.push(package),
                Err(e) => debug!("Skipping snippet: {}", e),
            }
        }

        packages
    }

    /// Parses a standalone markup fragment holding a single snippet.
    pub fn parse_fragment(&self, html: &str) -> Result<Package> {
        let fragment = Html::parse_fragment(html);
        self.parse_snippet(fragment.root_element())
    }

    /// Converts one snippet element into a package record.
    ///
    /// Missing optional regions leave the matching fields empty. Only a
    /// header without a separating space is an error.
    pub fn parse_snippet(&self, snippet: ElementRef<'_>) -> Result<Package> {
        let mut package = Package::default();

        let header = snippet.select(&self.header).next();
        let header_text = header.map(element_text).unwrap_or_default();
        let (name, import_path) = split_header(&header_text)?;
        package.name = name;
        package.import_path = import_path;

        let href = header
            .and_then(|h| h.select(&self.anchor).next())
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = href {
            package.home_site = self.home_site(href);
        }

        package.synopsis = selected_text(snippet, &self.synopsis).trim().to_string();

        if let Some(info) = snippet.select(&self.info).next() {
            package.license = selected_text(info, &self.license).trim().to_string();

            // <strong> children are positional: imported-by, version, published.
            let mut values = info.select(&self.strong).map(first_text);
            let slots = [
                &mut package.imported_by,
                &mut package.version,
                &mut package.published,
            ];
            for slot in slots {
                match values.next() {
                    Some(value) => *slot = value,
                    None => break,
                }
            }
        }

        Ok(package)
    }

    /// Appends the link to the base URL as-is, keeping any base path.
    fn home_site(&self, href: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), href)
    }
}

/// Splits a header into name and import path.
///
/// Newlines and spaces are removed, `(` becomes the separator and `)` is
/// dropped, so `"cobra\n  (github.com/spf13/cobra)"` yields
/// `("cobra", "github.com/spf13/cobra")`.
pub fn split_header(header: &str) -> Result<(String, String)> {
    let normalized: String = header
        .chars()
        .filter_map(|c| match c {
            '\n' | ' ' | ')' => None,
            '(' => Some(' '),
            c => Some(c),
        })
        .collect();

    match normalized.split_once(' ') {
        Some((name, import_path)) => Ok((name.to_string(), import_path.to_string())),
        None => Err(SearchError::MalformedHeader(normalized)),
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector {}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn selected_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).flat_map(|e| e.text()).collect()
}

/// Text of the element's first child node, trimmed.
fn first_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .next()
        .and_then(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .unwrap_or_default()
}
