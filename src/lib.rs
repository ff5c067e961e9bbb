//! # gosearch
//!
//! Command-line client library for the Go package index search page.
//!
//! Keywords are searched in parallel on a bounded worker pool, each results
//! page is parsed into [`Package`] records, duplicates are dropped by import
//! path, and the remaining packages are rendered in first-seen order:
//!
//! - Parallel keyword search with cancellation
//! - HTML snippet extraction into typed records
//! - Order-stable deduplication
//! - Compact, verbose and JSON rendering
//!
//! ## Example
//!
//! ```rust,no_run
//! use gosearch::{Search, SearchOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = SearchOptions {
//!         keywords: vec!["gin,cobra".to_string()],
//!         short: true,
//!         ..Default::default()
//!     };
//!     let search = Search::from_options(&options)?;
//!     let mut stdout = std::io::stdout();
//!     search
//!         .run(options.keywords(), CancellationToken::new(), &mut stdout)
//!         .await?;
//!     Ok(())
//! }
//! ```

mod aggregator;
mod config;
mod error;
mod package;
mod pool;
mod search;
mod searcher;

pub mod fetcher;
pub mod fetcher_http;
pub mod formatter;
pub mod parser;

pub use aggregator::Aggregator;
pub use config::{split_keywords, SearchOptions};
pub use error::{Result, SearchError};
pub use package::Package;
pub use pool::{worker_count, WorkerPool};
pub use search::Search;
pub use searcher::{IndexSearcher, Searcher, OFFICIAL_INDEX_URL};
