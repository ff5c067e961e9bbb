//! Search orchestration.

use std::io::{self, ErrorKind, Write};
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::fetcher_http::HttpFetcher;
use crate::formatter::{formatter_for, Formatter};
use crate::{Aggregator, IndexSearcher, Result, SearchOptions, Searcher, WorkerPool};

/// Package search pipeline: parallel keyword searches, deduplication and
/// rendering.
pub struct Search {
    pool: WorkerPool,
    formatter: Box<dyn Formatter>,
}

impl Search {
    /// Creates a pipeline from a searcher and a formatter.
    pub fn new(searcher: Arc<dyn Searcher>, formatter: Box<dyn Formatter>) -> Self {
        Self {
            pool: WorkerPool::new(searcher),
            formatter,
        }
    }

    /// Builds the pipeline described by `options`: an HTTP searcher against
    /// the configured index and the selected formatter.
    pub fn from_options(options: &SearchOptions) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options.fetcher_config())?;
        let searcher = IndexSearcher::with_base_url(Arc::new(fetcher), &options.index_url)?;
        let formatter = formatter_for(options.render_mode(), options.render_config());
        Ok(Self::new(Arc::new(searcher), formatter))
    }

    /// Overrides the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = self.pool.with_workers(workers);
        self
    }

    /// Searches every keyword and writes each unique package to `out` in
    /// first-seen order.
    ///
    /// Returns the number of packages written. Keywords whose search fails
    /// contribute nothing. With no keywords nothing is searched or written.
    /// A closed output pipe ends the run early without an error.
    pub async fn run<W: Write>(
        &self,
        keywords: Vec<String>,
        cancel: CancellationToken,
        out: &mut W,
    ) -> Result<usize> {
        if keywords.is_empty() {
            return Ok(0);
        }

        let start = Instant::now();
        let keyword_count = keywords.len();
        let mut batches = self.pool.spawn(keywords, cancel);
        let mut aggregator = Aggregator::new();
        let mut written = 0;

        'batches: while let Some(batch) = batches.recv().await {
            for package in aggregator.aggregate(batch) {
                let line = writeln!(out, "{}", self.formatter.format(&package));
                if reader_gone(line)? {
                    break 'batches;
                }
                written += 1;
            }
        }
        reader_gone(out.flush())?;

        debug!(
            "Wrote {} packages for {} keywords in {}ms",
            written,
            keyword_count,
            start.elapsed().as_millis()
        );
        Ok(written)
    }
}

/// Returns `Ok(true)` when the write failed because the reader closed the
/// pipe; other write errors are propagated.
fn reader_gone(result: io::Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(false),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("Output closed, stopping: {}", e);
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{RenderConfig, ShortFormatter};
    use crate::{Package, SearchError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSearcher {
        results: HashMap<String, Vec<Package>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSearcher {
        fn new(results: Vec<(&str, Vec<Package>)>) -> Arc<Self> {
            Arc::new(Self {
                results: results
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Searcher for MockSearcher {
        async fn search(&self, _cancel: &CancellationToken, keyword: &str) -> Result<Vec<Package>> {
            self.calls.lock().unwrap().push(keyword.to_string());
            self.results
                .get(keyword)
                .cloned()
                .ok_or(SearchError::Status(404))
        }
    }

    fn short() -> Box<dyn Formatter> {
        Box::new(ShortFormatter::new(RenderConfig::new()))
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_no_keywords() {
        let searcher = MockSearcher::new(vec![]);
        let search = Search::new(searcher.clone(), short());
        let mut out = Vec::new();

        let written = search
            .run(Vec::new(), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 0);
        assert!(out.is_empty());
        assert!(searcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_single_keyword_keeps_document_order() {
        let searcher = MockSearcher::new(vec![(
            "cobra",
            vec![
                Package::new("cobra", "github.com/spf13/cobra"),
                Package::new("pflag", "github.com/spf13/pflag"),
            ],
        )]);
        let search = Search::new(searcher, short());
        let mut out = Vec::new();

        let written = search
            .run(keywords(&["cobra"]), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "cobra            github.com/spf13/cobra\npflag            github.com/spf13/pflag\n"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_deduplicates_across_keywords() {
        let searcher = MockSearcher::new(vec![
            (
                "a",
                vec![
                    Package::new("shared", "example.com/shared"),
                    Package::new("a", "example.com/a"),
                ],
            ),
            (
                "b",
                vec![
                    Package::new("shared-again", "example.com/shared"),
                    Package::new("b", "example.com/b"),
                ],
            ),
        ]);
        let search = Search::new(searcher.clone(), short()).with_workers(2);
        let mut out = Vec::new();

        let written = search
            .run(keywords(&["a", "b"]), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 3);
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches("example.com/shared").count(), 1);
        assert!(output.contains("example.com/a"));
        assert!(output.contains("example.com/b"));
        assert_eq!(searcher.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_failed_keyword_is_dropped() {
        let searcher = MockSearcher::new(vec![("ok", vec![Package::new("ok", "example.com/ok")])]);
        let search = Search::new(searcher.clone(), short());
        let mut out = Vec::new();

        let written = search
            .run(keywords(&["missing", "ok"]), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(searcher.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_cancelled_writes_nothing() {
        let searcher = MockSearcher::new(vec![("ok", vec![Package::new("ok", "example.com/ok")])]);
        let search = Search::new(searcher.clone(), short());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut out = Vec::new();

        let written = search.run(keywords(&["ok"]), cancel, &mut out).await.unwrap();

        assert_eq!(written, 0);
        assert!(searcher.calls.lock().unwrap().is_empty());
    }

    /// Accepts `capacity` lines, then fails every write with `kind`.
    struct ClosingWriter {
        lines: Vec<u8>,
        capacity: usize,
        kind: io::ErrorKind,
    }

    impl ClosingWriter {
        fn new(capacity: usize, kind: io::ErrorKind) -> Self {
            Self {
                lines: Vec::new(),
                capacity,
                kind,
            }
        }
    }

    impl Write for ClosingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let complete = self.lines.iter().filter(|&&b| b == b'\n').count();
            if complete >= self.capacity {
                return Err(io::Error::new(self.kind, "writer closed"));
            }
            self.lines.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn many_packages(count: usize) -> Vec<Package> {
        (0..count)
            .map(|i| Package::new(format!("p{}", i), format!("example.com/p{}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_run_stops_cleanly_on_broken_pipe() {
        let searcher = MockSearcher::new(vec![("many", many_packages(5))]);
        let search = Search::new(searcher, short());
        let mut out = ClosingWriter::new(1, io::ErrorKind::BrokenPipe);

        let written = search
            .run(keywords(&["many"]), CancellationToken::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            String::from_utf8(out.lines).unwrap(),
            "p0               example.com/p0\n"
        );
    }

    #[tokio::test]
    async fn test_run_propagates_other_write_errors() {
        let searcher = MockSearcher::new(vec![("many", many_packages(2))]);
        let search = Search::new(searcher, short());
        let mut out = ClosingWriter::new(0, io::ErrorKind::PermissionDenied);

        let result = search
            .run(keywords(&["many"]), CancellationToken::new(), &mut out)
            .await;

        assert!(matches!(result, Err(SearchError::Io(_))));
    }

    #[tokio::test]
    async fn test_from_options_rejects_bad_index_url() {
        let options = SearchOptions {
            index_url: "::not a url::".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Search::from_options(&options),
            Err(SearchError::UrlParse(_))
        ));
    }
}
