//! Bounded worker pool that runs keyword searches in parallel.
//!
//! Keywords are fed through a bounded work channel to a fixed set of
//! workers. Each successful search emits one batch on the results channel;
//! failed searches emit nothing. A supervising task joins every worker
//! before it releases the last results sender, so the consumer sees the
//! channel close only after all batches have been sent.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{Package, Searcher};

type WorkQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Returns the number of workers for `keywords` searches:
/// `max(1, min(available parallelism, keywords))`.
pub fn worker_count(keywords: usize) -> usize {
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    parallelism.min(keywords).max(1)
}

/// Runs searches for a set of keywords on a fixed number of workers.
pub struct WorkerPool {
    searcher: Arc<dyn Searcher>,
    workers: Option<usize>,
}

impl WorkerPool {
    /// Creates a pool sized by [`worker_count`].
    pub fn new(searcher: Arc<dyn Searcher>) -> Self {
        Self {
            searcher,
            workers: None,
        }
    }

    /// Overrides the pool size. The effective size is still clamped to
    /// `1..=keywords`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Returns the number of workers that would run for `keywords` searches.
    pub fn size_for(&self, keywords: usize) -> usize {
        match self.workers {
            Some(workers) => workers.min(keywords).max(1),
            None => worker_count(keywords),
        }
    }

    /// Starts searching every keyword and returns the stream of result batches.
    ///
    /// Each keyword is searched at most once. The receiver yields batches in
    /// completion order and closes once every worker has exited. Once
    /// `cancel` fires no worker starts another search.
    pub fn spawn(
        &self,
        keywords: Vec<String>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<Vec<Package>> {
        let size = self.size_for(keywords.len());
        let (work_tx, work_rx) = mpsc::channel::<String>(size);
        let (results_tx, results_rx) = mpsc::channel::<Vec<Package>>(size);
        let work: WorkQueue = Arc::new(Mutex::new(work_rx));

        debug!("Starting {} workers for {} keywords", size, keywords.len());

        let feeder_cancel = cancel.clone();
        tokio::spawn(async move {
            for keyword in keywords {
                tokio::select! {
                    biased;
                    _ = feeder_cancel.cancelled() => break,
                    sent = work_tx.send(keyword) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut workers = JoinSet::new();
        for id in 0..size {
            workers.spawn(run_worker(
                id,
                Arc::clone(&self.searcher),
                Arc::clone(&work),
                results_tx.clone(),
                cancel.clone(),
            ));
        }

        tokio::spawn(async move {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    warn!("Search worker failed: {}", e);
                }
            }
            drop(results_tx);
            debug!("All workers finished");
        });

        results_rx
    }
}

async fn next_keyword(work: &WorkQueue) -> Option<String> {
    work.lock().await.recv().await
}

async fn run_worker(
    id: usize,
    searcher: Arc<dyn Searcher>,
    work: WorkQueue,
    results: mpsc::Sender<Vec<Package>>,
    cancel: CancellationToken,
) {
    loop {
        let keyword = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            keyword = next_keyword(&work) => keyword,
        };
        let Some(keyword) = keyword else { break };
        if cancel.is_cancelled() {
            break;
        }

        match searcher.search(&cancel, &keyword).await {
            Ok(packages) => {
                debug!("Worker {} found {} packages for {:?}", id, packages.len(), keyword);
                if results.send(packages).await.is_err() {
                    break;
                }
            }
            Err(e) => debug!("Worker {} dropped keyword {:?}: {}", id, keyword, e),
        }
    }
    debug!("Worker {} exiting", id);
}
