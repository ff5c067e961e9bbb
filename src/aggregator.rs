//! Result deduplication.

use std::collections::HashSet;

use tracing::debug;

use crate::Package;

/// Deduplicates packages by import path across result batches.
///
/// The first record seen for an import path wins; later records with the
/// same import path are dropped whatever their other fields hold. Every
/// import path seen is kept for the lifetime of the aggregator.
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
}

impl Aggregator {
    /// Creates a new aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the package if its import path has not been seen before.
    pub fn admit(&mut self, package: Package) -> Option<Package> {
        if self.seen.contains(&package.import_path) {
            debug!("Dropping duplicate package {}", package.import_path);
            return None;
        }
        self.seen.insert(package.import_path.clone());
        Some(package)
    }

    /// Filters a batch down to packages not seen before, keeping batch order.
    pub fn aggregate(&mut self, batch: Vec<Package>) -> Vec<Package> {
        batch.into_iter().filter_map(|p| self.admit(p)).collect()
    }

    /// Returns the number of unique packages seen so far.
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }
}
