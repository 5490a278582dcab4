//! Resource-matching search across the access package catalog.
//!
//! The catalog is listed once with a minimal projection, then every package is
//! fetched with its resource role scopes expanded. Detail fetches run through
//! an ordered, bounded pipeline: a failing package is logged and skipped
//! without affecting its siblings, and all in-flight calls live inside the
//! request future so dropping the request abandons them.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use scopefinder_core::AppResult;
use scopefinder_domain::{AccessPackage, MatchRecord, SearchCriterion};
use tracing::{debug, info, warn};

use crate::directory_ports::DirectoryClientFactory;

/// Default number of concurrent package detail fetches.
pub const DEFAULT_SEARCH_CONCURRENCY: usize = 4;

/// One access package whose detail fetch failed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageScanFailure {
    /// Identifier of the skipped access package.
    pub access_package_id: String,
    /// Error reported for the detail fetch.
    pub reason: String,
}

/// Result of a search: the echoed criterion, matches, and skipped packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Criterion the search ran with.
    pub criterion: SearchCriterion,
    /// Matches in catalog order, then scope order.
    pub records: Vec<MatchRecord>,
    /// Packages omitted because their detail fetch failed.
    pub partial_failures: Vec<PackageScanFailure>,
}

/// Application service that finds access packages referencing a resource.
#[derive(Clone)]
pub struct AccessPackageSearchService {
    directory_factory: Arc<dyn DirectoryClientFactory>,
    concurrency: usize,
}

impl AccessPackageSearchService {
    /// Creates a search service. `concurrency` is clamped to at least one.
    #[must_use]
    pub fn new(directory_factory: Arc<dyn DirectoryClientFactory>, concurrency: usize) -> Self {
        Self {
            directory_factory,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns the configured detail fetch parallelism.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scans all access packages for resource role scopes matching `criterion`.
    ///
    /// Fails only when the directory cannot be reached or the catalog listing
    /// fails. Per-package failures are reported in the outcome.
    pub async fn search(&self, criterion: SearchCriterion) -> AppResult<SearchOutcome> {
        let directory = self.directory_factory.connect().await?;
        let catalog = directory.list_access_packages().await?;

        debug!(
            search_type = %criterion.search_type(),
            search_value = %criterion.search_value(),
            package_count = catalog.len(),
            concurrency = self.concurrency,
            "scanning access package catalog"
        );

        let scans: Vec<(String, AppResult<AccessPackage>)> = stream::iter(catalog)
            .map(|summary| {
                let directory = directory.clone();
                async move {
                    let result = directory.get_access_package(summary.id.as_str()).await;
                    (summary.id, result)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::new();
        let mut partial_failures = Vec::new();
        for (access_package_id, scan) in scans {
            match scan {
                Ok(access_package) => {
                    records.extend(criterion.match_access_package(&access_package));
                }
                Err(error) => {
                    warn!(
                        access_package_id = %access_package_id,
                        error = %error,
                        "skipping access package after detail fetch failure"
                    );
                    partial_failures.push(PackageScanFailure {
                        access_package_id,
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            search_type = %criterion.search_type(),
            match_count = records.len(),
            failed_packages = partial_failures.len(),
            "access package search completed"
        );

        Ok(SearchOutcome {
            criterion,
            records,
            partial_failures,
        })
    }
}
