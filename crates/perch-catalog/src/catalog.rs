//! The catalog: the composition point over a set of feeds.

use std::{collections::BTreeSet, sync::Arc};

use perch_core::{
    name::{CanonicalName, NamePattern},
    package::PackageRef,
};
use perch_query::Query;
use tracing::debug;

use crate::{feed::Feed, CatalogResult};

/// A caller-owned aggregation of feeds.
///
/// The catalog holds no hidden global state: the owner constructs the
/// feeds it wants (typically one per source type, alive for the process)
/// and registers them here. Queries fan out to every feed and merge by
/// package identity; since the registry hands out one instance per
/// identity, the merged handles already carry the union of their feed
/// locations.
pub struct Catalog {
    feeds: Vec<Arc<dyn Feed>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            feeds: Vec::new(),
        }
    }

    pub fn add_feed(&mut self, feed: Arc<dyn Feed>) {
        self.feeds.push(feed);
    }

    pub fn feeds(&self) -> &[Arc<dyn Feed>] {
        &self.feeds
    }

    /// All packages matching `pattern` across every feed, deduplicated by
    /// identity.
    ///
    /// Every feed is brought up to date first; a feed that cannot scan
    /// fails the whole query (and stays stale for the retry).
    pub fn find_packages(&self, pattern: &NamePattern) -> CatalogResult<Vec<PackageRef>> {
        debug!(pattern = %pattern, feeds = self.feeds.len(), "searching catalog");

        let mut merged: Vec<PackageRef> = Vec::new();
        let mut known: BTreeSet<CanonicalName> = BTreeSet::new();
        for feed in &self.feeds {
            for pkg in feed.find_packages(pattern)? {
                if known.insert(pkg.canonical_name().clone()) {
                    merged.push(pkg);
                }
            }
        }

        Ok(merged)
    }

    /// Matches `pattern`, then applies a richer filter/sort query to the
    /// merged result.
    pub fn search(
        &self,
        pattern: &NamePattern,
        query: &Query<PackageRef>,
    ) -> CatalogResult<Vec<PackageRef>> {
        let matches = self.find_packages(pattern)?;
        Ok(query.apply(&matches)?)
    }

    /// Marks every feed stale, forcing rescans on the next query.
    pub fn mark_all_stale(&self) {
        for feed in &self.feeds {
            feed.mark_stale();
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
