//! Package feeds.
//!
//! A feed owns a lazily-populated, staleness-tracked list of packages from
//! one source. Scanning follows a common state machine: `Unscanned →
//! Scanning → Scanned`, with `Scanned → Scanning` again once the feed
//! observes it is stale. Each feed serializes its scans behind a dedicated
//! lock: a scan requested while another is in flight blocks until that scan
//! completes, then proceeds without rescanning.

pub mod directory;
pub mod installed;
pub mod session;

use chrono::{DateTime, Utc};
use perch_core::{
    name::{CanonicalName, NamePattern},
    package::PackageRef,
};

use crate::CatalogResult;

/// A source of packages.
///
/// `find_packages` is synchronous from the caller's point of view: it
/// ensures the feed is scanned (waiting out any in-flight scan) and only
/// then filters the fully-settled package list.
pub trait Feed: Send + Sync {
    /// The feed's source URI, fixed at construction.
    fn location(&self) -> &str;

    /// Whether an initial scan has completed.
    fn is_scanned(&self) -> bool;

    /// Whether the package list may no longer reflect the source.
    fn is_stale(&self) -> bool;

    fn last_scanned(&self) -> Option<DateTime<Utc>>;

    /// Forces a rescan on the next query.
    fn mark_stale(&self);

    /// Scans if unscanned or stale; a no-op otherwise.
    fn ensure_scanned(&self) -> CatalogResult<()>;

    /// All held packages whose canonical name matches `pattern`.
    fn find_packages(&self, pattern: &NamePattern) -> CatalogResult<Vec<PackageRef>>;
}

/// Mutable feed state, guarded by each feed's own mutex.
pub(crate) struct FeedState {
    pub scanned: bool,
    pub stale: bool,
    pub last_scanned: Option<DateTime<Utc>>,
    pub packages: Vec<PackageRef>,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            scanned: false,
            stale: false,
            last_scanned: None,
            packages: Vec::new(),
        }
    }

    pub fn is_current(&self) -> bool {
        self.scanned && !self.stale
    }

    pub fn mark_scanned(&mut self) {
        self.scanned = true;
        self.stale = false;
        self.last_scanned = Some(Utc::now());
    }

    /// Appends `pkg` unless a package with the same identity is already
    /// present. Returns whether it was inserted.
    pub fn insert_unique(&mut self, pkg: PackageRef) -> bool {
        let known = self
            .packages
            .iter()
            .any(|p| p.canonical_name() == pkg.canonical_name());
        if !known {
            self.packages.push(pkg);
        }
        !known
    }

    /// Removes the package with the given identity, if present.
    pub fn remove(&mut self, name: &CanonicalName) -> bool {
        let before = self.packages.len();
        self.packages.retain(|p| p.canonical_name() != name);
        self.packages.len() != before
    }

    pub fn matching(&self, pattern: &NamePattern) -> Vec<PackageRef> {
        self.packages
            .iter()
            .filter(|p| pattern.matches(p.canonical_name()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::package;

    #[test]
    fn test_insert_unique_by_identity() {
        let mut state = FeedState::new();
        let a = package("vlc", "3.0", false);
        let duplicate = package("vlc", "3.0", false);
        let b = package("git", "2.40", false);

        assert!(state.insert_unique(a));
        assert!(!state.insert_unique(duplicate));
        assert!(state.insert_unique(b));
        assert_eq!(state.packages.len(), 2);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut state = FeedState::new();
        let a = package("vlc", "3.0", false);
        let name = a.canonical_name().clone();
        state.insert_unique(a);

        assert!(state.remove(&name));
        assert!(!state.remove(&name));
        assert!(state.packages.is_empty());
    }

    #[test]
    fn test_matching_filters_by_pattern() {
        let mut state = FeedState::new();
        state.insert_unique(package("firefox", "2.0", false));
        state.insert_unique(package("filezilla", "1.0", false));
        state.insert_unique(package("git", "2.40", false));

        let pattern = NamePattern::parse("fi*").unwrap();
        let matches = state.matching(&pattern);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_mark_scanned_clears_stale() {
        let mut state = FeedState::new();
        state.stale = true;
        state.mark_scanned();
        assert!(state.is_current());
        assert!(state.last_scanned.is_some());
    }
}
