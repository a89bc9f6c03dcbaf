//! Session feed: in-memory additions with process-session lifetime.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use perch_core::{name::NamePattern, package::PackageRef};
use perch_events::{CatalogEvent, EventSinkHandle, NullSink};

use crate::{
    feed::{Feed, FeedState},
    CatalogResult,
};

/// Well-known pseudo-URI of the session feed.
pub const SESSION_FEED_LOCATION: &str = "session://";

/// An always-fresh, in-memory feed.
///
/// Packages added during a session (for example, freshly downloaded ones)
/// live here for the lifetime of the owning context. There is nothing to
/// scan and nothing ever goes stale; additions notify the change listener
/// so a watching client can react.
pub struct SessionFeed {
    location: String,
    sink: EventSinkHandle,
    state: Mutex<FeedState>,
}

impl SessionFeed {
    pub fn new() -> Self {
        let mut state = FeedState::new();
        state.mark_scanned();
        Self {
            location: SESSION_FEED_LOCATION.to_string(),
            sink: Arc::new(NullSink),
            state: Mutex::new(state),
        }
    }

    pub fn with_sink(mut self, sink: EventSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    /// Adds a package unless one with the same identity is present.
    ///
    /// Returns whether it was inserted; an actual insertion notifies the
    /// change listener.
    pub fn add(&self, pkg: &PackageRef) -> CatalogResult<bool> {
        pkg.add_feed_location(&self.location);
        let inserted = self.state.lock()?.insert_unique(pkg.clone());
        if inserted {
            self.sink.emit(CatalogEvent::PackageAdded {
                canonical_name: pkg.canonical_name().to_string(),
                location: self.location.clone(),
            });
        }
        Ok(inserted)
    }
}

impl Default for SessionFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Feed for SessionFeed {
    fn location(&self) -> &str {
        &self.location
    }

    fn is_scanned(&self) -> bool {
        true
    }

    fn is_stale(&self) -> bool {
        false
    }

    fn last_scanned(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().last_scanned
    }

    /// Session feeds are never stale; this is a no-op.
    fn mark_stale(&self) {}

    fn ensure_scanned(&self) -> CatalogResult<()> {
        Ok(())
    }

    fn find_packages(&self, pattern: &NamePattern) -> CatalogResult<Vec<PackageRef>> {
        Ok(self.state.lock()?.matching(pattern))
    }
}
