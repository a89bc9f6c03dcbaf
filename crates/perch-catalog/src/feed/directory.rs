//! Directory feed: a filesystem directory scanned for package files.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use perch_core::{
    name::NamePattern,
    package::PackageRef,
    resolve::{PackageResolver, Recognizer},
};
use perch_events::{CatalogEvent, EventSinkHandle, NullSink, ScanStage};
use perch_utils::{fs::list_files, wildcard::wildcard_match_ci};
use tracing::{debug, trace};

use crate::{
    error::CatalogError,
    feed::{Feed, FeedState},
    CatalogResult,
};

/// Default filename glob for directory feeds.
pub const DEFAULT_PACKAGE_GLOB: &str = "*.msi";

struct DirectoryState {
    feed: FeedState,
    /// Matching-file count observed at the last scan, for the staleness
    /// probe.
    matched_files: Option<usize>,
}

/// A feed over one directory, non-recursive.
///
/// Files matching the filename glob are classified by the recognizer; the
/// ones confirmed as package files are resolved and held. The feed counts
/// matching files on every query as a cheap staleness probe: any change in
/// count forces a rescan. A same-count swap of a different file is not
/// detected; that is a known limitation of the probe, kept for its
/// cheapness.
pub struct DirectoryFeed {
    location: String,
    path: PathBuf,
    glob: String,
    recognizer: Arc<dyn Recognizer>,
    resolver: Arc<dyn PackageResolver>,
    sink: EventSinkHandle,
    scan_lock: Mutex<()>,
    state: Mutex<DirectoryState>,
}

impl DirectoryFeed {
    pub fn new(
        path: impl Into<PathBuf>,
        recognizer: Arc<dyn Recognizer>,
        resolver: Arc<dyn PackageResolver>,
    ) -> Self {
        let path = path.into();
        Self {
            location: path.display().to_string(),
            path,
            glob: DEFAULT_PACKAGE_GLOB.to_string(),
            recognizer,
            resolver,
            sink: Arc::new(NullSink),
            scan_lock: Mutex::new(()),
            state: Mutex::new(DirectoryState {
                feed: FeedState::new(),
                matched_files: None,
            }),
        }
    }

    /// Overrides the filename glob (default `*.msi`).
    pub fn with_glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = glob.into();
        self
    }

    pub fn with_sink(mut self, sink: EventSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    fn matching_files(&self) -> CatalogResult<Vec<PathBuf>> {
        let files = list_files(&self.path).map_err(|err| CatalogError::Scan {
            location: self.location.clone(),
            source: Box::new(err),
        })?;
        Ok(files
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| wildcard_match_ci(&self.glob, &name.to_string_lossy()))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn scan(&self, candidates: Vec<PathBuf>) -> CatalogResult<()> {
        self.sink.emit(CatalogEvent::ScanProgress {
            location: self.location.clone(),
            stage: ScanStage::Classifying,
        });
        debug!(
            location = %self.location,
            candidates = candidates.len(),
            "scanning directory feed"
        );

        let mut found = Vec::new();
        for path in &candidates {
            match self.recognizer.recognize(path) {
                Ok(recognition) if recognition.is_package_file => {
                    let pkg = match self.resolver.resolve_from_file(path) {
                        Ok(pkg) => pkg,
                        Err(err) => {
                            trace!(path = %path.display(), %err, "unresolvable package file, skipping");
                            continue;
                        }
                    };
                    pkg.add_feed_location(&self.location);
                    pkg.set_local_path(path);
                    found.push(pkg);
                }
                Ok(_) => {}
                Err(err) => {
                    // Treated as "not a package"; never surfaced.
                    trace!(path = %path.display(), %err, "classification failed, skipping");
                }
            }
        }

        let package_count;
        {
            let mut state = self.state.lock()?;
            state.feed.packages.clear();
            for pkg in found {
                state.feed.insert_unique(pkg);
            }
            state.matched_files = Some(candidates.len());
            state.feed.mark_scanned();
            package_count = state.feed.packages.len();
        }

        self.sink.emit(CatalogEvent::ScanProgress {
            location: self.location.clone(),
            stage: ScanStage::Complete {
                package_count,
            },
        });
        Ok(())
    }
}

impl Feed for DirectoryFeed {
    fn location(&self) -> &str {
        &self.location
    }

    fn is_scanned(&self) -> bool {
        self.state.lock().unwrap().feed.scanned
    }

    fn is_stale(&self) -> bool {
        self.state.lock().unwrap().feed.stale
    }

    fn last_scanned(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().feed.last_scanned
    }

    fn mark_stale(&self) {
        self.state.lock().unwrap().feed.stale = true;
    }

    fn ensure_scanned(&self) -> CatalogResult<()> {
        let _guard = self.scan_lock.lock()?;

        // The listing doubles as the staleness probe, so it runs on every
        // query; classification only runs when something changed.
        let candidates = match self.matching_files() {
            Ok(candidates) => candidates,
            Err(err) => {
                // Leave the feed stale so the next query retries.
                self.state.lock()?.feed.stale = true;
                return Err(err);
            }
        };

        {
            let state = self.state.lock()?;
            // Count comparison only: a same-count swap of a different file
            // is not detected.
            if state.feed.is_current() && state.matched_files == Some(candidates.len()) {
                return Ok(());
            }
        }

        self.scan(candidates)
    }

    fn find_packages(&self, pattern: &NamePattern) -> CatalogResult<Vec<PackageRef>> {
        self.ensure_scanned()?;
        Ok(self.state.lock()?.feed.matching(pattern))
    }
}
