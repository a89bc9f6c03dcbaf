//! Installed feed: packages the operating system reports as installed.

use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use perch_core::{
    name::{CanonicalName, NamePattern},
    package::PackageRef,
    resolve::{InstalledSource, PackageResolver},
};
use perch_events::{CatalogEvent, EventSinkHandle, NullSink, ScanStage};
use perch_utils::{fs::list_files, hash::file_fingerprint};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, trace, warn};

use crate::{
    error::CatalogError,
    feed::{Feed, FeedState},
    seen::SeenCache,
    CatalogResult,
};

/// Well-known pseudo-URI of the installed feed.
pub const INSTALLED_FEED_LOCATION: &str = "installed://";

/// The feed of OS-installed packages.
///
/// A scan unions two file sets: the OS-reported installed package files and
/// a secondary cache directory of package files. Each file not already in
/// the seen-item cache is resolved through the registry; packages reported
/// installed join the feed, everything else has its fingerprint recorded so
/// it is never probed again. Resolution fans out across available cores;
/// the caller still observes a single synchronous scan.
///
/// Install and remove hooks keep the feed consistent without a rescan, so
/// the install/uninstall collaborator never forces a full re-enumeration.
pub struct InstalledFeed {
    location: String,
    source: Arc<dyn InstalledSource>,
    resolver: Arc<dyn PackageResolver>,
    cache_dir: PathBuf,
    seen: Arc<Mutex<SeenCache>>,
    sink: EventSinkHandle,
    scan_lock: Mutex<()>,
    state: Mutex<FeedState>,
}

impl InstalledFeed {
    pub fn new(
        source: Arc<dyn InstalledSource>,
        resolver: Arc<dyn PackageResolver>,
        cache_dir: impl Into<PathBuf>,
        seen: Arc<Mutex<SeenCache>>,
    ) -> Self {
        Self {
            location: INSTALLED_FEED_LOCATION.to_string(),
            source,
            resolver,
            cache_dir: cache_dir.into(),
            seen,
            sink: Arc::new(NullSink),
            scan_lock: Mutex::new(()),
            state: Mutex::new(FeedState::new()),
        }
    }

    pub fn with_sink(mut self, sink: EventSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    /// Tells the feed a package was just installed, without a rescan.
    pub fn package_installed(&self, pkg: &PackageRef) -> CatalogResult<()> {
        pkg.set_installed(true);
        pkg.add_feed_location(&self.location);
        let inserted = self.state.lock()?.insert_unique(pkg.clone());
        if inserted {
            self.sink.emit(CatalogEvent::PackageInstalled {
                canonical_name: pkg.canonical_name().to_string(),
            });
        }
        Ok(())
    }

    /// Tells the feed a package was just removed, without a rescan.
    pub fn package_removed(&self, name: &CanonicalName) -> CatalogResult<()> {
        let removed = self.state.lock()?.remove(name);
        if removed {
            self.sink.emit(CatalogEvent::PackageRemoved {
                canonical_name: name.to_string(),
            });
        }
        Ok(())
    }

    fn gather_candidates(&self) -> CatalogResult<BTreeSet<PathBuf>> {
        let mut files: BTreeSet<PathBuf> = self
            .source
            .installed_package_files()
            .map_err(|err| CatalogError::Scan {
                location: self.location.clone(),
                source: Box::new(err),
            })?
            .into_iter()
            .collect();

        if self.cache_dir.is_dir() {
            let cached = list_files(&self.cache_dir).map_err(|err| CatalogError::Scan {
                location: self.location.clone(),
                source: Box::new(err),
            })?;
            files.extend(cached);
        } else {
            trace!(path = %self.cache_dir.display(), "no package cache directory");
        }

        Ok(files)
    }

    fn scan(&self) -> CatalogResult<()> {
        self.sink.emit(CatalogEvent::ScanProgress {
            location: self.location.clone(),
            stage: ScanStage::Enumerating,
        });

        let files = match self.gather_candidates() {
            Ok(files) => files,
            Err(err) => {
                // Leave the feed stale so the next query retries.
                self.state.lock()?.stale = true;
                return Err(err);
            }
        };

        // Files already rejected keep their cache entry and are skipped;
        // files that cannot be fingerprinted are skipped for this scan only.
        let fresh: Vec<(PathBuf, String)> = {
            let seen = self.seen.lock()?;
            files
                .into_iter()
                .filter_map(|path| {
                    match file_fingerprint(&path) {
                        Ok(fingerprint) if seen.contains(&fingerprint) => None,
                        Ok(fingerprint) => Some((path, fingerprint)),
                        Err(err) => {
                            trace!(path = %path.display(), %err, "cannot fingerprint, skipping");
                            None
                        }
                    }
                })
                .collect()
        };

        self.sink.emit(CatalogEvent::ScanProgress {
            location: self.location.clone(),
            stage: ScanStage::Classifying,
        });
        debug!(
            location = %self.location,
            candidates = fresh.len(),
            "scanning installed feed"
        );

        // Per-file outcomes are independent; only the shared appends are
        // synchronized.
        let found: Mutex<Vec<PackageRef>> = Mutex::new(Vec::new());
        let rejected: Mutex<Vec<String>> = Mutex::new(Vec::new());
        fresh.into_par_iter().for_each(|(path, fingerprint)| {
            match self.resolver.resolve_from_file(&path) {
                Ok(pkg) if pkg.is_installed() => {
                    pkg.add_feed_location(&self.location);
                    pkg.set_local_path(&path);
                    found.lock().unwrap().push(pkg);
                }
                Ok(_) => {
                    rejected.lock().unwrap().push(fingerprint);
                }
                Err(err) => {
                    trace!(path = %path.display(), %err, "unresolvable, treating as non-package");
                    rejected.lock().unwrap().push(fingerprint);
                }
            }
        });

        {
            let mut seen = self.seen.lock()?;
            for fingerprint in rejected.into_inner()? {
                seen.add(fingerprint);
            }
            // Losing the cache only costs re-probing; not fatal.
            if let Err(err) = seen.save() {
                warn!(%err, "failed to persist seen-item cache");
            }
        }

        let package_count;
        {
            let mut state = self.state.lock()?;
            for pkg in found.into_inner()? {
                state.insert_unique(pkg);
            }
            state.mark_scanned();
            package_count = state.packages.len();
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

impl Feed for InstalledFeed {
    fn location(&self) -> &str {
        &self.location
    }

    fn is_scanned(&self) -> bool {
        self.state.lock().unwrap().scanned
    }

    fn is_stale(&self) -> bool {
        self.state.lock().unwrap().stale
    }

    fn last_scanned(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().last_scanned
    }

    fn mark_stale(&self) {
        self.state.lock().unwrap().stale = true;
    }

    fn ensure_scanned(&self) -> CatalogResult<()> {
        let _guard = self.scan_lock.lock()?;

        if self.state.lock()?.is_current() {
            return Ok(());
        }

        self.scan()
    }

    fn find_packages(&self, pattern: &NamePattern) -> CatalogResult<Vec<PackageRef>> {
        self.ensure_scanned()?;
        Ok(self.state.lock()?.matching(pattern))
    }
}
