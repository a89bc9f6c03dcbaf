//! The seen-item cache.
//!
//! A durable set of fingerprints of files that were already probed and
//! confirmed NOT to be packages, consulted before re-probing. Positive
//! results are never cached: a package file can be reinstalled or change
//! meaning, so only rejections are safe to remember. The set grows
//! monotonically; callers may truncate the backing file to reset it.
//!
//! The cache is not internally synchronized. The installed feed, its only
//! concurrent consumer today, wraps it in an `Arc<Mutex<_>>`; the contract
//! does not assume exclusivity.

use std::{collections::BTreeSet, fs, path::PathBuf};

use tracing::{trace, warn};

use perch_utils::fs::ensure_dir_exists;

use crate::{error::CatalogError, CatalogResult};

pub struct SeenCache {
    path: PathBuf,
    entries: BTreeSet<String>,
    dirty: bool,
}

impl SeenCache {
    /// Loads the cache from `path`.
    ///
    /// A missing file yields an empty cache; an unreadable or corrupt file
    /// yields an empty cache with a warning. Either way a rebuilt cache only
    /// costs re-probing, so load never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                match serde_json::from_str::<BTreeSet<String>>(&content) {
                    Ok(entries) => entries,
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            %err,
                            "seen-item cache is corrupt, starting empty"
                        );
                        BTreeSet::new()
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "no seen-item cache yet");
                BTreeSet::new()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    %err,
                    "seen-item cache is unreadable, starting empty"
                );
                BTreeSet::new()
            }
        };

        Self {
            path,
            entries,
            dirty: false,
        }
    }

    /// Whether `key` was already probed and rejected.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Records a rejected fingerprint. Returns `false` if already present.
    pub fn add(&mut self, key: impl Into<String>) -> bool {
        let inserted = self.entries.insert(key.into());
        self.dirty |= inserted;
        inserted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flushes the cache to disk if it changed since the last save.
    ///
    /// Failures are surfaced but callers treat them as non-fatal: losing
    /// the cache only means re-probing files on a later scan.
    pub fn save(&mut self) -> CatalogResult<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            ensure_dir_exists(parent).map_err(|err| CatalogError::CachePersist {
                path: self.path.display().to_string(),
                source: std::io::Error::other(err),
            })?;
        }

        let content = serde_json::to_string(&self.entries)?;
        fs::write(&self.path, content).map_err(|err| CatalogError::CachePersist {
            path: self.path.display().to_string(),
            source: err,
        })?;
        self.dirty = false;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let cache = SeenCache::load(dir.path().join("seen.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_add_and_contains() {
        let dir = tempdir().unwrap();
        let mut cache = SeenCache::load(dir.path().join("seen.json"));

        assert!(cache.add("fingerprint-a"));
        assert!(!cache.add("fingerprint-a"));
        assert!(cache.contains("fingerprint-a"));
        assert!(!cache.contains("fingerprint-b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache").join("seen.json");

        let mut cache = SeenCache::load(&path);
        cache.add("fingerprint-a");
        cache.add("fingerprint-b");
        cache.save().unwrap();

        let reloaded = SeenCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("fingerprint-a"));
        assert!(reloaded.contains("fingerprint-b"));
    }

    #[test]
    fn test_save_without_changes_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut cache = SeenCache::load(&path);
        cache.save().unwrap();
        // Nothing was added, so nothing was written.
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "not json at all").unwrap();

        let cache = SeenCache::load(&path);
        assert!(cache.is_empty());
    }
}
