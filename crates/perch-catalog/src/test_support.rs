//! Shared fakes for catalog tests.
//!
//! The recognizer and resolver collaborators live outside this workspace;
//! tests drive the feeds with these counting fakes instead.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    thread,
    time::Duration,
};

use perch_core::{
    error::CoreError,
    name::{Architecture, CanonicalName},
    package::{PackageHandle, PackageRef},
    resolve::{InstalledSource, PackageResolver, Recognition, Recognizer},
    CoreResult,
};

pub(crate) const TEST_KEY_TOKEN: &str = "0123456789abcdef";

pub(crate) fn canonical(name: &str, version: &str) -> CanonicalName {
    CanonicalName::new(
        name,
        version.parse().unwrap(),
        Architecture::Any,
        TEST_KEY_TOKEN,
    )
}

pub(crate) fn package(name: &str, version: &str, installed: bool) -> PackageRef {
    let pkg = PackageHandle::new(canonical(name, version));
    pkg.set_installed(installed);
    pkg
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Counting recognizer: configured file names classify as package files,
/// configured failures error, everything else is not a package.
pub(crate) struct FakeRecognizer {
    package_files: HashSet<String>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeRecognizer {
    pub fn new<const N: usize>(package_files: [&str; N]) -> Self {
        Self {
            package_files: package_files.iter().map(|s| s.to_string()).collect(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn failing<const N: usize>(mut self, names: [&str; N]) -> Self {
        self.failing = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Slows classification down so overlapping scans actually overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Recognizer for FakeRecognizer {
    fn recognize(&self, path: &Path) -> CoreResult<Recognition> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let name = file_name_of(path);
        if self.failing.contains(&name) {
            return Err(CoreError::ClassificationFailed {
                path: path.display().to_string(),
                reason: "unreadable header".to_string(),
            });
        }
        Ok(Recognition {
            is_package_file: self.package_files.contains(&name),
        })
    }
}

/// Identity-unifying resolver keyed by file stem. The same stem always
/// resolves to the same handle; per-path call counts let tests assert that
/// cached files are never re-resolved.
pub(crate) struct FakeResolver {
    installed: HashSet<String>,
    instances: Mutex<HashMap<String, PackageRef>>,
    file_calls: Mutex<HashMap<PathBuf, usize>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self {
            installed: HashSet::new(),
            instances: Mutex::new(HashMap::new()),
            file_calls: Mutex::new(HashMap::new()),
        }
    }

    /// Marks stems whose packages the registry reports as installed.
    pub fn with_installed<const N: usize>(mut self, stems: [&str; N]) -> Self {
        self.installed = stems.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn file_calls(&self, path: &Path) -> usize {
        self.file_calls
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_file_calls(&self) -> usize {
        self.file_calls.lock().unwrap().values().sum()
    }

    fn handle_for(&self, stem: &str) -> PackageRef {
        let mut instances = self.instances.lock().unwrap();
        instances
            .entry(stem.to_string())
            .or_insert_with(|| {
                let pkg = PackageHandle::new(canonical(stem, "1.0"));
                if self.installed.contains(stem) {
                    pkg.set_installed(true);
                }
                pkg
            })
            .clone()
    }
}

impl PackageResolver for FakeResolver {
    fn resolve(&self, name: &CanonicalName) -> CoreResult<PackageRef> {
        Ok(self.handle_for(name.name()))
    }

    fn resolve_from_file(&self, path: &Path) -> CoreResult<PackageRef> {
        *self
            .file_calls
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::PackageNotFound(path.display().to_string()))?;
        Ok(self.handle_for(&stem))
    }
}

/// Installed-files enumerator backed by a plain list.
pub(crate) struct FakeInstalledSource {
    files: Mutex<Vec<PathBuf>>,
    failing: AtomicBool,
}

impl FakeInstalledSource {
    pub fn new<I: IntoIterator<Item = PathBuf>>(files: I) -> Self {
        Self {
            files: Mutex::new(files.into_iter().collect()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn push(&self, path: PathBuf) {
        self.files.lock().unwrap().push(path);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl InstalledSource for FakeInstalledSource {
    fn installed_package_files(&self) -> CoreResult<Vec<PathBuf>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Custom(
                "installed package enumeration failed".to_string(),
            ));
        }
        Ok(self.files.lock().unwrap().clone())
    }
}
