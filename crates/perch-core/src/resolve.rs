//! Collaborator interfaces the catalog is built against.
//!
//! Package-format recognition and the identity-unifying registry live
//! outside this workspace; feeds only ever talk to these traits.

use std::path::Path;

use crate::{name::CanonicalName, package::PackageRef, CoreResult};

/// Outcome of classifying a candidate file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recognition {
    pub is_package_file: bool,
}

/// Classifies files as package files.
///
/// Implementations may be slow: classification reads the file. Feeds call
/// this synchronously and absorb failures as "not a package".
pub trait Recognizer: Send + Sync {
    fn recognize(&self, path: &Path) -> CoreResult<Recognition>;
}

/// The identity-unifying package registry.
///
/// The same canonical name (or a file resolving to it) always yields the
/// same [`PackageRef`], so identity comparisons across feeds are exact.
pub trait PackageResolver: Send + Sync {
    /// Resolves a canonical name to its package instance.
    fn resolve(&self, name: &CanonicalName) -> CoreResult<PackageRef>;

    /// Resolves a package file on disk to its package instance.
    fn resolve_from_file(&self, path: &Path) -> CoreResult<PackageRef>;
}

/// Enumerates package files the operating system reports as installed.
pub trait InstalledSource: Send + Sync {
    fn installed_package_files(&self) -> CoreResult<Vec<std::path::PathBuf>>;
}
