//! Shared package instances.
//!
//! The registry collaborator hands out one [`PackageRef`] per canonical
//! name, so every feed holding "the same package" holds the same
//! allocation. The identity is immutable; everything the catalog learns
//! about a package over time (feed locations, installed state,
//! dependencies) lives behind a mutex in the handle.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::name::CanonicalName;

/// Shared, identity-unified package instance.
pub type PackageRef = Arc<PackageHandle>;

#[derive(Debug, Default)]
struct PackageRecord {
    is_installed: bool,
    local_path: Option<PathBuf>,
    feed_locations: BTreeSet<String>,
    remote_locations: BTreeSet<String>,
    dependencies: BTreeMap<CanonicalName, BTreeSet<String>>,
    features: BTreeSet<String>,
    required_features: BTreeSet<String>,
    roles: BTreeSet<String>,
}

/// A package known to the catalog: immutable identity plus mutable record.
#[derive(Debug)]
pub struct PackageHandle {
    canonical_name: CanonicalName,
    record: Mutex<PackageRecord>,
}

impl PackageHandle {
    pub fn new(canonical_name: CanonicalName) -> PackageRef {
        Arc::new(Self {
            canonical_name,
            record: Mutex::new(PackageRecord::default()),
        })
    }

    pub fn canonical_name(&self) -> &CanonicalName {
        &self.canonical_name
    }

    pub fn is_installed(&self) -> bool {
        self.record.lock().unwrap().is_installed
    }

    pub fn set_installed(&self, installed: bool) {
        self.record.lock().unwrap().is_installed = installed;
    }

    pub fn local_path(&self) -> Option<PathBuf> {
        self.record.lock().unwrap().local_path.clone()
    }

    pub fn set_local_path(&self, path: impl Into<PathBuf>) {
        self.record.lock().unwrap().local_path = Some(path.into());
    }

    /// Feed source URIs this package was discovered through, deduplicated.
    pub fn feed_locations(&self) -> Vec<String> {
        self.record
            .lock()
            .unwrap()
            .feed_locations
            .iter()
            .cloned()
            .collect()
    }

    /// Records a feed location. Returns `false` if it was already known.
    pub fn add_feed_location(&self, location: impl Into<String>) -> bool {
        self.record
            .lock()
            .unwrap()
            .feed_locations
            .insert(location.into())
    }

    pub fn remote_locations(&self) -> Vec<String> {
        self.record
            .lock()
            .unwrap()
            .remote_locations
            .iter()
            .cloned()
            .collect()
    }

    pub fn add_remote_location(&self, location: impl Into<String>) -> bool {
        self.record
            .lock()
            .unwrap()
            .remote_locations
            .insert(location.into())
    }

    /// Dependencies by canonical name, each with its known feed locations.
    pub fn dependencies(&self) -> BTreeMap<CanonicalName, BTreeSet<String>> {
        self.record.lock().unwrap().dependencies.clone()
    }

    pub fn add_dependency(
        &self,
        dependency: CanonicalName,
        locations: impl IntoIterator<Item = String>,
    ) {
        self.record
            .lock()
            .unwrap()
            .dependencies
            .entry(dependency)
            .or_default()
            .extend(locations);
    }

    pub fn features(&self) -> BTreeSet<String> {
        self.record.lock().unwrap().features.clone()
    }

    pub fn add_feature(&self, feature: impl Into<String>) -> bool {
        self.record.lock().unwrap().features.insert(feature.into())
    }

    pub fn required_features(&self) -> BTreeSet<String> {
        self.record.lock().unwrap().required_features.clone()
    }

    pub fn add_required_feature(&self, feature: impl Into<String>) -> bool {
        self.record
            .lock()
            .unwrap()
            .required_features
            .insert(feature.into())
    }

    pub fn roles(&self) -> BTreeSet<String> {
        self.record.lock().unwrap().roles.clone()
    }

    pub fn add_role(&self, role: impl Into<String>) -> bool {
        self.record.lock().unwrap().roles.insert(role.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{name::Architecture, version::PackageVersion};

    fn handle(name: &str) -> PackageRef {
        PackageHandle::new(CanonicalName::new(
            name,
            PackageVersion::new(1, 0, 0, 0),
            Architecture::Any,
            "0123456789abcdef",
        ))
    }

    #[test]
    fn test_feed_locations_deduplicate() {
        let pkg = handle("vlc");
        assert!(pkg.add_feed_location("file:///opt/packages"));
        assert!(!pkg.add_feed_location("file:///opt/packages"));
        assert!(pkg.add_feed_location("installed://"));
        assert_eq!(
            pkg.feed_locations(),
            vec!["file:///opt/packages".to_string(), "installed://".to_string()]
        );
    }

    #[test]
    fn test_installed_flag() {
        let pkg = handle("vlc");
        assert!(!pkg.is_installed());
        pkg.set_installed(true);
        assert!(pkg.is_installed());
    }

    #[test]
    fn test_dependencies_merge_locations() {
        let pkg = handle("vlc");
        let dep = CanonicalName::new(
            "libav",
            PackageVersion::new(2, 1, 0, 0),
            Architecture::X64,
            "fedcba9876543210",
        );

        pkg.add_dependency(dep.clone(), ["file:///opt/packages".to_string()]);
        pkg.add_dependency(dep.clone(), ["installed://".to_string()]);

        let deps = pkg.dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[&dep].len(), 2);
    }

    #[test]
    fn test_shared_handle_sees_mutations() {
        let pkg = handle("vlc");
        let other = pkg.clone();
        pkg.add_feature("codecs");
        assert!(other.features().contains("codecs"));
    }
}
