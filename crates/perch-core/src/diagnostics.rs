//! Resolution diagnostics, data only.
//!
//! The dependency-resolution layer constructs these from catalog results;
//! nothing here decides policy.

use crate::package::PackageRef;

/// Groups of mutually exclusive packages that each satisfy the same
/// requirement. The caller must pick one per group.
#[derive(Debug, Clone, Default)]
pub struct ConflictedPackages {
    pub groups: Vec<Vec<PackageRef>>,
}

impl ConflictedPackages {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// An unsatisfiable package together with installed/available candidates
/// that could satisfy the requirement instead.
#[derive(Debug, Clone)]
pub struct PotentialUpgrades {
    pub unsatisfied: PackageRef,
    pub candidates: Vec<PackageRef>,
}
