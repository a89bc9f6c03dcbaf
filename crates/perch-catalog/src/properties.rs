//! Query-engine properties of a package.
//!
//! These constants let callers build typed filters and sorts over catalog
//! results, e.g. `VERSION.is_at_least(v) & NAME.is("fire*")`.

use perch_core::package::PackageRef;
use perch_query::{define_properties, Value};

fn get_name(pkg: &PackageRef) -> Value {
    Value::Str(pkg.canonical_name().name().to_string())
}

fn get_version(pkg: &PackageRef) -> Value {
    Value::Version(pkg.canonical_name().version())
}

fn get_arch(pkg: &PackageRef) -> Value {
    Value::Str(pkg.canonical_name().arch().to_string())
}

fn get_key_token(pkg: &PackageRef) -> Value {
    Value::Str(pkg.canonical_name().key_token().to_string())
}

fn get_installed(pkg: &PackageRef) -> Value {
    Value::Bool(pkg.is_installed())
}

fn get_feed_count(pkg: &PackageRef) -> Value {
    Value::Int(pkg.feed_locations().len() as i64)
}

define_properties!(PackageRef {
    NAME: Str => "name", get_name,
    VERSION: Version => "version", get_version,
    ARCH: Str => "arch", get_arch,
    KEY_TOKEN: Str => "key_token", get_key_token,
    INSTALLED: Bool => "installed", get_installed,
    FEED_COUNT: Int => "feed_count", get_feed_count,
});

#[cfg(test)]
mod tests {
    use perch_core::version::PackageVersion;
    use perch_query::{Query, SortDirection};

    use super::*;
    use crate::test_support::package;

    fn sample() -> Vec<PackageRef> {
        vec![
            package("zsh", "1.5", false),
            package("bat", "2.0", true),
            package("fd", "3.1", false),
            package("exa", "0.9", false),
            package("git", "2.40.1", true),
        ]
    }

    #[test]
    fn test_name_eq_is_wildcard() {
        let filter = NAME.is("fo*") | NAME.is("g?t");
        let matches: Vec<_> = sample()
            .into_iter()
            .filter(|p| filter.evaluate(p).unwrap())
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].canonical_name().name(), "git");
    }

    #[test]
    fn test_version_filter_with_descending_name_sort() {
        let packages = sample();
        let at_least: PackageVersion = "2.0".parse().unwrap();

        let query = Query::new()
            .with_filter(VERSION.is_at_least(at_least))
            .sort_by(NAME, SortDirection::Desc);

        let result = query.apply(&packages).unwrap();
        let names: Vec<_> = result
            .iter()
            .map(|p| p.canonical_name().name().to_string())
            .collect();
        assert_eq!(names, vec!["git", "fd", "bat"]);
    }

    #[test]
    fn test_installed_filter() {
        let filter = INSTALLED.is(true);
        let installed: Vec<_> = sample()
            .into_iter()
            .filter(|p| filter.evaluate(p).unwrap())
            .collect();
        assert_eq!(installed.len(), 2);
    }

    #[test]
    fn test_feed_count_reflects_locations() {
        let pkg = package("vlc", "3.0", false);
        pkg.add_feed_location("file:///opt/packages");
        pkg.add_feed_location("installed://");

        assert!(FEED_COUNT.is(2i64).evaluate(&pkg).unwrap());
    }
}
