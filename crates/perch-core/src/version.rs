//! Four-part package versions.
//!
//! Installer packages in this catalog carry `major.minor.build.revision`
//! versions. Missing trailing components parse as zero, so `"2.0"` is the
//! same version as `"2.0.0.0"`. Ordering is numeric per component, which is
//! what version comparisons in queries rely on (`"10.0"` sorts above
//! `"9.0"`).

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageVersion {
    major: u16,
    minor: u16,
    build: u16,
    revision: u16,
}

impl PackageVersion {
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    pub const fn major(&self) -> u16 {
        self.major
    }

    pub const fn minor(&self) -> u16 {
        self.minor
    }

    pub const fn build(&self) -> u16 {
        self.build
    }

    pub const fn revision(&self) -> u16 {
        self.revision
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for PackageVersion {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::InvalidVersion(value.to_string()));
        }

        let mut parts = [0u16; 4];
        let mut count = 0;
        for component in value.split('.') {
            if count == 4 {
                return Err(CoreError::InvalidVersion(value.to_string()));
            }
            parts[count] = component
                .parse::<u16>()
                .map_err(|_| CoreError::InvalidVersion(value.to_string()))?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let v: PackageVersion = "1.2.3.4".parse().unwrap();
        assert_eq!(v, PackageVersion::new(1, 2, 3, 4));
        assert_eq!(v.to_string(), "1.2.3.4");
    }

    #[test]
    fn test_parse_zero_fills() {
        let v: PackageVersion = "2.0".parse().unwrap();
        assert_eq!(v, PackageVersion::new(2, 0, 0, 0));
        assert_eq!(v.to_string(), "2.0.0.0");

        let v: PackageVersion = "3".parse().unwrap();
        assert_eq!(v, PackageVersion::new(3, 0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<PackageVersion>().is_err());
        assert!("1.2.3.4.5".parse::<PackageVersion>().is_err());
        assert!("1.x".parse::<PackageVersion>().is_err());
        assert!("-1".parse::<PackageVersion>().is_err());
        assert!("70000".parse::<PackageVersion>().is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let v9: PackageVersion = "9.0".parse().unwrap();
        let v10: PackageVersion = "10.0".parse().unwrap();
        assert!(v10 > v9);

        let a: PackageVersion = "1.2.3.4".parse().unwrap();
        let b: PackageVersion = "1.2.4.0".parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_serde_round_trip() {
        let v: PackageVersion = "1.2.3.4".parse().unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"1.2.3.4\"");
        let back: PackageVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
