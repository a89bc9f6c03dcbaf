//! Canonical package identity and wildcard patterns.
//!
//! A [`CanonicalName`] is the structured, uniquely-matching identity of a
//! package: name, four-part version, architecture, and the signer's public
//! key token. Two packages with equal canonical names are the same logical
//! package.
//!
//! A [`NamePattern`] is the query shape of that identity: any field may be
//! left as a wildcard, and the name field may carry glob metacharacters.
//! Pattern matching is the sole criterion feeds use to answer
//! `find_packages`.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use perch_utils::wildcard::wildcard_match_ci;

use crate::{error::CoreError, version::PackageVersion, CoreResult};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>.+?)
        -(?P<version>\d+(?:\.\d+){0,3})
        -(?P<arch>any|x86|x64|arm64)
        -(?P<token>[0-9a-f]{16})$
        ",
    )
    .expect("unable to compile canonical name regex")
});

static PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>.+?)
        (?:-(?P<version>\*|\d+(?:\.\d+){0,3}))?
        (?:-(?P<arch>\*|any|x86|x64|arm64))?
        (?:-(?P<token>\*|[0-9a-f]{16}))?$
        ",
    )
    .expect("unable to compile name pattern regex")
});

/// Processor architecture a package is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Any,
    X86,
    X64,
    Arm64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Architecture::Any => "any",
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Arm64 => "arm64",
        };
        f.write_str(s)
    }
}

impl FromStr for Architecture {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "any" => Ok(Architecture::Any),
            "x86" => Ok(Architecture::X86),
            "x64" => Ok(Architecture::X64),
            "arm64" => Ok(Architecture::Arm64),
            _ => Err(CoreError::InvalidArchitecture(value.to_string())),
        }
    }
}

/// Immutable structured identity of a package.
///
/// Name and key token are stored lowercase; name comparisons are
/// case-insensitive by contract, version and architecture compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalName {
    name: String,
    version: PackageVersion,
    arch: Architecture,
    key_token: String,
}

impl CanonicalName {
    pub fn new(
        name: impl Into<String>,
        version: PackageVersion,
        arch: Architecture,
        key_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            version,
            arch,
            key_token: key_token.into().to_lowercase(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> PackageVersion {
        self.version
    }

    pub fn arch(&self) -> Architecture {
        self.arch
    }

    pub fn key_token(&self) -> &str {
        &self.key_token
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.name, self.version, self.arch, self.key_token
        )
    }
}

impl FromStr for CanonicalName {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        let caps = NAME_RE
            .captures(&lowered)
            .ok_or_else(|| CoreError::InvalidCanonicalName(value.to_string()))?;

        Ok(CanonicalName {
            name: caps["name"].to_string(),
            version: caps["version"].parse()?,
            arch: caps["arch"].parse()?,
            key_token: caps["token"].to_string(),
        })
    }
}

/// A wildcard pattern over [`CanonicalName`].
///
/// `None` in a field is the wildcard sentinel ("match anything"). The name
/// field is a glob matched case-insensitively; version and architecture
/// match exactly; the key token is a case-insensitive literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePattern {
    name: Option<String>,
    version: Option<PackageVersion>,
    arch: Option<Architecture>,
    key_token: Option<String>,
}

impl NamePattern {
    /// The pattern that matches every package.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into().to_lowercase());
        self
    }

    pub fn with_version(mut self, version: PackageVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_arch(mut self, arch: Architecture) -> Self {
        self.arch = Some(arch);
        self
    }

    pub fn with_key_token(mut self, key_token: impl Into<String>) -> Self {
        self.key_token = Some(key_token.into().to_lowercase());
        self
    }

    /// Parses `name[-version[-arch[-token]]]`.
    ///
    /// Each trailing field may be `*` (wildcard) or a literal; omitted
    /// trailing fields are wildcards. The name part may itself carry glob
    /// metacharacters (`"foo*"`). A trailing dash-separated segment that
    /// looks like a version is parsed as the version field; a name ending in
    /// such a segment needs the full four-field form to disambiguate.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let lowered = input.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(CoreError::InvalidNamePattern(input.to_string()));
        }

        let caps = PATTERN_RE
            .captures(&lowered)
            .ok_or_else(|| CoreError::InvalidNamePattern(input.to_string()))?;

        let field = |m: Option<regex::Match>| {
            m.map(|m| m.as_str())
                .filter(|s| *s != "*")
                .map(str::to_string)
        };

        let version = match field(caps.name("version")) {
            Some(v) => Some(v.parse::<PackageVersion>()?),
            None => None,
        };
        let arch = match field(caps.name("arch")) {
            Some(a) => Some(a.parse::<Architecture>()?),
            None => None,
        };

        Ok(NamePattern {
            name: field(caps.name("name")),
            version,
            arch,
            key_token: field(caps.name("token")),
        })
    }

    /// Whether `candidate` matches this pattern. All present fields must
    /// match for the identity to match.
    pub fn matches(&self, candidate: &CanonicalName) -> bool {
        if let Some(ref name) = self.name {
            if !wildcard_match_ci(name, candidate.name()) {
                return false;
            }
        }
        if let Some(version) = self.version {
            if version != candidate.version() {
                return false;
            }
        }
        if let Some(arch) = self.arch {
            if arch != candidate.arch() {
                return false;
            }
        }
        if let Some(ref key_token) = self.key_token {
            if key_token != candidate.key_token() {
                return false;
            }
        }
        true
    }
}

impl From<&CanonicalName> for NamePattern {
    /// The exact pattern matching only `name`.
    fn from(name: &CanonicalName) -> Self {
        NamePattern {
            name: Some(name.name().to_string()),
            version: Some(name.version()),
            arch: Some(name.arch()),
            key_token: Some(name.key_token().to_string()),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = "*".to_string();
        write!(
            f,
            "{}-{}-{}-{}",
            self.name.as_ref().unwrap_or(&star),
            self.version
                .map_or_else(|| star.clone(), |v| v.to_string()),
            self.arch.map_or_else(|| star.clone(), |a| a.to_string()),
            self.key_token.as_ref().unwrap_or(&star),
        )
    }
}
