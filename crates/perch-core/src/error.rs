//! Error types for perch-core.

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for catalog data-model operations.
#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error("Invalid canonical name '{0}'")]
    #[diagnostic(
        code(perch::invalid_canonical_name),
        help("Use format: name-version-arch-token (e.g., 'vlc-3.0.1.0-x64-84bd3f0d9bd71c21')")
    )]
    InvalidCanonicalName(String),

    #[error("Invalid name pattern '{0}'")]
    #[diagnostic(
        code(perch::invalid_pattern),
        help("Use format: name[-version[-arch[-token]]]; each trailing field may be '*'")
    )]
    InvalidNamePattern(String),

    #[error("Invalid version '{0}'")]
    #[diagnostic(
        code(perch::invalid_version),
        help("Versions are one to four dot-separated numeric components (e.g., '2.0' or '1.2.3.4')")
    )]
    InvalidVersion(String),

    #[error("Unknown architecture '{0}'")]
    #[diagnostic(
        code(perch::invalid_arch),
        help("Supported architectures: any, x86, x64, arm64")
    )]
    InvalidArchitecture(String),

    #[error("Failed to classify '{path}': {reason}")]
    #[diagnostic(code(perch::classification))]
    ClassificationFailed { path: String, reason: String },

    #[error("No package known for '{0}'")]
    #[diagnostic(
        code(perch::package_not_found),
        help("The registry has no package for this name or file")
    )]
    PackageNotFound(String),

    #[error("Error while {action}")]
    #[diagnostic(code(perch::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(perch::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error("{0}")]
    #[diagnostic(code(perch::error))]
    Custom(String),
}

impl<T> From<std::sync::PoisonError<T>> for CoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, CoreError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, CoreError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| CoreError::IoError {
            action: context(),
            source: err,
        })
    }
}
