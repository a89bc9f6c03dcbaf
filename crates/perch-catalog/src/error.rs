//! Error types for perch-catalog.

use miette::Diagnostic;
use perch_core::error::CoreError;
use perch_query::QueryError;
use thiserror::Error;

/// Catalog error type covering feed scans, cache persistence and queries.
#[derive(Error, Diagnostic, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to scan feed '{location}'")]
    #[diagnostic(
        code(perch::catalog::scan),
        help("Check that the feed source exists and is readable; the feed stays stale and the next call retries")
    )]
    Scan {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to persist seen-item cache `{path}`")]
    #[diagnostic(
        code(perch::catalog::cache_persist),
        help("A rebuilt cache only costs re-probing files; safe to ignore")
    )]
    CachePersist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(perch::catalog::json))]
    Json(#[from] serde_json::Error),

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(perch::catalog::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,
}

impl<T> From<std::sync::PoisonError<T>> for CatalogError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}
