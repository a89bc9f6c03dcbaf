//! Feeds, seen-item cache and catalog.
//!
//! This crate discovers packages from heterogeneous sources and answers
//! pattern and filter queries over them:
//!
//! - [`DirectoryFeed`](feed::directory::DirectoryFeed) scans a directory of
//!   package files,
//! - [`InstalledFeed`](feed::installed::InstalledFeed) mirrors what the
//!   operating system reports as installed, remembering rejected files in a
//!   [`SeenCache`](seen::SeenCache),
//! - [`SessionFeed`](feed::session::SessionFeed) holds in-memory additions
//!   for the lifetime of a session,
//! - [`Catalog`] aggregates feeds and merges their answers by package
//!   identity.

use error::CatalogError;

pub mod catalog;
pub mod error;
pub mod feed;
pub mod properties;
pub mod seen;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::Catalog;
pub use feed::{
    directory::{DirectoryFeed, DEFAULT_PACKAGE_GLOB},
    installed::{InstalledFeed, INSTALLED_FEED_LOCATION},
    session::{SessionFeed, SESSION_FEED_LOCATION},
    Feed,
};
pub use seen::SeenCache;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
