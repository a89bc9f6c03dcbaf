//! An embedded, composable filter-expression engine.
//!
//! Filters are small typed predicate trees: leaf comparisons over a named
//! property, combined with boolean and unary operators. A [`Query`] pairs a
//! filter with an optional sort. Construction is untyped-safe; incompatible
//! comparisons fail at evaluation time with an explicit error instead of
//! relying on implicit coercion.
//!
//! ```
//! use perch_query::{define_properties, Query, SortDirection, Value};
//!
//! #[derive(Clone)]
//! struct Entry {
//!     name: String,
//!     downloads: i64,
//! }
//!
//! fn get_name(e: &Entry) -> Value {
//!     Value::Str(e.name.clone())
//! }
//!
//! fn get_downloads(e: &Entry) -> Value {
//!     Value::Int(e.downloads)
//! }
//!
//! define_properties!(Entry {
//!     NAME: Str => "name", get_name,
//!     DOWNLOADS: Int => "downloads", get_downloads,
//! });
//!
//! let popular = NAME.is("rust*") & DOWNLOADS.is_at_least(1000i64);
//! let query = Query::new()
//!     .with_filter(popular)
//!     .sort_by(DOWNLOADS, SortDirection::Desc);
//! # let _ = query;
//! ```

pub mod error;
pub mod filter;
pub mod macros;
pub mod property;
pub mod query;

pub use error::QueryError;
pub use filter::{BooleanOp, CompareOp, Filter};
pub use property::{Property, TypeTag, Value};
pub use query::{Query, SortDirection};

pub type QueryResult<T> = std::result::Result<T, QueryError>;
