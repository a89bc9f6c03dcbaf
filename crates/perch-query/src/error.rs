//! Error types for filter evaluation.

use miette::Diagnostic;
use thiserror::Error;

use crate::{filter::CompareOp, property::TypeTag};

/// Errors surfaced while evaluating a filter or applying a query.
///
/// Filter construction never fails; incompatible comparisons are only
/// detected when a filter meets an actual value.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(
        "Type mismatch on property '{property}': {property_type} value compared against {value_type}"
    )]
    #[diagnostic(
        code(perch::query::type_mismatch),
        help("Compare the property against a value of its declared type")
    )]
    TypeMismatch {
        property: &'static str,
        property_type: TypeTag,
        value_type: TypeTag,
    },

    #[error("Unsupported comparison '{op}' on property '{property}' of type {property_type}")]
    #[diagnostic(
        code(perch::query::unsupported_comparison),
        help("'contains' needs a string property; ordering needs an ordered type")
    )]
    UnsupportedComparison {
        property: &'static str,
        op: CompareOp,
        property_type: TypeTag,
    },

    #[error("Cannot sort by property '{property}' of type {property_type}")]
    #[diagnostic(
        code(perch::query::no_ordering),
        help("Sort keys must have a total order (int, string, or version)")
    )]
    NoOrdering {
        property: &'static str,
        property_type: TypeTag,
    },
}
