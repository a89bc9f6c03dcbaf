//! The filter-expression tree and its evaluator.
//!
//! Leaf comparisons are built from a [`Property`] with the fluent methods
//! (`.is()`, `.is_greater_than()`, `.contains()`, ...) and composed with the
//! `&`, `|`, `^` and `!` operators. The operators also accept
//! `Option<Filter<T>>` on either side and absorb `None`, so optional filter
//! chains compose without any null checks:
//!
//! ```
//! use perch_query::{Filter, Property, TypeTag, Value};
//!
//! const LEN: Property<String> = Property::new("len", TypeTag::Int, get_len);
//!
//! fn get_len(s: &String) -> Value {
//!     Value::Int(s.len() as i64)
//! }
//!
//! let mut filter: Option<Filter<String>> = None;
//! filter = Some(filter & LEN.is_greater_than(3i64));
//! filter = Some(filter & LEN.is_less_than(10i64));
//! assert!(filter.unwrap().evaluate(&"hello".to_string()).unwrap());
//! ```

use std::{
    fmt,
    ops::{BitAnd, BitOr, BitXor, Not},
};

use perch_utils::wildcard::wildcard_match_ci;

use crate::{
    error::QueryError,
    property::{Property, TypeTag, Value},
    QueryResult,
};

/// Leaf comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Contains => "contains",
        };
        f.write_str(s)
    }
}

/// Binary boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Xor,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
            BooleanOp::Xor => "XOR",
        };
        f.write_str(s)
    }
}

/// A composable boolean predicate over `T`.
///
/// Every filter is a pure function of its input; evaluation never mutates
/// the item and equal inputs give equal results.
pub enum Filter<T> {
    Compare {
        property: Property<T>,
        op: CompareOp,
        value: Value,
    },
    Boolean {
        left: Box<Filter<T>>,
        right: Box<Filter<T>>,
        op: BooleanOp,
    },
    Not {
        operand: Box<Filter<T>>,
    },
}

impl<T> Filter<T> {
    /// Evaluates the filter against one item.
    ///
    /// `And`/`Or` short-circuit; leaves are pure so this cannot change the
    /// outcome. `Xor` always evaluates both sides.
    ///
    /// # Errors
    ///
    /// * [`QueryError::TypeMismatch`] if a leaf compares a property against
    ///   a value of a different type.
    /// * [`QueryError::UnsupportedComparison`] if the operator is not
    ///   defined for the property's type.
    pub fn evaluate(&self, item: &T) -> QueryResult<bool> {
        match self {
            Filter::Compare {
                property,
                op,
                value,
            } => evaluate_compare(property, *op, value, item),
            Filter::Boolean {
                left,
                right,
                op,
            } => {
                match op {
                    BooleanOp::And => {
                        if !left.evaluate(item)? {
                            return Ok(false);
                        }
                        right.evaluate(item)
                    }
                    BooleanOp::Or => {
                        if left.evaluate(item)? {
                            return Ok(true);
                        }
                        right.evaluate(item)
                    }
                    BooleanOp::Xor => Ok(left.evaluate(item)? ^ right.evaluate(item)?),
                }
            }
            Filter::Not {
                operand,
            } => Ok(!operand.evaluate(item)?),
        }
    }
}

fn evaluate_compare<T>(
    property: &Property<T>,
    op: CompareOp,
    value: &Value,
    item: &T,
) -> QueryResult<bool> {
    let actual = property.value_of(item);

    match op {
        CompareOp::Eq => {
            match (&actual, value) {
                // String equality is a wildcard match: the comparison value
                // is a pattern, matched case-insensitively.
                (Value::Str(have), Value::Str(pattern)) => Ok(wildcard_match_ci(pattern, have)),
                _ if actual.tag() == value.tag() => Ok(actual == *value),
                _ => {
                    Err(QueryError::TypeMismatch {
                        property: property.name(),
                        property_type: actual.tag(),
                        value_type: value.tag(),
                    })
                }
            }
        }
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            if actual.tag() != value.tag() {
                return Err(QueryError::TypeMismatch {
                    property: property.name(),
                    property_type: actual.tag(),
                    value_type: value.tag(),
                });
            }
            let ordering = actual.compare(value).ok_or(QueryError::UnsupportedComparison {
                property: property.name(),
                op,
                property_type: actual.tag(),
            })?;
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Lte => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Gte => ordering.is_ge(),
                _ => unreachable!(),
            })
        }
        CompareOp::Contains => {
            match (&actual, value) {
                (Value::Str(have), Value::Str(needle)) => Ok(have.contains(needle.as_str())),
                (Value::Str(_), _) => {
                    Err(QueryError::TypeMismatch {
                        property: property.name(),
                        property_type: actual.tag(),
                        value_type: value.tag(),
                    })
                }
                _ => {
                    Err(QueryError::UnsupportedComparison {
                        property: property.name(),
                        op,
                        property_type: actual.tag(),
                    })
                }
            }
        }
    }
}

impl<T> Property<T> {
    /// `property = value`; for string properties the value is a wildcard
    /// pattern matched case-insensitively.
    pub fn is(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    /// `property < value`.
    pub fn is_less_than(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Lt,
            value: value.into(),
        }
    }

    /// `property <= value`.
    pub fn is_at_most(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Lte,
            value: value.into(),
        }
    }

    /// `property > value`.
    pub fn is_greater_than(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Gt,
            value: value.into(),
        }
    }

    /// `property >= value`.
    pub fn is_at_least(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Gte,
            value: value.into(),
        }
    }

    /// Substring test; defined for string properties only.
    pub fn contains(self, value: impl Into<Value>) -> Filter<T> {
        Filter::Compare {
            property: self,
            op: CompareOp::Contains,
            value: value.into(),
        }
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        match self {
            Filter::Compare {
                property,
                op,
                value,
            } => {
                Filter::Compare {
                    property: *property,
                    op: *op,
                    value: value.clone(),
                }
            }
            Filter::Boolean {
                left,
                right,
                op,
            } => {
                Filter::Boolean {
                    left: left.clone(),
                    right: right.clone(),
                    op: *op,
                }
            }
            Filter::Not {
                operand,
            } => {
                Filter::Not {
                    operand: operand.clone(),
                }
            }
        }
    }
}

impl<T> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Compare {
                property,
                op,
                value,
            } => write!(f, "({} {} {})", property.name(), op, value),
            Filter::Boolean {
                left,
                right,
                op,
            } => write!(f, "({left} {op} {right})"),
            Filter::Not {
                operand,
            } => write!(f, "(NOT {operand})"),
        }
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn combine<T>(left: Filter<T>, right: Filter<T>, op: BooleanOp) -> Filter<T> {
    Filter::Boolean {
        left: Box::new(left),
        right: Box::new(right),
        op,
    }
}

impl<T> BitAnd for Filter<T> {
    type Output = Filter<T>;

    fn bitand(self, rhs: Filter<T>) -> Filter<T> {
        combine(self, rhs, BooleanOp::And)
    }
}

impl<T> BitOr for Filter<T> {
    type Output = Filter<T>;

    fn bitor(self, rhs: Filter<T>) -> Filter<T> {
        combine(self, rhs, BooleanOp::Or)
    }
}

impl<T> BitXor for Filter<T> {
    type Output = Filter<T>;

    fn bitxor(self, rhs: Filter<T>) -> Filter<T> {
        combine(self, rhs, BooleanOp::Xor)
    }
}

impl<T> Not for Filter<T> {
    type Output = Filter<T>;

    fn not(self) -> Filter<T> {
        Filter::Not {
            operand: Box::new(self),
        }
    }
}

// Null-absorbing variants: combining with an absent filter yields the other
// operand unchanged, so optional filter chains need no null checks.

impl<T> BitAnd<Option<Filter<T>>> for Filter<T> {
    type Output = Filter<T>;

    fn bitand(self, rhs: Option<Filter<T>>) -> Filter<T> {
        match rhs {
            Some(rhs) => self & rhs,
            None => self,
        }
    }
}

impl<T> BitAnd<Filter<T>> for Option<Filter<T>> {
    type Output = Filter<T>;

    fn bitand(self, rhs: Filter<T>) -> Filter<T> {
        match self {
            Some(lhs) => lhs & rhs,
            None => rhs,
        }
    }
}

impl<T> BitOr<Option<Filter<T>>> for Filter<T> {
    type Output = Filter<T>;

    fn bitor(self, rhs: Option<Filter<T>>) -> Filter<T> {
        match rhs {
            Some(rhs) => self | rhs,
            None => self,
        }
    }
}

impl<T> BitOr<Filter<T>> for Option<Filter<T>> {
    type Output = Filter<T>;

    fn bitor(self, rhs: Filter<T>) -> Filter<T> {
        match self {
            Some(lhs) => lhs | rhs,
            None => rhs,
        }
    }
}

impl<T> BitXor<Option<Filter<T>>> for Filter<T> {
    type Output = Filter<T>;

    fn bitxor(self, rhs: Option<Filter<T>>) -> Filter<T> {
        match rhs {
            Some(rhs) => self ^ rhs,
            None => self,
        }
    }
}

impl<T> BitXor<Filter<T>> for Option<Filter<T>> {
    type Output = Filter<T>;

    fn bitxor(self, rhs: Filter<T>) -> Filter<T> {
        match self {
            Some(lhs) => lhs ^ rhs,
            None => rhs,
        }
    }
}
