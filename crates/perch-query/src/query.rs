//! Queries: a filter plus an optional sort.

use crate::{
    error::QueryError,
    filter::Filter,
    property::{Property, Value},
    QueryResult,
};

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A filter with an optional sort, applied to a sequence of items.
///
/// An absent filter keeps everything. Applying a query never mutates its
/// input; it produces a fresh, re-iterable `Vec`.
pub struct Query<T> {
    filter: Option<Filter<T>>,
    sort: Option<(Property<T>, SortDirection)>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        Self {
            filter: None,
            sort: None,
        }
    }

    pub fn with_filter(mut self, filter: Filter<T>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_by(mut self, property: Property<T>, direction: SortDirection) -> Self {
        self.sort = Some((property, direction));
        self
    }

    pub fn filter(&self) -> Option<&Filter<T>> {
        self.filter.as_ref()
    }
}

impl<T: Clone> Query<T> {
    /// Applies the query: filter first, then a stable sort by the sort key.
    ///
    /// # Errors
    ///
    /// * Filter evaluation errors propagate unchanged.
    /// * [`QueryError::NoOrdering`] if the sort property's type has no
    ///   total order.
    /// * [`QueryError::TypeMismatch`] if a sort key's runtime type differs
    ///   from the property's declared type.
    pub fn apply(&self, items: &[T]) -> QueryResult<Vec<T>> {
        let mut kept = Vec::new();
        for item in items {
            let keep = match &self.filter {
                Some(filter) => filter.evaluate(item)?,
                None => true,
            };
            if keep {
                kept.push(item.clone());
            }
        }

        if let Some((property, direction)) = &self.sort {
            if !property.tag().is_ordered() {
                return Err(QueryError::NoOrdering {
                    property: property.name(),
                    property_type: property.tag(),
                });
            }

            let mut keyed: Vec<(Value, T)> = kept
                .into_iter()
                .map(|item| (property.value_of(&item), item))
                .collect();
            for (key, _) in &keyed {
                if key.tag() != property.tag() {
                    return Err(QueryError::TypeMismatch {
                        property: property.name(),
                        property_type: property.tag(),
                        value_type: key.tag(),
                    });
                }
            }

            // Stable sort; same-tag ordered keys always compare.
            keyed.sort_by(|a, b| {
                let ordering = a.0.compare(&b.0).unwrap_or(std::cmp::Ordering::Equal);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
            kept = keyed.into_iter().map(|(_, item)| item).collect();
        }

        Ok(kept)
    }
}
