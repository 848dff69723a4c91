//! Document database port.
//!
//! The hosted backend exposes collection-scoped CRUD plus queries with
//! equality/range predicates, ordering and a limit. Documents travel as
//! [`serde_json::Value`]; callers deserialize into their own model types.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the document backend.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No document with this id exists in the collection.
    #[error("document {collection}/{id} not found")]
    NotFound {
        /// Collection that was queried.
        collection: String,
        /// Requested document id.
        id: String,
    },

    /// The stored document could not be decoded into the expected shape.
    #[error("malformed document {id}: {reason}")]
    Malformed {
        /// Offending document id.
        id: String,
        /// Decode failure description.
        reason: String,
    },

    /// The backend could not be reached or returned a server error.
    #[error("document backend unavailable: {0}")]
    Unavailable(String),
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A single field predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the value.
    Eq(Value),
    /// Field is greater than or equal to the value.
    Gte(Value),
    /// Field is less than or equal to the value.
    Lte(Value),
}

/// A collection query: conjunctive field predicates, optional ordering
/// and an optional result limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// `(field, predicate)` pairs, combined with AND.
    pub filters: Vec<(String, Predicate)>,
    /// Optional `(field, direction)` ordering.
    pub order_by: Option<(String, Direction)>,
    /// Optional maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// An unfiltered query over the whole collection.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), Predicate::Eq(value.into())));
        self
    }

    /// Add a lower inclusive bound.
    #[must_use]
    pub fn where_gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), Predicate::Gte(value.into())));
        self
    }

    /// Add an upper inclusive bound.
    #[must_use]
    pub fn where_lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), Predicate::Lte(value.into())));
        self
    }

    /// Order results by a field.
    #[must_use]
    pub fn order(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Collection-scoped document CRUD and querying.
#[async_trait]
pub trait Documents: Send + Sync {
    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Value, DocumentError>;

    /// Create or fully replace a document.
    async fn put(&self, collection: &str, id: &str, value: Value) -> Result<(), DocumentError>;

    /// Delete a document by id. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError>;

    /// Run a query against a collection.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Value>, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::all()
            .where_eq("category", "oriental")
            .where_gte("price", 100)
            .order("created_at", Direction::Desc)
            .take(20);

        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.limit, Some(20));
        assert!(matches!(
            query.order_by,
            Some((ref field, Direction::Desc)) if field == "created_at"
        ));
    }
}
