//! Filter, sort, and limit types for document listings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::CREATED_AT;

/// Upper bound on a listing limit.
pub const MAX_QUERY_LIMIT: u32 = 5000;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Equal,
    /// Not equal.
    NotEqual,
}

/// A single filter condition on a named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The attribute name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: Value,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter on a string value.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Equal, Value::String(value.into()))
    }

    /// Shorthand for an inequality filter on a string value.
    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::NotEqual, Value::String(value.into()))
    }

    /// Evaluate the condition against an attribute value.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let equal = actual == Some(&self.value);
        match self.op {
            FilterOp::Equal => equal,
            FilterOp::NotEqual => !equal,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "oldest" => Ok(Self::Asc),
            "desc" | "newest" => Ok(Self::Desc),
            other => Err(crate::error::AppError::validation(format!(
                "Unknown sort direction '{other}'"
            ))),
        }
    }
}

/// A sort specification consisting of an attribute name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Attribute name to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Sort by creation time.
    pub fn created_at(direction: SortDirection) -> Self {
        Self::new(CREATED_AT, direction)
    }
}

/// A document listing request: filters are ANDed, then sorted, then limited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentQuery {
    /// Conditions every returned document must satisfy.
    #[serde(default)]
    pub filters: Vec<FilterField>,
    /// Ordering. Unsorted listings follow creation order.
    #[serde(default)]
    pub sort: Option<SortField>,
    /// Maximum number of documents.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl DocumentQuery {
    /// An unfiltered, unsorted, unlimited query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering.
    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the limit, clamped to `1..=MAX_QUERY_LIMIT`.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.clamp(1, MAX_QUERY_LIMIT));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matching() {
        let f = FilterField::eq("folder_id", "f1");
        assert!(f.matches(Some(&json!("f1"))));
        assert!(!f.matches(Some(&json!("f2"))));
        assert!(!f.matches(None));
        assert!(FilterField::ne("folder_id", "f1").matches(None));
    }

    #[test]
    fn test_builder_clamps_limit() {
        let q = DocumentQuery::new()
            .filter(FilterField::eq("folder_id", "f1"))
            .sort(SortField::created_at(SortDirection::Desc))
            .limit(10_000);
        assert_eq!(q.limit, Some(MAX_QUERY_LIMIT));
        assert_eq!(q.sort.as_ref().map(|s| s.field.as_str()), Some(CREATED_AT));
        assert_eq!(DocumentQuery::new().limit(0).limit, Some(1));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("newest".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
