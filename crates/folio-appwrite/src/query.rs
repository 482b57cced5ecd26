//! Query string encoding.
//!
//! Each query is a JSON object `{"method", "attribute", "values"}` sent as
//! a repeated `queries[]` parameter.

use serde_json::{Value, json};

use folio_core::types::{DocumentQuery, FilterOp, SortDirection};

/// Encode a listing request as `queries[]` values.
pub fn encode(query: &DocumentQuery) -> Vec<String> {
    let mut encoded = Vec::new();

    for filter in &query.filters {
        let method = match filter.op {
            FilterOp::Equal => "equal",
            FilterOp::NotEqual => "notEqual",
        };
        encoded.push(
            json!({
                "method": method,
                "attribute": filter.field,
                "values": [filter.value.clone()],
            })
            .to_string(),
        );
    }

    if let Some(sort) = &query.sort {
        let method = match sort.direction {
            SortDirection::Asc => "orderAsc",
            SortDirection::Desc => "orderDesc",
        };
        encoded.push(json!({"method": method, "attribute": sort.field}).to_string());
    }

    if let Some(limit) = query.limit {
        encoded.push(json!({"method": "limit", "values": [Value::from(limit)]}).to_string());
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::{FilterField, SortField};

    #[test]
    fn test_encode_listing_queries() {
        let query = DocumentQuery::new()
            .filter(FilterField::eq("folder_id", "f1"))
            .sort(SortField::created_at(SortDirection::Asc))
            .limit(500);
        let encoded: Vec<Value> = encode(&query)
            .iter()
            .map(|q| serde_json::from_str(q).unwrap())
            .collect();

        assert_eq!(
            encoded,
            vec![
                json!({"method": "equal", "attribute": "folder_id", "values": ["f1"]}),
                json!({"method": "orderAsc", "attribute": "$createdAt"}),
                json!({"method": "limit", "values": [500]}),
            ]
        );
    }

    #[test]
    fn test_empty_query_encodes_nothing() {
        assert!(encode(&DocumentQuery::new()).is_empty());
    }
}
