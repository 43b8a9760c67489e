//! Request body builders for OpenSearch.

use serde_json::{json, Value};

use crate::types::MovieRecord;

/// Build the lines of a `_bulk` request indexing every record into `index`.
///
/// Each record contributes an action line naming the target index followed
/// by the record itself, in input order. No `_id` is given, so the server
/// assigns one.
pub fn bulk_index_lines(index: &str, records: &[MovieRecord]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(records.len() * 2);
    for record in records {
        lines.push(json!({"index": {"_index": index}}));
        lines.push(record.to_value());
    }
    lines
}

/// Read the `count` field of a `_count` response.
pub fn parse_count(body: &Value) -> Option<u64> {
    body.get("count").and_then(Value::as_u64)
}
