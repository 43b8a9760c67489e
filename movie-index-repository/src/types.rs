//! Record and response types for search index operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of per-document failures kept in a `BulkIndexSummary`.
///
/// The counts are always exact; only the detailed entries are capped.
pub const MAX_REPORTED_FAILURES: usize = 10;

/// One movie record as it appears in the source dataset.
///
/// The record is an opaque JSON object. Fields such as `title`, `year`,
/// `cast`, `genres` and `directors` are forwarded to the search engine
/// exactly as the source provides them, without validation or coercion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord(Map<String, Value>);

impl MovieRecord {
    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The `title` field, when present and a string.
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// Convert into a JSON value suitable for a request body.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// A single document the search engine rejected inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    /// Position of the document within the bulk request (0-based).
    pub position: usize,
    /// HTTP-style status reported for the item.
    pub status: u16,
    /// Reason given by the search engine.
    pub reason: String,
}

/// Summary of one bulk request.
///
/// A bulk request can succeed as a whole while individual documents are
/// rejected. `failed` counts those rejections; `failures` keeps the first
/// few of them for reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkIndexSummary {
    /// Number of documents sent.
    pub total: usize,
    /// Number of documents accepted.
    pub succeeded: usize,
    /// Number of documents rejected.
    pub failed: usize,
    /// Details for up to `MAX_REPORTED_FAILURES` rejected documents.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkIndexSummary {
    /// A summary where every document was accepted.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Build a summary from a `_bulk` response body.
    ///
    /// When the body reports `"errors": false` every document is counted as
    /// accepted without walking the items.
    pub fn from_response(total: usize, body: &Value) -> Self {
        let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        if !has_errors {
            return Self::all_succeeded(total);
        }

        let items = body
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut failed = 0;
        let mut failures = Vec::new();

        for (position, item) in items.iter().enumerate() {
            // Each item is keyed by its action, e.g. {"index": {...}}.
            let Some(result) = item.as_object().and_then(|o| o.values().next()) else {
                continue;
            };
            let Some(error) = result.get("error") else {
                continue;
            };

            failed += 1;
            if failures.len() < MAX_REPORTED_FAILURES {
                let status = result
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok())
                    .unwrap_or(0);
                let reason = error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                failures.push(BulkItemFailure {
                    position,
                    status,
                    reason,
                });
            }
        }

        let failed = failed.min(total);
        Self {
            total,
            succeeded: total - failed,
            failed,
            failures,
        }
    }

    /// Whether any document in the request was rejected.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
