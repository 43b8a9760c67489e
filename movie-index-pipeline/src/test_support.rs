//! In-memory search engine used by the pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use movie_index_repository::{
    BulkIndexSummary, BulkItemFailure, MovieRecord, SearchEngineClient, SearchError,
};

/// Fake search service keeping indices and documents in memory.
#[derive(Default)]
pub struct FakeSearchEngine {
    /// Ping succeeds from this call number on (1-based); `None` never succeeds.
    pub ready_on_ping: Option<u32>,
    /// Fail the bulk call with this number (1-based).
    pub fail_bulk_on_call: Option<usize>,
    /// Fail every create-index call.
    pub fail_create: bool,
    /// Reject this many documents at the end of every bulk call.
    pub reject_per_batch: usize,
    pub pings: AtomicU32,
    pub indices: Mutex<HashMap<String, (Value, Vec<MovieRecord>)>>,
    pub bulk_calls: Mutex<Vec<Vec<MovieRecord>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSearchEngine {
    /// A service that answers the first ping.
    pub fn ready() -> Self {
        Self {
            ready_on_ping: Some(1),
            ..Default::default()
        }
    }

    /// A service that never answers a ping successfully.
    pub fn never_ready() -> Self {
        Self::default()
    }

    /// Seed an index as if it were left over from an earlier run.
    pub fn with_index(self, name: &str, body: Value, docs: Vec<MovieRecord>) -> Self {
        self.indices
            .lock()
            .unwrap()
            .insert(name.to_string(), (body, docs));
        self
    }

    pub fn ping_count(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }

    /// Records of every bulk call, in call order.
    pub fn bulk_calls(&self) -> Vec<Vec<MovieRecord>> {
        self.bulk_calls.lock().unwrap().clone()
    }

    /// Names of the operations called, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Mapping body and document count of an index, if it exists.
    pub fn index(&self, name: &str) -> Option<(Value, usize)> {
        self.indices
            .lock()
            .unwrap()
            .get(name)
            .map(|(body, docs)| (body.clone(), docs.len()))
    }

    fn record_call(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl SearchEngineClient for FakeSearchEngine {
    async fn ping(&self) -> Result<bool, SearchError> {
        self.record_call("ping");
        let attempt = self.pings.fetch_add(1, Ordering::SeqCst) + 1;
        match self.ready_on_ping {
            Some(ready) if attempt >= ready => Ok(true),
            _ => Err(SearchError::connection("connection refused")),
        }
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.record_call("exists");
        Ok(self.indices.lock().unwrap().contains_key(index))
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        self.record_call("delete");
        self.indices.lock().unwrap().remove(index);
        Ok(())
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError> {
        self.record_call("create");
        if self.fail_create {
            return Err(SearchError::index_creation("status 500"));
        }
        let mut indices = self.indices.lock().unwrap();
        if indices.contains_key(index) {
            return Err(SearchError::index_creation("resource_already_exists_exception"));
        }
        indices.insert(index.to_string(), (body.clone(), Vec::new()));
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        records: &[MovieRecord],
    ) -> Result<BulkIndexSummary, SearchError> {
        self.record_call("bulk");
        let call_number = {
            let mut calls = self.bulk_calls.lock().unwrap();
            calls.push(records.to_vec());
            calls.len()
        };
        if self.fail_bulk_on_call == Some(call_number) {
            return Err(SearchError::bulk_index("connection reset by peer"));
        }

        let rejected = self.reject_per_batch.min(records.len());
        let accepted = records.len() - rejected;

        let mut indices = self.indices.lock().unwrap();
        // Like the real service, a bulk write auto-creates a missing index.
        let (_, docs) = indices
            .entry(index.to_string())
            .or_insert_with(|| (json!({}), Vec::new()));
        docs.extend_from_slice(&records[..accepted]);

        let failures = (accepted..records.len())
            .map(|position| BulkItemFailure {
                position,
                status: 400,
                reason: "mapper_parsing_exception".to_string(),
            })
            .collect();

        Ok(BulkIndexSummary {
            total: records.len(),
            succeeded: accepted,
            failed: rejected,
            failures,
        })
    }

    async fn count(&self, index: &str) -> Result<u64, SearchError> {
        self.record_call("count");
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|(_, docs)| docs.len() as u64)
            .ok_or_else(|| SearchError::query(format!("index_not_found_exception: {}", index)))
    }
}

/// Build `n` records titled `Movie 0` .. `Movie n-1`.
pub fn movie_records(n: usize) -> Vec<MovieRecord> {
    (0..n)
        .map(|i| {
            serde_json::from_value(json!({
                "title": format!("Movie {}", i),
                "year": 1900 + (i % 120),
                "cast": [],
                "genres": ["Drama"]
            }))
            .unwrap()
        })
        .collect()
}
