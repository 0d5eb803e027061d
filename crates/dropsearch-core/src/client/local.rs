//! In-process backend over a JSON dataset.
//!
//! The dataset is one object mapping index names to arrays of records:
//!
//! ```json
//! { "posts": [{ "title": "Hello" }], "users": [{ "name": "Ada" }] }
//! ```

use super::{ClientError, SearchClient};
use crate::search::{SearchEngine, Searchable};
use dropsearch_types::{Hit, IndexResult, QueryBatch, QueryRequest, SearchResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Hits per index when the request params don't say otherwise
pub const DEFAULT_HITS_PER_PAGE: usize = 20;

pub struct LocalClient {
    indices: Arc<HashMap<String, Vec<Searchable>>>,
    engine: Arc<Mutex<SearchEngine>>,
    latency: Duration,
}

impl std::fmt::Debug for LocalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.indices.keys().collect();
        names.sort();
        f.debug_struct("LocalClient")
            .field("indices", &names)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl LocalClient {
    /// Build a client from already-parsed index records.
    #[must_use]
    pub fn new(indices: HashMap<String, Vec<Hit>>) -> Self {
        let indices = indices
            .into_iter()
            .map(|(name, records)| {
                let searchables = records
                    .into_iter()
                    .enumerate()
                    .map(|(position, record)| Searchable::from_record(position, record))
                    .collect();
                (name, searchables)
            })
            .collect();

        Self {
            indices: Arc::new(indices),
            engine: Arc::new(Mutex::new(SearchEngine::new())),
            latency: Duration::ZERO,
        }
    }

    /// Load a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or is
    /// not an object of arrays.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let indices = Self::parse_dataset(value)
            .map_err(|e| crate::Error::Config(format!("{}: {e}", path.display())))?;

        let client = Self::new(indices);
        info!(
            "Loaded dataset {} with {} indices",
            path.display(),
            client.indices.len()
        );
        Ok(client)
    }

    fn parse_dataset(value: Value) -> Result<HashMap<String, Vec<Hit>>, ClientError> {
        let Value::Object(map) = value else {
            return Err(ClientError::Dataset(
                "dataset must be an object of index arrays".to_string(),
            ));
        };

        map.into_iter()
            .map(|(name, records)| match records {
                Value::Array(records) => Ok((name, records)),
                _ => Err(ClientError::Dataset(format!(
                    "index {name:?} must be an array of records"
                ))),
            })
            .collect()
    }

    /// Simulated network latency applied to every batch.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn index_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn hits_per_page(request: &QueryRequest) -> usize {
        request
            .params
            .as_ref()
            .and_then(|params| params.get("hitsPerPage"))
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_HITS_PER_PAGE)
    }

    fn run_query(&self, request: &QueryRequest) -> Result<IndexResult, ClientError> {
        let searchables = self
            .indices
            .get(&request.index_name)
            .ok_or_else(|| ClientError::UnknownIndex(request.index_name.clone()))?;

        let mut engine = self
            .engine
            .lock()
            .map_err(|_| ClientError::Dataset("search engine lock poisoned".to_string()))?;
        let matches = engine.search(&request.query, searchables);

        let hits = matches
            .iter()
            .take(Self::hits_per_page(request))
            .map(|m| m.searchable.record.clone())
            .collect();

        Ok(IndexResult {
            hit_count: matches.len() as u64,
            hits,
        })
    }

    /// Run a whole batch synchronously.
    ///
    /// # Errors
    ///
    /// Fails if any request names an index the dataset doesn't have.
    pub fn search_now(&self, batch: &QueryBatch) -> Result<SearchResponse, ClientError> {
        let results = batch
            .iter()
            .map(|request| self.run_query(request))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Local search {:?} over {} indices", batch.query(), results.len());
        Ok(SearchResponse::new(results))
    }
}

impl SearchClient for LocalClient {
    fn search(
        &self,
        batch: QueryBatch,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send {
        async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.search_now(&batch)
        }
    }
}
