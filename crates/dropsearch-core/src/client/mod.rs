//! Search backends.
//!
//! A [`SearchClient`] takes a whole batch and resolves to one response aligned
//! with it. The widget only ever sees the trait; [`AnyClient`] picks a concrete
//! backend from config.

mod algolia;
mod local;

pub use algolia::AlgoliaClient;
pub use local::LocalClient;

use crate::config::{BackendConfig, Directories};
use dropsearch_types::{QueryBatch, SearchResponse};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

/// Executes batched multi-index queries.
pub trait SearchClient: Send + Sync + 'static {
    fn search(
        &self,
        batch: QueryBatch,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send;
}

/// Backend selected at runtime from config.
#[derive(Debug)]
pub enum AnyClient {
    Local(LocalClient),
    Algolia(AlgoliaClient),
}

impl AnyClient {
    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the local dataset cannot be read or parsed, or the
    /// HTTP client cannot be constructed.
    pub fn from_config(backend: &BackendConfig, dirs: &Directories) -> crate::Result<Self> {
        match backend {
            BackendConfig::Local {
                dataset,
                latency_ms,
            } => {
                let path = dataset.clone().unwrap_or_else(|| dirs.dataset_file.clone());
                let client = LocalClient::load(&path)?
                    .with_latency(Duration::from_millis(*latency_ms));
                Ok(Self::Local(client))
            }
            BackendConfig::Algolia { app_id, api_key } => {
                let client = AlgoliaClient::new(app_id, api_key)
                    .map_err(|e| crate::Error::Config(format!("HTTP client: {e}")))?;
                Ok(Self::Algolia(client))
            }
        }
    }
}

impl SearchClient for AnyClient {
    fn search(
        &self,
        batch: QueryBatch,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send {
        async move {
            match self {
                Self::Local(client) => client.search(batch).await,
                Self::Algolia(client) => client.search(batch).await,
            }
        }
    }
}
