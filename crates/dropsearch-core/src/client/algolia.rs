//! Hosted backend speaking the Algolia multi-query protocol.

use super::{ClientError, SearchClient};
use dropsearch_types::{Hit, IndexResult, QueryBatch, SearchResponse};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AlgoliaClient {
    http: reqwest::Client,
    app_id: String,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for AlgoliaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgoliaClient")
            .field("app_id", &self.app_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    #[serde(default)]
    nb_hits: u64,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

impl AlgoliaClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(app_id: &str, api_key: &str) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
            base_url: format!("https://{app_id}-dsn.algolia.net"),
        })
    }

    fn queries_url(&self) -> String {
        format!("{}/1/indexes/*/queries", self.base_url.trim_end_matches('/'))
    }

    /// Request body for a batch. Per-index params are copied in first so the
    /// index name and query text always win.
    fn request_body(batch: &QueryBatch) -> Value {
        let requests: Vec<Value> = batch
            .iter()
            .map(|request| {
                let mut entry: Map<String, Value> = request.params.clone().unwrap_or_default();
                entry.insert("indexName".to_string(), json!(request.index_name));
                entry.insert("query".to_string(), json!(request.query));
                Value::Object(entry)
            })
            .collect();
        json!({ "requests": requests })
    }

    fn parse_response(body: &str) -> Result<SearchResponse, ClientError> {
        let wire: WireResponse = serde_json::from_str(body)?;
        let results = wire
            .results
            .into_iter()
            .map(|r| IndexResult {
                hit_count: r.nb_hits,
                hits: r.hits,
            })
            .collect();
        Ok(SearchResponse::new(results))
    }

    fn status_error(status: u16, body: &str) -> ClientError {
        let message = serde_json::from_str::<WireError>(body)
            .map_or_else(|_| body.trim().to_string(), |e| e.message);
        ClientError::Status { status, message }
    }
}

impl SearchClient for AlgoliaClient {
    fn search(
        &self,
        batch: QueryBatch,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send {
        async move {
            debug!(
                "Algolia multi-query {:?} over {} indices",
                batch.query(),
                batch.len()
            );

            let response = self
                .http
                .post(self.queries_url())
                .header("X-Algolia-Application-Id", &self.app_id)
                .header("X-Algolia-API-Key", &self.api_key)
                .json(&Self::request_body(&batch))
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                warn!("Algolia returned {}", status);
                return Err(Self::status_error(status.as_u16(), &body));
            }

            let parsed = Self::parse_response(&body)?;
            if parsed.results.len() != batch.len() {
                warn!(
                    "Algolia returned {} results for {} queries",
                    parsed.results.len(),
                    batch.len()
                );
            }
            Ok(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropsearch_types::{IndexDescriptor, Params};

    #[test]
    fn test_request_body_shape() {
        let mut params = Params::new();
        params.insert("hitsPerPage".to_string(), json!(5));
        params.insert("query".to_string(), json!("ignored"));
        let descriptors = vec![
            IndexDescriptor::new("posts", "Posts").with_params(params),
            IndexDescriptor::new("users", "Users"),
        ];
        let batch = crate::query::build("rust", &descriptors);

        let body = AlgoliaClient::request_body(&batch);
        assert_eq!(
            body,
            json!({
                "requests": [
                    {"hitsPerPage": 5, "indexName": "posts", "query": "rust"},
                    {"indexName": "users", "query": "rust"},
                ]
            })
        );
    }

    #[test]
    fn test_parse_response_maps_nb_hits() {
        let body = r#"{
            "results": [
                {"nbHits": 42, "hits": [{"objectID": "1"}], "page": 0},
                {"nbHits": 0, "hits": []}
            ]
        }"#;

        let response = AlgoliaClient::parse_response(body).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].hit_count, 42);
        assert_eq!(response.results[0].hits.len(), 1);
        assert_eq!(response.results[1], IndexResult::empty());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = AlgoliaClient::parse_response("not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_status_error_uses_message_field() {
        let err = AlgoliaClient::status_error(403, r#"{"message":"Invalid Application-ID or API key","status":403}"#);
        assert!(matches!(
            err,
            ClientError::Status { status: 403, ref message } if message == "Invalid Application-ID or API key"
        ));

        let err = AlgoliaClient::status_error(502, "Bad Gateway\n");
        assert!(matches!(err, ClientError::Status { ref message, .. } if message == "Bad Gateway"));
    }

    #[test]
    fn test_queries_url() {
        let client = AlgoliaClient::new("APPID", "KEY").unwrap();
        assert_eq!(
            client.queries_url(),
            "https://APPID-dsn.algolia.net/1/indexes/*/queries"
        );

        let client = AlgoliaClient {
            base_url: "http://localhost:8080/".to_string(),
            ..client
        };
        assert_eq!(client.queries_url(), "http://localhost:8080/1/indexes/*/queries");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = AlgoliaClient::new("APPID", "secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("APPID"));
        assert!(!debug.contains("secret-key"));
    }
}
