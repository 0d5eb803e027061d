//! Shared types for dropsearch components.
//!
//! This crate provides the data model used by dropsearch-core and its hosts:
//! index descriptors, the batched multi-index query, and the per-index search
//! response. All types are serializable so search backends can exchange them
//! over the wire.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Per-index query parameters, forwarded verbatim to the search backend.
pub type Params = Map<String, Value>;

/// A single search hit. Opaque to the widget; only the index renderer reads it.
pub type Hit = Value;

/// Deserialize a Vec that may be null or missing (both become empty vec)
fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Shape violations in a host-supplied index descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("descriptor must be an object")]
    NotAnObject,

    #[error("descriptor must have an \"index\" attribute which is a non-empty string")]
    MissingIndex,

    #[error("descriptor must have a \"title\" attribute which is a non-empty string")]
    MissingTitle,

    #[error("descriptor has a \"params\" attribute which isn't an object")]
    InvalidParams,
}

/// One searchable collection: its backend name, display title and optional
/// query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Backend index name
    pub index: String,

    /// Section title shown above this index's hits
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl IndexDescriptor {
    pub fn new(index: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            title: title.into(),
            params: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Check the descriptor shape.
    ///
    /// # Errors
    ///
    /// Returns `MissingIndex` or `MissingTitle` when either string is empty.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.index.is_empty() {
            return Err(DescriptorError::MissingIndex);
        }
        if self.title.is_empty() {
            return Err(DescriptorError::MissingTitle);
        }
        Ok(())
    }

    /// Build a descriptor from untyped JSON, reporting the first shape violation.
    ///
    /// Keys other than `index`, `title` and `params` are ignored; hosts use them
    /// for their own row rendering options.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] naming the offending attribute.
    pub fn from_value(value: &Value) -> Result<Self, DescriptorError> {
        let Value::Object(obj) = value else {
            return Err(DescriptorError::NotAnObject);
        };

        let index = match obj.get("index") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(DescriptorError::MissingIndex),
        };

        let title = match obj.get("title") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(DescriptorError::MissingTitle),
        };

        let params = match obj.get("params") {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => return Err(DescriptorError::InvalidParams),
        };

        Ok(Self {
            index,
            title,
            params,
        })
    }
}

/// One entry of a batch: the query as sent to a single index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub index_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,

    pub query: String,
}

/// All per-index queries of one submission, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBatch {
    pub requests: Vec<QueryRequest>,
}

impl QueryBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryRequest> {
        self.requests.iter()
    }

    /// The shared query text, if the batch has any entry.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.requests.first().map(|r| r.query.as_str())
    }
}

impl IntoIterator for QueryBatch {
    type Item = QueryRequest;
    type IntoIter = std::vec::IntoIter<QueryRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryBatch {
    type Item = &'a QueryRequest;
    type IntoIter = std::slice::Iter<'a, QueryRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

/// Hits for one index of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResult {
    /// Total number of matches in the index, which may exceed `hits.len()`
    #[serde(default)]
    pub hit_count: u64,

    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub hits: Vec<Hit>,
}

impl IndexResult {
    #[must_use]
    pub fn new(hits: Vec<Hit>) -> Self {
        Self {
            hit_count: hits.len() as u64,
            hits,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Results of a batch, aligned 1:1 with the batch's request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub results: Vec<IndexResult>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(results: Vec<IndexResult>) -> Self {
        Self { results }
    }

    /// True when no index reported a single match.
    #[must_use]
    pub fn has_no_hits(&self) -> bool {
        self.results.iter().all(|r| r.hit_count == 0)
    }
}
