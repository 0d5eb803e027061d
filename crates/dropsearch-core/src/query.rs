//! Batch construction: one query per configured index, in descriptor order.

use dropsearch_types::{IndexDescriptor, QueryBatch, QueryRequest};

/// Build the batch for `query` against every descriptor.
///
/// Descriptors are validated when the widget is constructed, so this never fails.
pub fn build<'a, I>(query: &str, descriptors: I) -> QueryBatch
where
    I: IntoIterator<Item = &'a IndexDescriptor>,
{
    let requests = descriptors
        .into_iter()
        .map(|descriptor| QueryRequest {
            index_name: descriptor.index.clone(),
            params: descriptor.params.clone(),
            query: query.to_string(),
        })
        .collect();

    QueryBatch { requests }
}
