//! Search session: one "current" submission and last-writer-wins reconciliation.
//!
//! Every non-empty submission takes the next sequence number. A completion is
//! applied only if it carries the latest number; anything older is dropped on
//! arrival. Clearing also takes a number, so nothing issued before the clear can
//! repopulate the list.

use crate::client::{ClientError, SearchClient};
use crate::query;
use crate::render::{IndexChild, RenderOverrides, RenderedResultSet, ResultElement, project};
use dropsearch_types::{IndexDescriptor, QueryBatch, SearchResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outcome of one dispatched batch, delivered back to the event loop.
#[derive(Debug)]
pub struct SearchCompletion {
    pub seq: u64,
    pub query: String,
    pub outcome: Result<SearchResponse, ClientError>,
}

/// What a text change did.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Empty text: results cleared, nothing to send
    Cleared,
    /// A batch to hand to the dispatcher
    Issued { seq: u64, batch: QueryBatch },
}

/// What happened to an incoming completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    Stale,
}

/// Fire-and-forget delivery of a batch to a search backend.
///
/// Implementations must eventually route a [`SearchCompletion`] with the same
/// `seq` back to the widget, or drop it.
pub trait SearchDispatch {
    fn dispatch(&self, seq: u64, query: &str, batch: QueryBatch);
}

/// Spawns one tokio task per batch and sends completions over a channel.
pub struct SpawnDispatcher<C> {
    client: Arc<C>,
    tx: mpsc::UnboundedSender<SearchCompletion>,
}

impl<C: SearchClient> SpawnDispatcher<C> {
    #[must_use]
    pub fn new(client: Arc<C>) -> (Self, mpsc::UnboundedReceiver<SearchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, tx }, rx)
    }
}

impl<C: SearchClient> SearchDispatch for SpawnDispatcher<C> {
    /// Must be called from within a tokio runtime.
    fn dispatch(&self, seq: u64, query: &str, batch: QueryBatch) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            let outcome = client.search(batch).await;
            if tx
                .send(SearchCompletion {
                    seq,
                    query,
                    outcome,
                })
                .is_err()
            {
                debug!("Completion #{seq} dropped, widget is gone");
            }
        });
    }
}

/// Sequence bookkeeping plus the current rendered result set.
pub struct SearchSession<E> {
    seq: u64,
    results: RenderedResultSet<E>,
}

impl<E> Default for SearchSession<E> {
    fn default() -> Self {
        Self {
            seq: 0,
            results: RenderedResultSet::Empty,
        }
    }
}

impl<E> std::fmt::Debug for SearchSession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("seq", &self.seq)
            .field("rows", &self.results.row_count())
            .finish()
    }
}

impl<E: ResultElement> SearchSession<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn results(&self) -> &RenderedResultSet<E> {
        &self.results
    }

    /// React to new input text.
    pub fn submit<'a, I>(&mut self, text: &str, descriptors: I) -> Submission
    where
        I: IntoIterator<Item = &'a IndexDescriptor>,
    {
        if text.is_empty() {
            self.clear();
            return Submission::Cleared;
        }

        self.seq += 1;
        let batch = query::build(text, descriptors);
        debug!("Submitting #{} {:?} to {} indices", self.seq, text, batch.len());
        Submission::Issued {
            seq: self.seq,
            batch,
        }
    }

    /// Empty the result set and retire every in-flight batch.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.results = RenderedResultSet::Empty;
    }

    /// Reconcile a completion against the current state.
    pub fn complete(
        &mut self,
        completion: SearchCompletion,
        children: &[Box<dyn IndexChild<E>>],
        overrides: &RenderOverrides<E>,
    ) -> Completion {
        if completion.seq != self.seq {
            debug!(
                "Dropping stale completion #{} for {:?}, latest is #{}",
                completion.seq, completion.query, self.seq
            );
            return Completion::Stale;
        }

        match completion.outcome {
            Ok(response) => {
                self.results = project(&response, children, overrides);
                debug!(
                    "Applied #{} {:?}: {} rows",
                    completion.seq,
                    completion.query,
                    self.results.row_count()
                );
                Completion::Applied
            }
            Err(e) => {
                warn!("Search for {:?} failed: {}", completion.query, e);
                Completion::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::Element;

    #[test]
    fn test_empty_text_clears_without_batch() {
        let mut session: SearchSession<Element> = SearchSession::new();
        let descriptors = vec![IndexDescriptor::new("posts", "Posts")];

        assert_eq!(session.submit("", &descriptors), Submission::Cleared);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_submit_takes_increasing_sequence() {
        let mut session: SearchSession<Element> = SearchSession::new();
        let descriptors = vec![IndexDescriptor::new("posts", "Posts")];

        let Submission::Issued { seq: first, batch } = session.submit("r", &descriptors) else {
            panic!("expected a batch");
        };
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.query(), Some("r"));

        let Submission::Issued { seq: second, .. } = session.submit("ru", &descriptors) else {
            panic!("expected a batch");
        };
        assert!(second > first);
        assert_eq!(session.seq, second);
    }

    #[test]
    fn test_clear_retires_latest() {
        let mut session: SearchSession<Element> = SearchSession::new();
        let descriptors = vec![IndexDescriptor::new("posts", "Posts")];

        let Submission::Issued { seq, .. } = session.submit("rust", &descriptors) else {
            panic!("expected a batch");
        };
        session.clear();
        assert_ne!(session.seq, seq);
    }
}
