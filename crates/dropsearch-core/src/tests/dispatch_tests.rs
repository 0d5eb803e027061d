//! Tests for the async dispatch path
//!
//! Batches go through `SpawnDispatcher` to the local backend and come back over
//! the completion channel, the way a host event loop sees them.

use super::fixtures::{Element, posts_and_users};
use crate::client::{AnyClient, LocalClient, SearchClient};
use crate::dropdown::{Dropdown, DropdownOptions};
use crate::render::RowKey;
use crate::session::{Completion, SearchDispatch, SpawnDispatcher};
use dropsearch_types::Hit;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn dataset() -> HashMap<String, Vec<Hit>> {
    HashMap::from([
        (
            "posts".to_string(),
            vec![
                json!({"title": "Rust ownership explained"}),
                json!({"title": "Gardening tips"}),
            ],
        ),
        (
            "users".to_string(),
            vec![json!({"name": "Ada Lovelace"}), json!({"name": "Rusty Shackleford"})],
        ),
    ])
}

fn dropdown_over<C: SearchClient>(
    client: C,
) -> (
    Dropdown<Element>,
    tokio::sync::mpsc::UnboundedReceiver<crate::session::SearchCompletion>,
) {
    let (dispatcher, rx) = SpawnDispatcher::new(Arc::new(client));
    let options = DropdownOptions {
        available_extent: 830.0,
        ..DropdownOptions::default()
    };
    let dropdown = Dropdown::new(options, posts_and_users(), Box::new(dispatcher)).unwrap();
    (dropdown, rx)
}

#[tokio::test]
async fn test_dispatcher_round_trip() {
    let (mut dropdown, mut rx) = dropdown_over(LocalClient::new(dataset()));
    dropdown.focus(Instant::now());
    dropdown.set_text("rust");

    let completion = rx.recv().await.unwrap();
    assert_eq!(completion.query, "rust");
    assert_eq!(dropdown.apply(completion), Completion::Applied);

    let keys: Vec<RowKey> = dropdown.results().rows().map(|r| r.key.clone()).collect();
    assert!(keys.contains(&RowKey::Title {
        index: "posts".to_string()
    }));
    assert!(keys.contains(&RowKey::Hit {
        index: "users".to_string(),
        position: 0
    }));
}

#[tokio::test(start_paused = true)]
async fn test_slow_superseded_batch_discarded() {
    let client = LocalClient::new(dataset()).with_latency(Duration::from_millis(200));
    let (mut dropdown, mut rx) = dropdown_over(client);
    dropdown.focus(Instant::now());

    dropdown.set_text("ru");
    dropdown.set_text("rust");

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();

    for completion in [first, second] {
        let query = completion.query.clone();
        let expected = if query == "rust" {
            Completion::Applied
        } else {
            Completion::Stale
        };
        assert_eq!(dropdown.apply(completion), expected, "query {query:?}");
    }
    assert_eq!(dropdown.text(), "rust");
}

#[tokio::test]
async fn test_unknown_index_is_reported_as_failure() {
    let dataset = HashMap::from([("posts".to_string(), vec![json!({"title": "Hello"})])]);
    let (mut dropdown, mut rx) = dropdown_over(AnyClient::Local(LocalClient::new(dataset)));
    dropdown.focus(Instant::now());
    dropdown.set_text("hello");

    let completion = rx.recv().await.unwrap();
    assert!(completion.outcome.is_err());
    assert_eq!(dropdown.apply(completion), Completion::Failed);
    assert!(dropdown.results().is_empty());
}

#[tokio::test]
async fn test_dispatcher_survives_dropped_receiver() {
    let (dispatcher, rx) = SpawnDispatcher::new(Arc::new(LocalClient::new(dataset())));
    drop(rx);

    let descriptors = vec![dropsearch_types::IndexDescriptor::new("posts", "Posts")];
    dispatcher.dispatch(1, "rust", crate::query::build("rust", &descriptors));
    tokio::task::yield_now().await;
}
