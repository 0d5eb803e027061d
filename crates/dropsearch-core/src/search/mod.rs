//! Fuzzy matching over in-memory records, used by the local backend.

mod engine;
mod searchable;

pub use engine::SearchEngine;
pub use searchable::{SearchMatch, Searchable};
