//! Headless core of the dropsearch widget.
//!
//! [`Dropdown`] composes the text input, the [`session::SearchSession`] and the
//! [`overlay::Overlay`] state machine. It never draws: hosts supply an element
//! type and one [`render::IndexChild`] per index, and render the view model.

pub mod client;
pub mod config;
pub mod dropdown;
pub mod input;
pub mod overlay;
pub mod query;
pub mod render;
pub mod session;

// Fuzzy matching behind the local backend - not part of stable API
#[doc(hidden)]
pub mod search;

mod error;

#[cfg(test)]
mod tests;

pub use dropdown::{Dropdown, DropdownOptions, DropdownView};
pub use error::{Error, Result};

pub use dropsearch_types::*;
