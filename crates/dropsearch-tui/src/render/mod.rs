//! Rendering functions for the TUI.

mod dropdown;

pub use dropdown::render_dropdown;
