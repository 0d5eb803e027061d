//! Styling helpers shared by the terminal renderer.
//!
//! - [`parse_hex_color`] - Config hex strings to ratatui colors
//! - [`blend`] - Linear mix of two colors, used to fade the cancel control
//! - [`contrast_fg`] - Readable foreground for a configured background

mod color;

pub use color::{blend, contrast_fg, parse_hex_color};
