//! Terminal host for the dropsearch widget.
//!
//! This crate provides the pieces of the terminal host that don't touch the
//! terminal: the row element type, config-driven index renderers, terminal
//! geometry and color helpers.

pub mod geometry;
pub mod row;
pub mod widgets;
