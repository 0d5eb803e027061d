//! Test module for dropsearch-core
//!
//! This module contains tests for:
//! - Search session sequencing and stale-response discard
//! - Dropdown focus/cancel transitions, text editing and view model
//! - Configuration loading and descriptor validation
//! - The tokio dispatcher round trip against the local backend

// Test modules use exact float comparisons and test-specific casts
#![allow(clippy::float_cmp, clippy::cast_possible_truncation)]

mod dispatch_tests;
