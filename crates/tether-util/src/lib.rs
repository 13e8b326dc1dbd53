//! Shared utilities for tether.
//!
//! This crate provides cross-cutting concerns used by all other tether crates:
//! the unified error type, filesystem helpers, bounded retries for flaky reads,
//! and terminal status lines.

pub mod errors;
pub mod fs;
pub mod progress;
pub mod retry;
