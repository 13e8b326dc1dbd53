//! Core data types for tether.
//!
//! This crate defines what a dependency declaration is: numeric versions and
//! the constraints evaluated against them, dependency requirements and name
//! overrides, the descriptor that carries them, the line grammar descriptors
//! are written in, package file naming, and global configuration.
//!
//! This crate is intentionally free of resolution logic; see `tether-resolver`.

pub mod config;
pub mod dependency;
pub mod descriptor;
pub mod grammar;
pub mod naming;
pub mod version;
