//! Dependency resolution engine: priority-ordered repository lookup, root
//! pins, name overrides, cycle-safe breadth-first expansion, conflict
//! reporting, and update scanning.

pub mod conflict;
pub mod environment;
pub mod graph;
pub mod package;
pub mod repository;
pub mod resolver;
pub mod update;
pub mod visited;
