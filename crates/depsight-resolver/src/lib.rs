//! Resolution result model: the per-component outcome state machine,
//! resolution failures, Maven version semantics, pluggable version ordering,
//! and the resolved dependency graph handed over by the graph builder.

pub mod failure;
pub mod graph;
pub mod ordering;
pub mod outcome;
pub mod snapshot;
pub mod version;
