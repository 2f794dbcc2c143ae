//! Core data types for depsight.
//!
//! This crate defines the vocabulary shared by the resolver model and the
//! insight engine: module and component identifiers, requested selectors,
//! attribute sets, and the global user configuration.
//!
//! This crate is intentionally free of graph logic and report rendering.

pub mod attributes;
pub mod config;
pub mod identifier;
