//! Shared utilities for depsight.
//!
//! This crate provides cross-cutting concerns used by the other depsight
//! crates: the unified error type, a styled text buffer for reports, and
//! Cargo-style terminal status lines.

pub mod errors;
pub mod term;
