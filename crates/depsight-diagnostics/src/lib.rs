//! Dependency insight: which edges of a resolved graph match a user query,
//! how they group by selected version, and how the result renders as text.

pub mod attributes;
pub mod failure;
pub mod insight;
pub mod renderable;
pub mod renderer;
pub mod spec;
