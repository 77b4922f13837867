//! Pull-based graph evaluation.
//!
//! Each tick clears the memoized node values and resolves nodes on demand,
//! recursively pulling inputs from upstream nodes through the link table.
//! Sinks (`Display`, `Plot`) emit their side effects the first time they are
//! resolved in a tick.

pub mod context;
pub mod engine;
pub mod highlight;
pub mod output;
pub mod samples;
