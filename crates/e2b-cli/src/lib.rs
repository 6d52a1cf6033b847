//! Batch pipeline components for the `e2b-convert` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
