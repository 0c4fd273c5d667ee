//! Incremental sky and block light propagation across loaded chunks.
#![forbid(unsafe_code)]

mod edits;
mod engine;
mod recast;
mod sample;
mod sink;

pub use edits::apply_block_change;
pub use engine::{LightPassStats, LightingEngine};
pub use recast::cast_columns;
pub use sample::{LightSample, light_at};
pub use sink::RemeshSink;

#[cfg(test)]
mod tests;
