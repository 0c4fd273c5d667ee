//! Block values, shapes, and the immutable block-type registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{Block, BlockId, MAX_LIGHT, Shape};
