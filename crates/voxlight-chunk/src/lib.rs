//! Chunk storage: packed light, sections, per-chunk light queues, and the chunk map.
#![forbid(unsafe_code)]

mod chunk;
mod light;
mod map;
mod queue;
mod section;

pub use chunk::Chunk;
pub use light::LightStore;
pub use map::ChunkMap;
pub use queue::{LightNode, LightQueues, VoxelRef};
pub use section::ChunkSection;
