//! World geometry: chunk and block coordinates, faces, and sizing config.
#![forbid(unsafe_code)]

mod coord;
mod dims;
mod face;

pub use coord::{BlockPos, ChunkCoord, LocalPos};
pub use dims::WorldDims;
pub use face::Face;
