use std::collections::VecDeque;

use hashbrown::HashSet;
use voxlight_world::{BlockPos, ChunkCoord, LocalPos};

/// Address of one voxel: the chunk that owns it plus its position inside that
/// chunk. `pos` is the same voxel in world space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelRef {
    pub chunk: ChunkCoord,
    pub local: LocalPos,
    pub pos: BlockPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightNode {
    pub voxel: VoxelRef,
    pub level: u8,
}

impl LightNode {
    #[inline]
    pub fn new(voxel: VoxelRef, level: u8) -> Self {
        Self { voxel, level }
    }
}

/// Pending light work owned by one chunk.
#[derive(Clone, Debug, Default)]
pub struct LightQueues {
    pub sky_remove: VecDeque<LightNode>,
    pub sky_place: VecDeque<LightNode>,
    pub block_remove: VecDeque<LightNode>,
    pub block_place: VecDeque<LightNode>,
    /// Cells that just became sky 15 and should extend the ray below them.
    pub sky_extend: Vec<VoxelRef>,
    /// Cells that just lost sky 15 and should cut the ray below them.
    pub sky_block: Vec<VoxelRef>,
    /// Chunks whose meshes saw a light change during the current pass.
    pub dirty: HashSet<ChunkCoord>,
}

impl LightQueues {
    pub fn is_drained(&self) -> bool {
        self.sky_remove.is_empty()
            && self.sky_place.is_empty()
            && self.block_remove.is_empty()
            && self.block_place.is_empty()
            && self.sky_extend.is_empty()
            && self.sky_block.is_empty()
    }

    pub fn clear(&mut self) {
        self.sky_remove.clear();
        self.sky_place.clear();
        self.block_remove.clear();
        self.block_place.clear();
        self.sky_extend.clear();
        self.sky_block.clear();
        self.dirty.clear();
    }
}
