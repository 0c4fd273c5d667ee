use std::error::Error;

use hashbrown::HashMap;
use voxlight_blocks::Block;
use voxlight_world::{BlockPos, ChunkCoord, Face, WorldDims};

use crate::{Chunk, VoxelRef};

/// Loaded chunks keyed by column coordinate. All cross-chunk voxel access goes
/// through here; a `VoxelRef` whose chunk has been unloaded reads as dark air
/// and ignores writes.
#[derive(Debug, Default)]
pub struct ChunkMap {
    dims: WorldDims,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new(dims: WorldDims) -> Self {
        Self {
            dims,
            chunks: HashMap::new(),
        }
    }

    #[inline]
    pub fn dims(&self) -> WorldDims {
        self.dims
    }

    /// Add `chunk`, returning whatever chunk previously held its coordinate.
    pub fn insert(&mut self, chunk: Chunk) -> Result<Option<Chunk>, Box<dyn Error>> {
        if chunk.dims != self.dims {
            return Err(format!(
                "chunk {:?} has dims {:?}, map expects {:?}",
                chunk.coord, chunk.dims, self.dims
            )
            .into());
        }
        Ok(self.chunks.insert(chunk.coord, chunk))
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Loaded coordinates in sorted order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Resolve a world position to a loaded voxel.
    pub fn voxel(&self, pos: BlockPos) -> Option<VoxelRef> {
        let local = self.dims.local_of(pos)?;
        let chunk = self.dims.chunk_of(pos);
        if !self.contains(chunk) {
            return None;
        }
        Some(VoxelRef { chunk, local, pos })
    }

    #[inline]
    pub fn neighbor(&self, v: VoxelRef, face: Face) -> Option<VoxelRef> {
        self.voxel(v.pos.step(face))
    }

    /// The six face neighbors in `Face::ALL` order; `None` past the world
    /// floor/ceiling or inside an unloaded chunk.
    pub fn neighbors(&self, v: VoxelRef) -> [Option<VoxelRef>; 6] {
        Face::ALL.map(|f| self.neighbor(v, f))
    }

    #[inline]
    pub fn block(&self, v: VoxelRef) -> Block {
        self.get(v.chunk).map(|c| c.block(v.local)).unwrap_or(Block::AIR)
    }

    #[inline]
    pub fn sky_light(&self, v: VoxelRef) -> u8 {
        self.get(v.chunk).map(|c| c.sky_light(v.local)).unwrap_or(0)
    }

    #[inline]
    pub fn block_light(&self, v: VoxelRef) -> u8 {
        self.get(v.chunk).map(|c| c.block_light(v.local)).unwrap_or(0)
    }

    #[inline]
    pub fn set_sky_light(&mut self, v: VoxelRef, level: u8) {
        if let Some(c) = self.get_mut(v.chunk) {
            c.set_sky_light(v.local, level);
        }
    }

    #[inline]
    pub fn set_block_light(&mut self, v: VoxelRef, level: u8) {
        if let Some(c) = self.get_mut(v.chunk) {
            c.set_block_light(v.local, level);
        }
    }

    /// True if `pos` lies on a vertical border of its chunk.
    pub fn is_on_edge(&self, pos: BlockPos) -> bool {
        self.dims.local_of(pos).is_some_and(|l| self.dims.is_border(l))
    }

    /// Loaded chunks, other than the owner, that touch the border `pos` sits
    /// on. Corner voxels also report the diagonal chunk.
    pub fn neighbor_chunks(&self, pos: BlockPos) -> Vec<ChunkCoord> {
        let Some(local) = self.dims.local_of(pos) else {
            return Vec::new();
        };
        let home = self.dims.chunk_of(pos);
        let last = self.dims.chunk_size - 1;
        let mut offsets_x = vec![0];
        let mut offsets_z = vec![0];
        if local.x == 0 {
            offsets_x.push(-1);
        }
        if local.x == last {
            offsets_x.push(1);
        }
        if local.z == 0 {
            offsets_z.push(-1);
        }
        if local.z == last {
            offsets_z.push(1);
        }
        let mut out = Vec::new();
        for &dx in &offsets_x {
            for &dz in &offsets_z {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let c = home.offset(dx, dz);
                if self.contains(c) && !out.contains(&c) {
                    out.push(c);
                }
            }
        }
        out
    }
}
