use voxlight_blocks::Block;
use voxlight_world::{BlockPos, ChunkCoord, LocalPos, WorldDims};

use crate::{ChunkSection, LightQueues};

/// Full-height column of sections plus the light work queued against it.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub dims: WorldDims,
    pub sections: Vec<ChunkSection>,
    pub queues: LightQueues,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, dims: WorldDims) -> Self {
        let sections = (0..dims.sections())
            .map(|i| {
                ChunkSection::new(i * dims.section_height, dims.chunk_size, dims.section_height)
            })
            .collect();
        Self {
            coord,
            dims,
            sections,
            queues: LightQueues::default(),
        }
    }

    /// Build a chunk by asking `f` for the block at every local position.
    pub fn from_fn(
        coord: ChunkCoord,
        dims: WorldDims,
        mut f: impl FnMut(LocalPos) -> Block,
    ) -> Self {
        let mut chunk = Self::new(coord, dims);
        for y in 0..dims.world_height {
            for z in 0..dims.chunk_size {
                for x in 0..dims.chunk_size {
                    let local = LocalPos::new(x, y, z);
                    let b = f(local);
                    if !b.is_air() {
                        chunk.set_block(local, b);
                    }
                }
            }
        }
        chunk
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dims.chunk_size
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.world_height
    }

    #[inline]
    fn section(&self, y: usize) -> &ChunkSection {
        &self.sections[self.dims.section_index(y)]
    }

    #[inline]
    fn section_mut(&mut self, y: usize) -> &mut ChunkSection {
        let i = self.dims.section_index(y);
        &mut self.sections[i]
    }

    #[inline]
    pub fn block(&self, p: LocalPos) -> Block {
        self.section(p.y).block(p.x, p.y, p.z)
    }

    /// Store `b` at `p`, returning the block it replaced. Light is untouched.
    #[inline]
    pub fn set_block(&mut self, p: LocalPos, b: Block) -> Block {
        self.section_mut(p.y).set_block(p.x, p.y, p.z, b)
    }

    #[inline]
    pub fn sky_light(&self, p: LocalPos) -> u8 {
        self.section(p.y).sky(p.x, p.y, p.z)
    }

    #[inline]
    pub fn block_light(&self, p: LocalPos) -> u8 {
        self.section(p.y).block_light(p.x, p.y, p.z)
    }

    #[inline]
    pub fn combined_light(&self, p: LocalPos) -> u8 {
        self.sky_light(p).max(self.block_light(p))
    }

    #[inline]
    pub fn set_sky_light(&mut self, p: LocalPos, v: u8) {
        self.section_mut(p.y).set_sky(p.x, p.y, p.z, v);
    }

    #[inline]
    pub fn set_block_light(&mut self, p: LocalPos, v: u8) {
        self.section_mut(p.y).set_block_light(p.x, p.y, p.z, v);
    }

    /// Zero both light channels and drop any queued work.
    pub fn reset_light(&mut self) {
        for s in &mut self.sections {
            s.light.clear();
        }
        self.queues.clear();
    }

    #[inline]
    pub fn world_pos(&self, local: LocalPos) -> BlockPos {
        self.dims.world_of(self.coord, local)
    }

    /// Every local position, bottom layer first.
    pub fn positions(&self) -> impl Iterator<Item = LocalPos> + use<> {
        let size = self.dims.chunk_size;
        let height = self.dims.world_height;
        (0..height).flat_map(move |y| {
            (0..size).flat_map(move |z| (0..size).map(move |x| LocalPos::new(x, y, z)))
        })
    }
}
