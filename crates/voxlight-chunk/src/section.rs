use voxlight_blocks::Block;

use crate::LightStore;

/// Horizontal slab of a chunk, `size × height × size` voxels starting at
/// `y_offset`. Accessors take chunk-local x/z and global y.
#[derive(Clone, Debug)]
pub struct ChunkSection {
    pub y_offset: usize,
    size: usize,
    pub blocks: Vec<Block>,
    pub light: LightStore,
}

impl ChunkSection {
    pub fn new(y_offset: usize, size: usize, height: usize) -> Self {
        Self {
            y_offset,
            size,
            blocks: vec![Block::AIR; size * height * size],
            light: LightStore::new(size, height, size),
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        ((y - self.y_offset) * self.size + z) * self.size + x
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, b: Block) -> Block {
        let i = self.idx(x, y, z);
        std::mem::replace(&mut self.blocks[i], b)
    }

    #[inline]
    pub fn sky(&self, x: usize, y: usize, z: usize) -> u8 {
        self.light.get_sky(x, y - self.y_offset, z)
    }

    #[inline]
    pub fn block_light(&self, x: usize, y: usize, z: usize) -> u8 {
        self.light.get_block(x, y - self.y_offset, z)
    }

    #[inline]
    pub fn set_sky(&mut self, x: usize, y: usize, z: usize, v: u8) {
        self.light.set_sky(x, y - self.y_offset, z, v);
    }

    #[inline]
    pub fn set_block_light(&mut self, x: usize, y: usize, z: usize, v: u8) {
        self.light.set_block(x, y - self.y_offset, z, v);
    }

    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }
}
