use voxlight_blocks::MAX_LIGHT;

const SKY_SHIFT: u8 = 4;
const NIBBLE: u8 = 0x0F;

/// Packed light levels for one section: sky in the high nibble, block light in
/// the low nibble, one byte per voxel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightStore {
    sx: usize,
    sy: usize,
    sz: usize,
    data: Vec<u8>,
}

impl LightStore {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            data: vec![0; sx * sy * sz],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.sx && y < self.sy && z < self.sz);
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get_sky(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[self.idx(x, y, z)] >> SKY_SHIFT
    }

    #[inline]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[self.idx(x, y, z)] & NIBBLE
    }

    #[inline]
    pub fn set_sky(&mut self, x: usize, y: usize, z: usize, v: u8) {
        let i = self.idx(x, y, z);
        let v = v.min(MAX_LIGHT);
        self.data[i] = (self.data[i] & NIBBLE) | (v << SKY_SHIFT);
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, v: u8) {
        let i = self.idx(x, y, z);
        let v = v.min(MAX_LIGHT);
        self.data[i] = (self.data[i] & !NIBBLE) | v;
    }

    #[inline]
    pub fn get_combined(&self, x: usize, y: usize, z: usize) -> u8 {
        self.get_sky(x, y, z).max(self.get_block(x, y, z))
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw packed bytes, in `idx` order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
