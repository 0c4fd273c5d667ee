use voxlight_blocks::MAX_LIGHT;
use voxlight_chunk::ChunkMap;
use voxlight_world::BlockPos;

/// Light levels at one position, as seen by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightSample {
    pub sky: u8,
    pub block: u8,
}

impl LightSample {
    /// What anything outside the loaded world reads as.
    pub const OPEN_AIR: LightSample = LightSample {
        sky: MAX_LIGHT,
        block: 0,
    };

    #[inline]
    pub fn combined(self) -> u8 {
        self.sky.max(self.block)
    }
}

/// Stored light at `pos`, or open air when `pos` is not in a loaded chunk.
pub fn light_at(map: &ChunkMap, pos: BlockPos) -> LightSample {
    match map.voxel(pos) {
        Some(v) => LightSample {
            sky: map.sky_light(v),
            block: map.block_light(v),
        },
        None => LightSample::OPEN_AIR,
    }
}
