use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::{BlockPos, ChunkCoord, LocalPos};

/// Chunk footprint and vertical layout shared by every chunk in a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDims {
    /// Horizontal edge length of a chunk, in blocks.
    pub chunk_size: usize,
    pub world_height: usize,
    /// Height of one vertical section; `world_height` must be a multiple.
    pub section_height: usize,
}

impl Default for WorldDims {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            world_height: 128,
            section_height: 16,
        }
    }
}

impl WorldDims {
    pub fn new(
        chunk_size: usize,
        world_height: usize,
        section_height: usize,
    ) -> Result<Self, Box<dyn Error>> {
        let dims = Self {
            chunk_size,
            world_height,
            section_height,
        };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunk_size == 0 || self.world_height == 0 || self.section_height == 0 {
            return Err(format!("world dims must be non-zero: {:?}", self).into());
        }
        if self.world_height % self.section_height != 0 {
            return Err(format!(
                "world_height {} is not a multiple of section_height {}",
                self.world_height, self.section_height
            )
            .into());
        }
        if self.chunk_size > i32::MAX as usize || self.world_height > i32::MAX as usize {
            return Err(format!("world dims out of range: {:?}", self).into());
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let dims: WorldDims = toml::from_str(s)?;
        dims.validate()?;
        Ok(dims)
    }

    #[inline]
    pub fn sections(&self) -> usize {
        self.world_height / self.section_height
    }

    #[inline]
    pub fn section_index(&self, y: usize) -> usize {
        y / self.section_height
    }

    #[inline]
    pub fn contains_y(&self, y: i32) -> bool {
        y >= 0 && (y as usize) < self.world_height
    }

    #[inline]
    pub fn chunk_of(&self, pos: BlockPos) -> ChunkCoord {
        let s = self.chunk_size as i32;
        ChunkCoord::new(pos.x.div_euclid(s), pos.z.div_euclid(s))
    }

    /// Chunk-local position of `pos`, or `None` above the ceiling / below the floor.
    #[inline]
    pub fn local_of(&self, pos: BlockPos) -> Option<LocalPos> {
        if !self.contains_y(pos.y) {
            return None;
        }
        let s = self.chunk_size as i32;
        Some(LocalPos::new(
            pos.x.rem_euclid(s) as usize,
            pos.y as usize,
            pos.z.rem_euclid(s) as usize,
        ))
    }

    #[inline]
    pub fn world_of(&self, coord: ChunkCoord, local: LocalPos) -> BlockPos {
        let s = self.chunk_size as i32;
        BlockPos::new(
            coord.cx * s + local.x as i32,
            local.y as i32,
            coord.cz * s + local.z as i32,
        )
    }

    /// True if `local` sits on one of the four vertical borders of its chunk.
    #[inline]
    pub fn is_border(&self, local: LocalPos) -> bool {
        let last = self.chunk_size - 1;
        local.x == 0 || local.x == last || local.z == 0 || local.z == last
    }
}
