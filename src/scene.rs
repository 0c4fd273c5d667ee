use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use voxlight_blocks::{Block, BlockRegistry};
use voxlight_chunk::Chunk;
use voxlight_runtime::RuntimeConfig;
use voxlight_world::{BlockPos, ChunkCoord, WorldDims};

/// Layout of `scene.toml`: a square of flat chunks plus scripted edits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Chunks from `-radius..=radius` on both axes.
    pub radius: i32,
    pub dims: WorldDims,
    pub runtime: RuntimeConfig,
    /// Ground layers, bottom first.
    pub layers: Vec<Layer>,
    pub edits: Vec<Edit>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            radius: 1,
            dims: WorldDims::default(),
            runtime: RuntimeConfig::default(),
            layers: Vec::new(),
            edits: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Layer {
    pub block: String,
    pub height: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Edit {
    pub at: [i32; 3],
    pub block: String,
}

impl Edit {
    pub fn pos(&self) -> BlockPos {
        BlockPos::new(self.at[0], self.at[1], self.at[2])
    }
}

impl Scene {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let scene: Scene = toml::from_str(s)?;
        scene.dims.validate()?;
        if scene.radius < 0 {
            return Err(format!("scene radius must be >= 0, got {}", scene.radius).into());
        }
        Ok(scene)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn coords(&self) -> Vec<ChunkCoord> {
        let r = self.radius;
        (-r..=r)
            .flat_map(|cz| (-r..=r).map(move |cx| ChunkCoord::new(cx, cz)))
            .collect()
    }

    /// Resolve layer names to `(block, top_exclusive)` spans.
    fn resolve_layers(&self, reg: &BlockRegistry) -> Vec<(Block, usize)> {
        let mut top = 0;
        self.layers
            .iter()
            .map(|l| {
                let block = reg.block_by_name(&l.block).unwrap_or_else(|| {
                    log::warn!("scene layer uses unknown block `{}`", l.block);
                    reg.block_or_unknown(&l.block)
                });
                top += l.height;
                (block, top)
            })
            .collect()
    }

    pub fn build_chunks(&self, reg: &BlockRegistry) -> Vec<Chunk> {
        let spans = self.resolve_layers(reg);
        self.coords()
            .into_iter()
            .map(|coord| {
                Chunk::from_fn(coord, self.dims, |l| {
                    spans
                        .iter()
                        .find(|(_, top)| l.y < *top)
                        .map(|(b, _)| *b)
                        .unwrap_or(Block::AIR)
                })
            })
            .collect()
    }
}
