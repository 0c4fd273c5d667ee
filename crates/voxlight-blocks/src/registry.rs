use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{Block, BlockId, MAX_LIGHT, Shape};

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub opacity: u8,
    pub emission: u8,
    pub shape: Shape,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            opacity: MAX_LIGHT,
            emission: 0,
            shape: Shape::Cube,
        }
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.opacity >= MAX_LIGHT
    }

    #[inline]
    pub fn is_full_block(&self) -> bool {
        self.shape.is_full_block()
    }
}

/// Dense block-type table. Resolved once at load and then shared read-only;
/// lookups are plain indexing by `BlockId`.
#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub unknown_block_id: Option<BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
            unknown_block_id: None,
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    /// Opacity of `b`; ids with no registered type are treated as fully opaque.
    #[inline]
    pub fn opacity(&self, b: Block) -> u8 {
        self.get(b.id).map(|ty| ty.opacity).unwrap_or(MAX_LIGHT)
    }

    #[inline]
    pub fn is_opaque(&self, b: Block) -> bool {
        self.opacity(b) >= MAX_LIGHT
    }

    #[inline]
    pub fn emission(&self, b: Block) -> u8 {
        self.get(b.id).map(|ty| ty.emission).unwrap_or(0)
    }

    #[inline]
    pub fn is_full_block(&self, b: Block) -> bool {
        self.get(b.id).map(|ty| ty.is_full_block()).unwrap_or(false)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Self::from_configs(cfg)
    }

    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        let unknown_name = cfg.unknown_block.clone();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as BlockId);
            let shape = match def.shape.as_deref() {
                None => Shape::Cube,
                Some(key) => Shape::from_key(key)
                    .ok_or_else(|| format!("block `{}`: unknown shape `{}`", def.name, key))?,
            };
            let default_opacity = if shape.is_full_block() { MAX_LIGHT } else { 0 };
            let opacity = def.opacity.unwrap_or(default_opacity);
            let emission = def.emission.unwrap_or(0);
            if opacity > MAX_LIGHT || emission > MAX_LIGHT {
                log::warn!(
                    "block `{}`: opacity {} / emission {} clamped to {}",
                    def.name,
                    opacity,
                    emission,
                    MAX_LIGHT
                );
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("block `{}` defined twice", def.name).into());
            }
            let ty = BlockType {
                id,
                name: def.name,
                opacity: opacity.min(MAX_LIGHT),
                emission: emission.min(MAX_LIGHT),
                shape,
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize(id as usize + 1, BlockType::placeholder(id));
            } else if !reg.blocks[id as usize].name.is_empty() {
                return Err(format!(
                    "block `{}` reuses id {} of `{}`",
                    ty.name, id, reg.blocks[id as usize].name
                )
                .into());
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }
        // Fix up ids of gap placeholders created by the resize above.
        for (i, ty) in reg.blocks.iter_mut().enumerate() {
            ty.id = i as BlockId;
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();

        match reg.id_by_name("air") {
            Some(id) if id == Block::AIR.id => {}
            Some(id) => return Err(format!("`air` must have id 0, found {id}").into()),
            None => return Err("blocks config must define `air`".into()),
        }
        if let Some(name) = unknown_name {
            reg.unknown_block_id = reg.id_by_name(&name);
            if reg.unknown_block_id.is_none() {
                log::warn!("unknown_block `{}` is not defined", name);
            }
        }
        log::debug!("block registry loaded: {} types", reg.by_name.len());
        Ok(reg)
    }

    /// Resolve `name`, falling back to the configured unknown block, then air.
    pub fn block_or_unknown(&self, name: &str) -> Block {
        self.id_by_name(name)
            .or(self.unknown_block_id)
            .map(Block::new)
            .unwrap_or(Block::AIR)
    }
}
