use serde::Deserialize;

/// Top-level layout of `blocks.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    /// 0 = fully transparent, 15 = blocks both light channels.
    #[serde(default)]
    pub opacity: Option<u8>,
    #[serde(default)]
    pub emission: Option<u8>,
    /// One of `empty`, `cube`, `slab`, `cross`. Defaults to `cube`.
    #[serde(default)]
    pub shape: Option<String>,
}
