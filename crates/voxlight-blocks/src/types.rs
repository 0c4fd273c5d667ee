use serde::{Deserialize, Serialize};

pub type BlockId = u16;

/// Highest level either light channel can hold, and the fully opaque opacity.
pub const MAX_LIGHT: u8 = 15;

/// A voxel as stored in a chunk section. Everything else about the block
/// (opacity, emission, shape) lives in the registry entry for `id`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
}

impl Block {
    pub const AIR: Block = Block { id: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Self::AIR.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Empty,
    Cube,
    Slab,
    Cross,
}

impl Shape {
    pub fn from_key(key: &str) -> Option<Shape> {
        match key {
            "empty" | "none" => Some(Shape::Empty),
            "cube" => Some(Shape::Cube),
            "slab" => Some(Shape::Slab),
            "cross" => Some(Shape::Cross),
            _ => None,
        }
    }

    #[inline]
    pub fn is_full_block(self) -> bool {
        matches!(self, Shape::Cube)
    }
}
