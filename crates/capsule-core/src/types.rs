use std::collections::BTreeMap;
use std::fmt;

use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};

use crate::constants::CHUNK_SIZE;

/// Block coordinate, either world-absolute or relative to a blueprint origin.
pub type BlockPos = IVec3;

/// Residency column coordinate (x, z) in chunk space.
pub type ChunkPos = IVec2;

/// Encoded block-state properties. Keys are unique; order carries no meaning,
/// the map is sorted only so that equality and iteration are deterministic.
pub type BlockProperties = BTreeMap<String, String>;

/// Identifier of the world a placement targets (e.g. `minecraft:overworld`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionId(pub String);

impl DimensionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DimensionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Convert a block position to the residency column containing it.
pub fn block_to_chunk(pos: BlockPos) -> ChunkPos {
    let cs = CHUNK_SIZE as i32;
    IVec2::new(pos.x.div_euclid(cs), pos.z.div_euclid(cs))
}
