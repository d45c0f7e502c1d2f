use glam::IVec3;

use crate::types::{BlockPos, BlockProperties};

/// One non-empty voxel of a blueprint: where it sits relative to the
/// blueprint origin and its block state in encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    /// Offset from the blueprint's minimum corner. Each axis lies in `[0, size)`.
    pub pos: BlockPos,
    /// Opaque block type identifier, e.g. `minecraft:oak_stairs`.
    pub block: String,
    pub properties: BlockProperties,
}

impl BlockEntry {
    pub fn new(pos: BlockPos, block: impl Into<String>, properties: BlockProperties) -> Self {
        Self {
            pos,
            block: block.into(),
            properties,
        }
    }
}

/// An immutable captured structure. Entries keep capture order; placement
/// replays them in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub name: String,
    /// Extent along each axis, every component >= 1.
    pub size: IVec3,
    pub entries: Vec<BlockEntry>,
}

impl Blueprint {
    pub fn new(name: impl Into<String>, size: IVec3, entries: Vec<BlockEntry>) -> Self {
        Self {
            name: name.into(),
            size,
            entries,
        }
    }

    pub fn block_count(&self) -> usize {
        self.entries.len()
    }

    pub fn volume(&self) -> u64 {
        self.size.x.max(0) as u64 * self.size.y.max(0) as u64 * self.size.z.max(0) as u64
    }

    /// Whether `pos` lies inside `[0, size)` on every axis.
    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.cmpge(IVec3::ZERO).all() && pos.cmplt(self.size).all()
    }
}

/// Inclusive cuboid given by two opposite corners in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl CaptureRegion {
    /// Normalize two corners into min/max form.
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Number of lattice points, computed in u64 so huge regions cannot overflow.
    pub fn volume(&self) -> u64 {
        let dx = (self.max.x as i64 - self.min.x as i64 + 1) as u64;
        let dy = (self.max.y as i64 - self.min.y as i64 + 1) as u64;
        let dz = (self.max.z as i64 - self.min.z as i64 + 1) as u64;
        dx.saturating_mul(dy).saturating_mul(dz)
    }

    /// Every lattice point, x-major, then y, then z.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (self.min.x..=self.max.x).flat_map(move |x| {
            (self.min.y..=self.max.y)
                .flat_map(move |y| (self.min.z..=self.max.z).map(move |z| IVec3::new(x, y, z)))
        })
    }
}
