use capsule_core::{rotate_position, BlockPos, Blueprint, Facing};
use glam::IVec3;

use crate::plan::PlacementPlan;

/// Where a placement would put its blocks, for wireframe previews.
///
/// Uses the same rotation as the scheduler, so the preview matches what
/// gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostPreview {
    pub origin: BlockPos,
    pub facing: Facing,
    /// Rotated bounding size.
    pub footprint: IVec3,
    /// Absolute position of every block, in placement order.
    pub positions: Vec<BlockPos>,
}

impl GhostPreview {
    pub fn new(blueprint: &Blueprint, origin: BlockPos, facing: Facing) -> Self {
        Self::from_relative(
            blueprint.size,
            blueprint.entries.iter().map(|e| e.pos),
            origin,
            facing,
        )
    }

    pub fn from_plan<S>(plan: &PlacementPlan<S>, origin: BlockPos, facing: Facing) -> Self {
        Self::from_relative(plan.size, plan.blocks.iter().map(|(p, _)| *p), origin, facing)
    }

    fn from_relative(
        size: IVec3,
        relative: impl Iterator<Item = BlockPos>,
        origin: BlockPos,
        facing: Facing,
    ) -> Self {
        let positions = relative
            .map(|pos| origin + rotate_position(pos, facing, size.x, size.z))
            .collect();
        Self {
            origin,
            facing,
            footprint: facing.footprint(size),
            positions,
        }
    }

    /// Inclusive min and max corners of the rotated bounding box.
    pub fn bounds(&self) -> (BlockPos, BlockPos) {
        (self.origin, self.origin + self.footprint - IVec3::ONE)
    }
}
