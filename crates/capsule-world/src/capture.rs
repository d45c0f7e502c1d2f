use capsule_core::{BlockEntry, BlockPos, Blueprint, CaptureRegion};

use crate::access::{BlockStateCodec, WorldReader};

/// Scan the cuboid between `corner1` and `corner2` (inclusive, any order)
/// into a blueprint named `name`.
///
/// Visits x-major, then y, then z, and records every non-empty voxel relative
/// to the minimum corner. Runs in O(volume); callers bound the volume first.
pub fn capture_region<S, R, C>(
    reader: &R,
    codec: &C,
    corner1: BlockPos,
    corner2: BlockPos,
    name: &str,
) -> Blueprint
where
    R: WorldReader<S> + ?Sized,
    C: BlockStateCodec<S> + ?Sized,
{
    let region = CaptureRegion::from_corners(corner1, corner2);
    let mut entries = Vec::new();

    for pos in region.positions() {
        let state = reader.block_state(pos);
        if reader.is_empty(&state) {
            continue;
        }
        let (block, properties) = codec.encode(&state);
        entries.push(BlockEntry::new(pos - region.min, block, properties));
    }

    log::debug!(
        "captured '{name}': {} blocks in {} voxels",
        entries.len(),
        region.volume()
    );
    Blueprint::new(name, region.size(), entries)
}
