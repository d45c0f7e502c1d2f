//! Capabilities the host world supplies. The capsule logic only ever sees a
//! host through these traits, so it can be driven by any block-state type `S`.

use capsule_core::{BlockPos, BlockProperties, DimensionId, Rotation};

use crate::error::MutationError;

/// Read-only access to the world a capture scans.
pub trait WorldReader<S> {
    fn block_state(&self, pos: BlockPos) -> S;

    /// Whether `state` is an empty voxel that capture should omit.
    fn is_empty(&self, state: &S) -> bool;
}

/// Write access to the world a placement targets.
pub trait WorldMutator<S> {
    /// Whether the area containing `pos` is resident and ready for writes.
    fn is_region_available(&self, dimension: &DimensionId, pos: BlockPos) -> bool;

    /// Replace the block at `pos`. With `notify` the host runs its usual
    /// neighbor and client updates.
    fn set_block_state(
        &mut self,
        dimension: &DimensionId,
        pos: BlockPos,
        state: S,
        notify: bool,
    ) -> Result<(), MutationError>;
}

/// Conversion between host block states and their portable encoded form.
pub trait BlockStateCodec<S> {
    /// Block type id and property map of `state`.
    fn encode(&self, state: &S) -> (String, BlockProperties);

    /// Default state of a block type, or `None` if the host does not know it.
    fn default_state(&self, block: &str) -> Option<S>;

    /// `state` with one property replaced, or `None` if the key or value is
    /// not valid for this block type.
    fn with_property(&self, state: &S, key: &str, value: &str) -> Option<S>;

    /// Rebuild a state from its encoded form. Unknown block types yield
    /// `None`; invalid properties are dropped and the rest still apply.
    fn decode(&self, block: &str, properties: &BlockProperties) -> Option<S> {
        let mut state = self.default_state(block)?;
        for (key, value) in properties {
            match self.with_property(&state, key, value) {
                Some(next) => state = next,
                None => log::warn!("dropping invalid property {key}={value} on {block}"),
            }
        }
        Some(state)
    }
}

/// Orientation-aware rewrite of a block state (stairs, logs, doors...).
pub trait BlockStateTransform<S> {
    fn rotate(&self, state: S, rotation: Rotation) -> S;
}
