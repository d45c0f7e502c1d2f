use capsule_core::{BlockPos, Blueprint};
use glam::IVec3;

use crate::access::BlockStateCodec;

/// A blueprint resolved into host block states, ready to replay.
#[derive(Debug, Clone)]
pub struct PlacementPlan<S> {
    pub name: String,
    pub size: IVec3,
    /// Relative positions and states, in blueprint order.
    pub blocks: Vec<(BlockPos, S)>,
    /// Entries dropped because the host does not know their block type.
    pub dropped_entries: usize,
}

impl<S> PlacementPlan<S> {
    pub fn new(name: impl Into<String>, size: IVec3, blocks: Vec<(BlockPos, S)>) -> Self {
        Self {
            name: name.into(),
            size,
            blocks,
            dropped_entries: 0,
        }
    }

    /// Decode every entry of `blueprint` through `codec`.
    pub fn resolve<C>(blueprint: &Blueprint, codec: &C) -> Self
    where
        C: BlockStateCodec<S> + ?Sized,
    {
        let mut blocks = Vec::with_capacity(blueprint.block_count());
        let mut dropped = 0usize;

        for entry in &blueprint.entries {
            match codec.decode(&entry.block, &entry.properties) {
                Some(state) => blocks.push((entry.pos, state)),
                None => {
                    dropped += 1;
                    log::warn!(
                        "blueprint '{}': unknown block type {} at {}, skipping",
                        blueprint.name,
                        entry.block,
                        entry.pos
                    );
                }
            }
        }

        if dropped > 0 {
            log::warn!(
                "blueprint '{}': dropped {dropped} of {} entries",
                blueprint.name,
                blueprint.block_count()
            );
        }

        Self {
            name: blueprint.name.clone(),
            size: blueprint.size,
            blocks,
            dropped_entries: dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
