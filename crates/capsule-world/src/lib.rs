//! World-facing side of structure capsules: the capabilities a host
//! provides, capture, plan resolution, the placement scheduler and the
//! service object tying them to a blueprint store.

pub mod access;
pub mod cache;
pub mod capture;
pub mod error;
pub mod memory;
pub mod placement;
pub mod plan;
pub mod preview;
pub mod service;

#[cfg(test)]
mod test_dir;

pub use access::{BlockStateCodec, BlockStateTransform, WorldMutator, WorldReader};
pub use cache::BlueprintCache;
pub use capture::capture_region;
pub use error::{CapsuleError, MutationError};
pub use memory::{MemoryRegistry, MemoryState, MemoryWorld, PropertyRotator};
pub use placement::{
    PlacementQueue, PlacementScheduler, PlacementTask, StepReport, TaskId, TaskStats,
};
pub use plan::PlacementPlan;
pub use preview::GhostPreview;
pub use service::CapsuleService;
