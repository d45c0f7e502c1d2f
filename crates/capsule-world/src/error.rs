use capsule_core::{BlockPos, DimensionId, ValidationError};
use capsule_persist::PersistError;

/// A host refused or failed to apply a block-state change.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("dimension {0} is not available")]
    UnknownDimension(DimensionId),

    #[error("block at {0} cannot be replaced")]
    Protected(BlockPos),

    #[error("host rejected mutation at {pos}: {reason}")]
    Rejected { pos: BlockPos, reason: String },
}

/// Errors surfaced by [`crate::CapsuleService`] requests.
#[derive(Debug, thiserror::Error)]
pub enum CapsuleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl CapsuleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CapsuleError::Persist(e) if e.is_not_found())
    }
}
