pub mod blueprint;
pub mod config;
pub mod constants;
pub mod error;
pub mod facing;
pub mod name;
pub mod types;

pub use blueprint::{BlockEntry, Blueprint, CaptureRegion};
pub use config::{CapsuleConfig, SharedConfig};
pub use error::{ConfigError, ValidationError};
pub use facing::{rotate_position, Facing, Rotation, ALL_FACINGS};
pub use name::{sanitize_name, validate_name};
pub use types::{BlockPos, BlockProperties, ChunkPos, DimensionId};
