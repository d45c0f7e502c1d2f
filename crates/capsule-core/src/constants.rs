//! Shared constants for capture, persistence and placement.
//! Config defaults live here so that `CapsuleConfig::default()` and the
//! documentation agree on one set of numbers.

/// Maximum length of a blueprint name, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// File extension (without the dot) for persisted blueprints.
pub const BLUEPRINT_EXTENSION: &str = "scap";

/// Default upper bound on `size_x * size_y * size_z` for a capture.
pub const DEFAULT_MAX_CAPTURE_VOLUME: u64 = 5000;

/// Default number of successful placements per scheduling cycle.
pub const DEFAULT_BLOCKS_PER_CYCLE: u32 = 500;

/// Nominal scheduling cadence of the host driver (cycles per second).
pub const NOMINAL_CYCLES_PER_SECOND: u32 = 20;

/// Side length of a residency column in blocks (x and z).
pub const CHUNK_SIZE: u32 = 16;

/// Block id the reference host treats as the empty voxel.
pub const AIR_BLOCK: &str = "minecraft:air";

/// Dimensions a fresh config allows for capture and placement.
pub const DEFAULT_DIMENSIONS: [&str; 3] = [
    "minecraft:overworld",
    "minecraft:the_nether",
    "minecraft:the_end",
];
