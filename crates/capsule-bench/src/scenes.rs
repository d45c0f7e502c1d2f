use capsule_core::constants::CHUNK_SIZE;
use capsule_core::types::block_to_chunk;
use capsule_core::{BlockEntry, BlockPos, BlockProperties, Blueprint, Facing};
use capsule_world::MemoryWorld;
use glam::IVec3;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Blueprint extent.
    pub size: [i32; 3],
    /// Fraction of voxels that hold a block, 0..=100.
    pub fill_pct: u32,
    /// Fraction of chunk columns under the footprint that are not resident, 0..=100.
    pub unloaded_pct: u32,
    pub facing: Facing,
}

pub const SCENE_DIMENSION: &str = "minecraft:overworld";

/// Placement origin used by every scene.
pub const SCENE_ORIGIN: BlockPos = IVec3::new(0, 64, 0);

/// Return the standard suite of benchmark scenes (4K to 250K voxels).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "16^3 dense",
            size: [16, 16, 16],
            fill_pct: 100,
            unloaded_pct: 0,
            facing: Facing::North,
        },
        SceneConfig {
            name: "32^3 hollow",
            size: [32, 32, 32],
            fill_pct: 30,
            unloaded_pct: 0,
            facing: Facing::North,
        },
        SceneConfig {
            name: "32^3 rotated",
            size: [32, 32, 32],
            fill_pct: 30,
            unloaded_pct: 0,
            facing: Facing::East,
        },
        SceneConfig {
            name: "64x32x64 half-resident",
            size: [64, 32, 64],
            fill_pct: 50,
            unloaded_pct: 50,
            facing: Facing::South,
        },
        SceneConfig {
            name: "64^3 dense",
            size: [64, 64, 64],
            fill_pct: 100,
            unloaded_pct: 0,
            facing: Facing::West,
        },
    ]
}

const PALETTE: [&str; 5] = [
    "minecraft:stone",
    "minecraft:cobblestone",
    "minecraft:oak_planks",
    "minecraft:glass",
    "minecraft:oak_log",
];

/// Deterministic pseudo-random value in 0..100 for a position.
fn position_hash(pos: BlockPos) -> u32 {
    let h = (pos.x as u32).wrapping_mul(73_856_093)
        ^ (pos.y as u32).wrapping_mul(19_349_663)
        ^ (pos.z as u32).wrapping_mul(83_492_791);
    h % 100
}

/// Generate the blueprint for a scene with a deterministic block mix.
/// Only `fill_pct` percent of voxels hold a block, the rest are omitted.
pub fn generate_blueprint(config: &SceneConfig) -> Blueprint {
    let size = IVec3::from_array(config.size);
    let mut entries = Vec::new();

    for x in 0..size.x {
        for y in 0..size.y {
            for z in 0..size.z {
                let pos = IVec3::new(x, y, z);
                let hash = position_hash(pos);
                if hash >= config.fill_pct {
                    continue;
                }
                let block = PALETTE[(hash as usize) % PALETTE.len()];
                let mut properties = BlockProperties::new();
                if block == "minecraft:oak_log" {
                    properties.insert("axis".to_string(), "x".to_string());
                }
                entries.push(BlockEntry::new(pos, block, properties));
            }
        }
    }

    Blueprint::new(config.name, size, entries)
}

/// Build the target world, unloading `unloaded_pct` percent of the chunk
/// columns under the placed footprint. Returns the world and the number of
/// unloaded columns.
pub fn scene_world(config: &SceneConfig) -> (MemoryWorld, u32) {
    let mut world = MemoryWorld::new(SCENE_DIMENSION);
    let footprint = config.facing.footprint(IVec3::from_array(config.size));
    let min = block_to_chunk(SCENE_ORIGIN);
    let max = block_to_chunk(SCENE_ORIGIN + footprint - IVec3::ONE);

    let mut unloaded = 0u32;
    for cx in min.x..=max.x {
        for cz in min.y..=max.y {
            let column = glam::IVec2::new(cx, cz);
            if position_hash(IVec3::new(cx, 0, cz) * CHUNK_SIZE as i32) < config.unloaded_pct {
                world.unload_chunk(column);
                unloaded += 1;
            }
        }
    }

    (world, unloaded)
}
