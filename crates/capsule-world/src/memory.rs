//! In-memory reference host: a sparse block map with chunk-column residency,
//! a small block registry, and a property-based rotation transform.

use std::collections::{BTreeMap, HashMap, HashSet};

use capsule_core::constants::AIR_BLOCK;
use capsule_core::types::block_to_chunk;
use capsule_core::{BlockPos, BlockProperties, ChunkPos, DimensionId, Rotation};

use crate::access::{BlockStateCodec, BlockStateTransform, WorldMutator, WorldReader};
use crate::error::MutationError;

/// Block state as the in-memory host stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryState {
    pub block: String,
    pub properties: BlockProperties,
}

impl MemoryState {
    pub fn new(block: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            properties: BlockProperties::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(AIR_BLOCK)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A single dimension held entirely in memory.
///
/// Every chunk column is resident unless explicitly unloaded. Positions with
/// no stored block read as air.
#[derive(Debug)]
pub struct MemoryWorld {
    dimension: DimensionId,
    blocks: HashMap<BlockPos, MemoryState>,
    unloaded: HashSet<ChunkPos>,
    protected: HashSet<BlockPos>,
    notified_writes: u64,
}

impl MemoryWorld {
    pub fn new(dimension: impl Into<DimensionId>) -> Self {
        Self {
            dimension: dimension.into(),
            blocks: HashMap::new(),
            unloaded: HashSet::new(),
            protected: HashSet::new(),
            notified_writes: 0,
        }
    }

    pub fn dimension(&self) -> &DimensionId {
        &self.dimension
    }

    /// Store a block directly, bypassing residency and protection.
    pub fn put(&mut self, pos: BlockPos, block: &str, properties: &[(&str, &str)]) {
        let state = properties
            .iter()
            .fold(MemoryState::new(block), |s, (k, v)| s.with(k, v));
        self.blocks.insert(pos, state);
    }

    pub fn get(&self, pos: BlockPos) -> Option<&MemoryState> {
        self.blocks.get(&pos)
    }

    /// Block id at `pos`, air when nothing is stored.
    pub fn block_at(&self, pos: BlockPos) -> &str {
        self.blocks
            .get(&pos)
            .map(|s| s.block.as_str())
            .unwrap_or(AIR_BLOCK)
    }

    /// Number of stored non-air blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn load_chunk(&mut self, chunk: ChunkPos) {
        self.unloaded.remove(&chunk);
    }

    pub fn unload_chunk(&mut self, chunk: ChunkPos) {
        self.unloaded.insert(chunk);
    }

    pub fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        !self.unloaded.contains(&chunk)
    }

    /// Make writes to `pos` fail with [`MutationError::Protected`].
    pub fn protect(&mut self, pos: BlockPos) {
        self.protected.insert(pos);
    }

    /// Successful writes made with `notify` set.
    pub fn notified_writes(&self) -> u64 {
        self.notified_writes
    }
}

impl WorldReader<MemoryState> for MemoryWorld {
    fn block_state(&self, pos: BlockPos) -> MemoryState {
        self.blocks.get(&pos).cloned().unwrap_or_else(MemoryState::air)
    }

    fn is_empty(&self, state: &MemoryState) -> bool {
        state.block == AIR_BLOCK
    }
}

impl WorldMutator<MemoryState> for MemoryWorld {
    fn is_region_available(&self, dimension: &DimensionId, pos: BlockPos) -> bool {
        *dimension == self.dimension && self.is_chunk_loaded(block_to_chunk(pos))
    }

    fn set_block_state(
        &mut self,
        dimension: &DimensionId,
        pos: BlockPos,
        state: MemoryState,
        notify: bool,
    ) -> Result<(), MutationError> {
        if *dimension != self.dimension {
            return Err(MutationError::UnknownDimension(dimension.clone()));
        }
        if self.protected.contains(&pos) {
            return Err(MutationError::Protected(pos));
        }

        if state.block == AIR_BLOCK {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
        if notify {
            self.notified_writes += 1;
        }
        Ok(())
    }
}

/// Known block types and the values each of their properties accepts.
/// The first listed value of a property is its default.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    blocks: HashMap<String, BTreeMap<String, Vec<String>>>,
}

const HORIZONTAL: &[&str] = &["north", "east", "south", "west"];
const AXES: &[&str] = &["y", "x", "z"];
const HALVES: &[&str] = &["bottom", "top"];
const BOOLEANS: &[&str] = &["false", "true"];

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handful of common blocks, enough for tests and benchmarks.
    pub fn vanilla() -> Self {
        let mut registry = Self::new();
        for block in [
            AIR_BLOCK,
            "minecraft:stone",
            "minecraft:cobblestone",
            "minecraft:stone_bricks",
            "minecraft:dirt",
            "minecraft:glass",
            "minecraft:oak_planks",
            "minecraft:spruce_planks",
            "minecraft:iron_block",
            "minecraft:gold_block",
        ] {
            registry.register(block, &[]);
        }
        registry.register("minecraft:oak_log", &[("axis", AXES)]);
        registry.register(
            "minecraft:oak_stairs",
            &[("facing", HORIZONTAL), ("half", HALVES)],
        );
        registry.register(
            "minecraft:furnace",
            &[("facing", HORIZONTAL), ("lit", BOOLEANS)],
        );
        registry
    }

    pub fn register(&mut self, block: &str, properties: &[(&str, &[&str])]) {
        let table = properties
            .iter()
            .map(|(key, values)| {
                let values = values.iter().map(|v| v.to_string()).collect();
                (key.to_string(), values)
            })
            .collect();
        self.blocks.insert(block.to_string(), table);
    }

    pub fn is_known(&self, block: &str) -> bool {
        self.blocks.contains_key(block)
    }
}

impl BlockStateCodec<MemoryState> for MemoryRegistry {
    fn encode(&self, state: &MemoryState) -> (String, BlockProperties) {
        (state.block.clone(), state.properties.clone())
    }

    fn default_state(&self, block: &str) -> Option<MemoryState> {
        let table = self.blocks.get(block)?;
        let mut state = MemoryState::new(block);
        for (key, values) in table {
            if let Some(default) = values.first() {
                state.properties.insert(key.clone(), default.clone());
            }
        }
        Some(state)
    }

    fn with_property(&self, state: &MemoryState, key: &str, value: &str) -> Option<MemoryState> {
        let allowed = self.blocks.get(&state.block)?.get(key)?;
        if !allowed.iter().any(|v| v == value) {
            return None;
        }
        Some(state.clone().with(key, value))
    }
}

/// Rotates horizontal `facing` properties and swaps `axis` between x and z
/// on odd quarter turns. Everything else passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyRotator;

impl BlockStateTransform<MemoryState> for PropertyRotator {
    fn rotate(&self, mut state: MemoryState, rotation: Rotation) -> MemoryState {
        let turns = rotation.quarter_turns() as usize;
        if turns == 0 {
            return state;
        }

        if let Some(facing) = state.properties.get_mut("facing") {
            if let Some(idx) = HORIZONTAL.iter().position(|d| *d == facing.as_str()) {
                *facing = HORIZONTAL[(idx + turns) % 4].to_string();
            }
        }

        if rotation.swaps_axes() {
            if let Some(axis) = state.properties.get_mut("axis") {
                match axis.as_str() {
                    "x" => *axis = "z".to_string(),
                    "z" => *axis = "x".to_string(),
                    _ => {}
                }
            }
        }

        state
    }
}
