use std::sync::Arc;

use capsule_core::{BlockPos, Blueprint, CaptureRegion, DimensionId, Facing, SharedConfig};
use capsule_persist::{BlueprintStore, BlueprintSummary};

use crate::access::{BlockStateCodec, BlockStateTransform, WorldMutator, WorldReader};
use crate::cache::BlueprintCache;
use crate::capture::capture_region;
use crate::error::CapsuleError;
use crate::placement::{PlacementQueue, PlacementScheduler, StepReport, TaskId};
use crate::plan::PlacementPlan;

/// Everything a host needs to capture, store and rebuild structures.
///
/// Capture, save and load do blocking I/O and belong outside the scheduling
/// cycle; [`CapsuleService::tick`] never touches the disk.
pub struct CapsuleService<S> {
    store: BlueprintStore,
    cache: BlueprintCache,
    scheduler: PlacementScheduler<S>,
    config: SharedConfig,
}

impl<S> CapsuleService<S> {
    pub fn new(store: BlueprintStore, config: SharedConfig) -> Self {
        Self {
            store,
            cache: BlueprintCache::new(),
            scheduler: PlacementScheduler::new(),
            config,
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn store(&self) -> &BlueprintStore {
        &self.store
    }

    /// Scan a region, persist it under `name` and return the new blueprint.
    pub fn capture<R, C>(
        &mut self,
        reader: &R,
        codec: &C,
        dimension: &DimensionId,
        corner1: BlockPos,
        corner2: BlockPos,
        name: &str,
    ) -> Result<Arc<Blueprint>, CapsuleError>
    where
        R: WorldReader<S> + ?Sized,
        C: BlockStateCodec<S> + ?Sized,
    {
        let region = CaptureRegion::from_corners(corner1, corner2);
        self.config
            .snapshot()
            .validate_capture(name, dimension, &region)?;

        let blueprint = capture_region(reader, codec, corner1, corner2, name);
        self.store.save(&blueprint)?;
        Ok(self.cache.insert(blueprint))
    }

    /// Cached load of the blueprint stored under `name`.
    pub fn blueprint(&mut self, name: &str) -> Result<Arc<Blueprint>, CapsuleError> {
        Ok(self.cache.get_or_load(&self.store, name)?)
    }

    /// Queue `name` for placement at `origin`. Blocks start appearing on the
    /// following ticks.
    pub fn place<C>(
        &mut self,
        codec: &C,
        name: &str,
        dimension: DimensionId,
        origin: BlockPos,
        facing: Facing,
    ) -> Result<TaskId, CapsuleError>
    where
        C: BlockStateCodec<S> + ?Sized,
    {
        self.config.snapshot().check_dimension(&dimension)?;

        let blueprint = self.blueprint(name)?;
        let plan = Arc::new(PlacementPlan::resolve(&blueprint, codec));
        let id = self.scheduler.enqueue(dimension, origin, plan, facing);
        log::info!(
            "queued placement {id} of '{}' at {origin} facing {facing:?}",
            blueprint.name
        );
        Ok(id)
    }

    pub fn list(&self) -> Result<Vec<String>, CapsuleError> {
        Ok(self.store.list()?)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    pub fn summary(&self, name: &str) -> Result<BlueprintSummary, CapsuleError> {
        Ok(self.store.summary(name)?)
    }

    /// Producer handle for enqueuing prepared plans from other threads.
    pub fn queue(&self) -> PlacementQueue<S> {
        self.scheduler.queue()
    }

    pub fn pending(&mut self) -> usize {
        self.scheduler.pending()
    }

    /// Drop cached copies so the next placement re-reads the store.
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }
}

impl<S: Clone> CapsuleService<S> {
    /// One scheduling cycle, with the budget read fresh from config.
    pub fn tick<W, T>(&mut self, world: &mut W, transform: &T) -> StepReport
    where
        W: WorldMutator<S> + ?Sized,
        T: BlockStateTransform<S> + ?Sized,
    {
        let budget = self.config.blocks_per_cycle();
        self.scheduler.step(budget, world, transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryRegistry, MemoryState, MemoryWorld, PropertyRotator};
    use crate::test_dir::TestDir;
    use capsule_core::{CapsuleConfig, ValidationError};
    use glam::IVec3;

    const OVERWORLD: &str = "minecraft:overworld";

    fn service(dir: &TestDir, config: CapsuleConfig) -> CapsuleService<MemoryState> {
        let store = BlueprintStore::open(dir.path()).expect("open store");
        CapsuleService::new(store, SharedConfig::new(config))
    }

    fn small_house(world: &mut MemoryWorld) {
        for x in 0..3 {
            for z in 0..2 {
                world.put(IVec3::new(x, 64, z), "minecraft:cobblestone", &[]);
            }
        }
        world.put(
            IVec3::new(0, 65, 0),
            "minecraft:oak_stairs",
            &[("facing", "north"), ("half", "bottom")],
        );
        world.put(IVec3::new(2, 65, 1), "minecraft:oak_log", &[("axis", "x")]);
    }

    #[test]
    fn test_capture_then_place_elsewhere() {
        let dir = TestDir::new("service_roundtrip");
        let mut service = service(&dir, CapsuleConfig::default());
        let registry = MemoryRegistry::vanilla();
        let mut world = MemoryWorld::new(OVERWORLD);
        small_house(&mut world);
        let dim = world.dimension().clone();

        let captured = service
            .capture(
                &world,
                &registry,
                &dim,
                IVec3::new(2, 65, 1),
                IVec3::new(0, 64, 0),
                "House",
            )
            .expect("capture");
        assert_eq!(captured.block_count(), 8);
        assert!(service.exists("house"));
        assert_eq!(service.list().expect("list"), vec!["house".to_string()]);

        let summary = service.summary("House").expect("summary");
        assert_eq!(summary.size, IVec3::new(3, 2, 2));
        assert_eq!(summary.block_count, 8);

        let origin = IVec3::new(50, 64, 50);
        let id = service
            .place(&registry, "House", dim.clone(), origin, Facing::North)
            .expect("place");

        let report = service.tick(&mut world, &PropertyRotator);
        assert_eq!(report.completed, Some(id));
        assert_eq!(report.placed, 8);
        assert_eq!(world.block_count(), 16);
        assert_eq!(
            world.get(origin + IVec3::new(0, 1, 0)),
            world.get(IVec3::new(0, 65, 0))
        );
    }

    #[test]
    fn test_captured_blueprint_survives_store() {
        let dir = TestDir::new("service_store_roundtrip");
        let mut service = service(&dir, CapsuleConfig::default());
        let registry = MemoryRegistry::vanilla();
        let mut world = MemoryWorld::new(OVERWORLD);
        small_house(&mut world);
        let dim = world.dimension().clone();

        let captured = service
            .capture(
                &world,
                &registry,
                &dim,
                IVec3::new(0, 64, 0),
                IVec3::new(2, 65, 1),
                "Cottage",
            )
            .expect("capture");
        let stored = service.store().load("Cottage").expect("load");
        assert_eq!(stored, *captured);

        let stairs = stored
            .entries
            .iter()
            .find(|e| e.block == "minecraft:oak_stairs")
            .expect("stairs captured");
        assert_eq!(stairs.properties.get("facing").map(String::as_str), Some("north"));
        assert_eq!(stairs.properties.get("half").map(String::as_str), Some("bottom"));
    }

    #[test]
    fn test_tick_uses_current_budget() {
        let dir = TestDir::new("service_budget");
        let config = CapsuleConfig {
            blocks_per_cycle: 3,
            ..CapsuleConfig::default()
        };
        let mut service = service(&dir, config);
        let registry = MemoryRegistry::vanilla();
        let mut world = MemoryWorld::new(OVERWORLD);
        small_house(&mut world);
        let dim = world.dimension().clone();

        service
            .capture(
                &world,
                &registry,
                &dim,
                IVec3::new(0, 64, 0),
                IVec3::new(2, 65, 1),
                "house",
            )
            .expect("capture");
        service
            .place(&registry, "house", dim, IVec3::new(0, 80, 0), Facing::West)
            .expect("place");

        assert_eq!(service.tick(&mut world, &PropertyRotator).placed, 3);

        let mut bigger = service.config().snapshot();
        bigger.blocks_per_cycle = 100;
        service.config().replace(bigger);

        let report = service.tick(&mut world, &PropertyRotator);
        assert_eq!(report.placed, 5);
        assert!(report.completed.is_some());
        assert_eq!(service.pending(), 0);
    }

    #[test]
    fn test_capture_rejects_oversize_region() {
        let dir = TestDir::new("service_oversize");
        let config = CapsuleConfig {
            max_capture_volume: 10,
            ..CapsuleConfig::default()
        };
        let mut service = service(&dir, config);
        let world = MemoryWorld::new(OVERWORLD);
        let dim = world.dimension().clone();

        let err = service
            .capture(
                &world,
                &MemoryRegistry::vanilla(),
                &dim,
                IVec3::ZERO,
                IVec3::new(2, 1, 1),
                "big",
            )
            .expect_err("12 > 10");
        assert!(matches!(
            err,
            CapsuleError::Validation(ValidationError::OversizeRegion { volume: 12, max: 10 })
        ));
        assert!(!service.exists("big"));
    }

    #[test]
    fn test_capture_rejects_bad_name() {
        let dir = TestDir::new("service_bad_name");
        let mut service = service(&dir, CapsuleConfig::default());
        let world = MemoryWorld::new(OVERWORLD);
        let dim = world.dimension().clone();

        let err = service
            .capture(
                &world,
                &MemoryRegistry::vanilla(),
                &dim,
                IVec3::ZERO,
                IVec3::ONE,
                "",
            )
            .expect_err("empty name");
        assert!(matches!(err, CapsuleError::Validation(ValidationError::EmptyName)));
    }

    #[test]
    fn test_disallowed_dimension_rejected() {
        let dir = TestDir::new("service_dimension");
        let config = CapsuleConfig {
            allowed_dimensions: vec!["minecraft:overworld".to_string()],
            ..CapsuleConfig::default()
        };
        let mut service = service(&dir, config);
        let registry = MemoryRegistry::vanilla();
        let world = MemoryWorld::new("minecraft:the_nether");
        let nether = world.dimension().clone();

        let err = service
            .capture(
                &world,
                &registry,
                &nether,
                IVec3::ZERO,
                IVec3::ONE,
                "portal",
            )
            .expect_err("nether not allowed");
        assert!(matches!(
            err,
            CapsuleError::Validation(ValidationError::DimensionNotAllowed(_))
        ));

        let err = service
            .place(&registry, "portal", nether, IVec3::ZERO, Facing::North)
            .expect_err("nether not allowed");
        assert!(matches!(
            err,
            CapsuleError::Validation(ValidationError::DimensionNotAllowed(_))
        ));
        assert_eq!(service.pending(), 0);
    }

    #[test]
    fn test_place_missing_blueprint() {
        let dir = TestDir::new("service_missing");
        let mut service = service(&dir, CapsuleConfig::default());

        let err = service
            .place(
                &MemoryRegistry::vanilla(),
                "nowhere",
                OVERWORLD.into(),
                IVec3::ZERO,
                Facing::North,
            )
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_recapture_refreshes_cache() {
        let dir = TestDir::new("service_recapture");
        let mut service = service(&dir, CapsuleConfig::default());
        let registry = MemoryRegistry::vanilla();
        let mut world = MemoryWorld::new(OVERWORLD);
        let dim = world.dimension().clone();

        world.put(IVec3::ZERO, "minecraft:dirt", &[]);
        service
            .capture(
                &world,
                &registry,
                &dim,
                IVec3::ZERO,
                IVec3::ZERO,
                "pillar",
            )
            .expect("capture");
        let first = service.blueprint("pillar").expect("cached");
        assert_eq!(first.entries[0].block, "minecraft:dirt");

        world.put(IVec3::ZERO, "minecraft:gold_block", &[]);
        service
            .capture(
                &world,
                &registry,
                &dim,
                IVec3::ZERO,
                IVec3::ZERO,
                "Pillar",
            )
            .expect("recapture");
        let second = service.blueprint("pillar").expect("cached");
        assert_eq!(second.entries[0].block, "minecraft:gold_block");
    }
}
