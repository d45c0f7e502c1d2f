use std::sync::Arc;
use std::time::Instant;

use capsule_world::{MemoryRegistry, PlacementPlan, PlacementScheduler, PropertyRotator};

use crate::scenes::{self, SceneConfig, SCENE_DIMENSION, SCENE_ORIGIN};

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub block_count: u32,
    pub unloaded_columns: u32,
    pub encoded_bytes: u64,
    pub encode_ms: f64,
    pub decode_ms: f64,
    pub step_count: u32,
    pub placed: u64,
    pub skipped: u64,
    /// Per-step scheduler timings.
    pub timings: TimingSeries,
}

/// Replays each scene through the codec and the placement scheduler
/// against an in-memory world.
pub struct BenchmarkRunner {
    budget: u32,
    max_steps: u32,
}

impl BenchmarkRunner {
    pub fn new(budget: u32, max_steps: u32) -> Self {
        Self { budget, max_steps }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({:?}, {}% fill, {}% unloaded)...",
            config.name,
            config.size,
            config.fill_pct,
            config.unloaded_pct
        );

        let blueprint = scenes::generate_blueprint(config);

        let encode_start = Instant::now();
        let bytes = capsule_persist::encode(&blueprint).expect("encode scene blueprint");
        let encode_ms = encode_start.elapsed().as_secs_f64() * 1000.0;

        let decode_start = Instant::now();
        let decoded = capsule_persist::decode(&bytes).expect("decode scene blueprint");
        let decode_ms = decode_start.elapsed().as_secs_f64() * 1000.0;

        let registry = MemoryRegistry::vanilla();
        let plan = Arc::new(PlacementPlan::resolve(&decoded, &registry));
        let (mut world, unloaded_columns) = scenes::scene_world(config);

        log::info!(
            "  {} blocks, {} bytes encoded, {} columns unloaded",
            blueprint.block_count(),
            bytes.len(),
            unloaded_columns
        );

        let mut scheduler = PlacementScheduler::new();
        scheduler.enqueue(SCENE_DIMENSION.into(), SCENE_ORIGIN, plan, config.facing);

        let mut step_times = Vec::new();
        let mut placed = 0u64;
        let mut skipped = 0u64;
        while !scheduler.is_idle() && (step_times.len() as u32) < self.max_steps {
            let step_start = Instant::now();
            let report = scheduler.step(self.budget, &mut world, &PropertyRotator);
            step_times.push(step_start.elapsed().as_secs_f64() * 1000.0);

            placed += report.placed as u64;
            skipped += report.skipped as u64;
        }

        if !scheduler.is_idle() {
            log::warn!(
                "  Scene '{}' hit the {} step limit before finishing",
                config.name,
                self.max_steps
            );
        }

        let timings = compute_timings(&step_times);
        log::info!(
            "  Done in {} steps: mean={:.3}ms, p95={:.3}ms, p99={:.3}ms",
            step_times.len(),
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        BenchmarkResult {
            scene_name: config.name.to_string(),
            block_count: blueprint.block_count() as u32,
            unloaded_columns,
            encoded_bytes: bytes.len() as u64,
            encode_ms,
            decode_ms,
            step_count: step_times.len() as u32,
            placed,
            skipped,
            timings,
        }
    }
}

/// Compute timing statistics from a list of step times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
