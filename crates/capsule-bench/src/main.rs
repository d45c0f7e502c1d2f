use std::path::PathBuf;
use std::process;

use capsule_bench::report;
use capsule_bench::runner::BenchmarkRunner;
use capsule_bench::scenes;
use capsule_core::constants::{DEFAULT_BLOCKS_PER_CYCLE, NOMINAL_CYCLES_PER_SECOND};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut budget = DEFAULT_BLOCKS_PER_CYCLE;
    let mut max_steps = 10_000u32;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--baseline", Some(v)) => baseline_path = Some(PathBuf::from(v)),
            ("--output", Some(v)) => output_path = Some(PathBuf::from(v)),
            ("--regression-threshold", Some(v)) => {
                regression_threshold = v.parse().expect("invalid --regression-threshold value");
            }
            ("--budget", Some(v)) => budget = v.parse().expect("invalid --budget value"),
            ("--max-steps", Some(v)) => max_steps = v.parse().expect("invalid --max-steps value"),
            ("--help" | "-h", _) => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --budget <n>                   Placements per step (default: 500)");
                eprintln!("  --max-steps <n>                Step limit per scene (default: 10000)");
                process::exit(0);
            }
            (other, _) => {
                eprintln!("Unknown or incomplete argument: {}", other);
                process::exit(1);
            }
        }
        i += 2;
    }

    log::info!(
        "Budget {} per step, {} blocks/s at the nominal {} steps/s",
        budget,
        budget as u64 * NOMINAL_CYCLES_PER_SECOND as u64,
        NOMINAL_CYCLES_PER_SECOND
    );
    let runner = BenchmarkRunner::new(budget, max_steps);

    let results: Vec<_> = scenes::standard_scenes()
        .iter()
        .map(|config| runner.run_scene(config))
        .collect();

    println!("\n## Benchmark Results (budget {budget})\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: format!("bench-{}", process::id()),
            budget,
            results: results.clone(),
        };
        report::save_baseline(path, &baseline).expect("failed to save baseline");
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            if baseline.budget != budget {
                log::warn!(
                    "Baseline was recorded with budget {}, current run uses {}",
                    baseline.budget,
                    budget
                );
            }
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}
