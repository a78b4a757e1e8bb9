// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/key_actor_departure.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/baseline.yaml --seed 42
//   cargo run --bin scenario_runner scenarios/baseline.yaml --csv out/baseline --events

mod governance;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use gn_rust::{EventSink, NoOpSink, SimConfig, SimulationEngine, SimulationResult};
use governance::{export_actor_records, export_model_records, ConsoleEventSink, CsvEventSink, MultiEventSink};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Model parameters; anything omitted keeps its default
    #[serde(default)]
    config: SimConfig,

    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
    hypothesis: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct OutputConfig {
    /// Prefix for `<prefix>_model.csv`, `<prefix>_actors.csv` and `<prefix>_events.csv`
    csv_prefix: Option<String>,

    /// Print every event to the console
    #[serde(default)]
    print_events: bool,
}

/// Command line overrides, applied on top of each scenario file
#[derive(Debug, Default)]
struct Overrides {
    seed: Option<u64>,
    csv_prefix: Option<String>,
    print_events: bool,
}

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <scenario.yaml | directory/> [--seed SEED] [--csv PREFIX] [--events]",
            args[0]
        );
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/resource_opportunity.yaml --seed 42", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let overrides = parse_overrides(&args[2..]);

    if path.is_file() {
        run_scenario_file(path, &overrides);
    } else if path.is_dir() {
        run_scenario_directory(path, &overrides);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn parse_overrides(args: &[String]) -> Overrides {
    let mut overrides = Overrides::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().unwrap_or_else(|| {
                    eprintln!("--seed needs a value");
                    std::process::exit(1);
                });
                overrides.seed = Some(parse_seed(value));
            }
            "--csv" => {
                let value = iter.next().unwrap_or_else(|| {
                    eprintln!("--csv needs a path prefix");
                    std::process::exit(1);
                });
                overrides.csv_prefix = Some(value.clone());
            }
            "--events" => overrides.print_events = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    overrides
}

/// Decimal, or hex with a 0x prefix
fn parse_seed(text: &str) -> u64 {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };

    parsed.unwrap_or_else(|e| {
        eprintln!("Invalid seed {}: {}", text, e);
        std::process::exit(1);
    })
}

fn run_scenario_directory(dir: &Path, overrides: &Overrides) {
    let mut scenarios: Vec<PathBuf> = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str());
            if ext == Some("yaml") || ext == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, overrides);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
}

fn run_scenario_file(path: &Path, overrides: &Overrides) {
    println!("Loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scenario")
        .to_string();
    let name = scenario.meta.name.clone().unwrap_or_else(|| stem.clone());

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  {}{}║", name, " ".repeat(54_usize.saturating_sub(name.len())));
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    let mut config = scenario.config;
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }

    println!("Configuration:");
    println!("  Steps: {}", config.steps);
    println!("  Actors: {}", config.total_actors());
    println!("  Scenario: {:?}", config.scenario);
    println!("  Forum Frequency: {:.2}", config.forum_frequency);
    println!("  Link Decay Rate: {:.3}", config.link_decay_rate);
    println!("\nStarting simulation...\n");

    let csv_prefix = overrides
        .csv_prefix
        .clone()
        .or(scenario.output.csv_prefix);
    let print_events = overrides.print_events || scenario.output.print_events;

    let sink = build_sink(csv_prefix.as_deref(), print_events);
    let engine = SimulationEngine::new_with_sink(config, sink).unwrap_or_else(|e| {
        eprintln!("Invalid configuration in {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let result = engine.run();
    result.print_summary();

    if let Some(prefix) = csv_prefix {
        let model_path = format!("{}_model.csv", prefix);
        let actor_path = format!("{}_actors.csv", prefix);

        match export_records(&result, &model_path, &actor_path) {
            Ok(()) => info!("records exported to {} and {}", model_path, actor_path),
            Err(e) => eprintln!("Failed to export records: {}", e),
        }
    }

    println!("\n✓ Scenario complete!\n");
}

/// Both record tables; the first failure names the file it was writing
fn export_records(
    result: &SimulationResult,
    model_path: &str,
    actor_path: &str,
) -> Result<(), String> {
    export_model_records(result, model_path).map_err(|e| format!("{}: {}", model_path, e))?;
    export_actor_records(result, actor_path).map_err(|e| format!("{}: {}", actor_path, e))?;
    Ok(())
}

fn build_sink(csv_prefix: Option<&str>, print_events: bool) -> Box<dyn EventSink> {
    let mut sinks = MultiEventSink::new();

    if print_events {
        sinks.add_sink(Box::new(ConsoleEventSink::new(true)));
    }

    if let Some(prefix) = csv_prefix {
        let events_path = format!("{}_events.csv", prefix);
        match CsvEventSink::new(&events_path) {
            Ok(sink) => sinks.add_sink(Box::new(sink)),
            Err(e) => eprintln!("Failed to create {}: {}", events_path, e),
        }
    }

    if sinks.is_empty() {
        Box::new(NoOpSink)
    } else {
        Box::new(sinks)
    }
}
