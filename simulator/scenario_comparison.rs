// Scenario Comparison
//
// Runs the baseline, key actor departure and resource opportunity scenarios
// from the same seed and lays their trajectories side by side around the
// intervention step.
//
// Run with: cargo run --example scenario_comparison --release [-- SEED]

mod governance;

use std::collections::BTreeMap;

use gn_rust::{
    ActorId, AgentType, ScenarioKind, SimConfig, SimEvent, SimulationEngine, SimulationResult, Step,
};
use governance::{CollectorEventSink, EventTypeCounts, SharedSink};
use log::info;
use simple_logger::SimpleLogger;

const INTERVENTION_STEP: usize = 50;

fn main() {
    SimpleLogger::new().init().unwrap();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO: Intervention Comparison                     ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Objective:");
    println!("  Compare network cohesion and resource inequality with and");
    println!("  without an intervention at step {}.\n", INTERVENTION_STEP);
    println!("Scenarios:");
    println!("  - baseline: catalyst-led forums only");
    println!("  - key_actor_departure: the key government actor leaves");
    println!("  - resource_opportunity: an external opportunity node appears");
    println!("\nSeed: {}\n", seed);

    let scenarios = [
        ScenarioKind::Baseline,
        ScenarioKind::KeyActorDeparture {
            step: INTERVENTION_STEP,
        },
        ScenarioKind::ResourceOpportunity {
            step: INTERVENTION_STEP,
        },
    ];

    let mut runs: Vec<(SimulationResult, EventTypeCounts)> = Vec::new();
    let mut removals: Vec<(Step, ActorId, usize)> = Vec::new();
    for scenario in scenarios {
        let config = comparison_config(seed, scenario);
        let (sink, events) = SharedSink::new(CollectorEventSink::new());

        let engine = SimulationEngine::new_with_sink(config, Box::new(sink)).unwrap_or_else(|e| {
            eprintln!("Invalid configuration for {}: {}", scenario.name(), e);
            std::process::exit(1);
        });
        let result = engine.run();
        let counts = events.borrow().count_by_type();
        for record in events.borrow().removals() {
            if let SimEvent::ActorRemoved {
                actor,
                edges_removed,
            } = record.event
            {
                removals.push((record.step, actor, edges_removed));
            }
        }

        info!(
            "{}: {} links, {} projects, fingerprint {}",
            scenario.name(),
            counts.links_formed,
            counts.projects_completed,
            &result.fingerprint_hex()[..16]
        );
        runs.push((result, counts));
    }

    print_trajectory_table(&runs);
    print_activity_table(&runs);

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Analysis                                              ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let lcc = |result: &SimulationResult, step: usize| {
        result
            .record_at(step)
            .map(|r| r.largest_component_size)
            .unwrap_or(0)
    };
    for (step, actor, edges) in &removals {
        println!(
            "  Key actor {} left at step {}, taking {} ties with it",
            actor, step, edges
        );
    }
    let departure = &runs[1].0;
    println!(
        "  Key actor departure: largest component {} -> {} across the intervention",
        lcc(departure, INTERVENTION_STEP - 1),
        lcc(departure, INTERVENTION_STEP + 1)
    );

    let opportunity = &runs[2].0;
    if let Some(last) = opportunity.final_record() {
        println!(
            "  Resource opportunity: {} actors linked to the opportunity, final gini {:.3}",
            last.opportunity_degree, last.resource_gini
        );
    }
    if let Some(last) = runs[0].0.final_record() {
        println!("  Baseline: final gini {:.3}, density {:.3}", last.resource_gini, last.density);
    }
    println!();
}

fn comparison_config(seed: u64, scenario: ScenarioKind) -> SimConfig {
    SimConfig {
        steps: 100,
        num_agents_per_type: BTreeMap::from([
            (AgentType::Government, 3),
            (AgentType::Cso, 3),
            (AgentType::PrivateEnterprise, 3),
            (AgentType::Academic, 2),
        ]),
        forum_frequency: 0.5,
        seed: Some(seed),
        scenario,
        ..Default::default()
    }
}

fn print_trajectory_table(runs: &[(SimulationResult, EventTypeCounts)]) {
    println!("═══ Trajectories ═══");
    println!(
        "  {:>5} | {:^23} | {:^23} | {:^23}",
        "step", "baseline", "departure", "opportunity"
    );
    println!(
        "  {:>5} | {:>7} {:>7} {:>7} | {:>7} {:>7} {:>7} | {:>7} {:>7} {:>7}",
        "", "dens", "lcc", "gini", "dens", "lcc", "gini", "dens", "lcc", "gini"
    );

    let checkpoints = [0, 25, INTERVENTION_STEP - 1, INTERVENTION_STEP, INTERVENTION_STEP + 1, 75, 99];
    for step in checkpoints {
        let mut line = format!("  {:>5}", step);
        for (result, _) in runs {
            match result.record_at(step) {
                Some(r) => line.push_str(&format!(
                    " | {:>7.3} {:>7} {:>7.3}",
                    r.density, r.largest_component_size, r.resource_gini
                )),
                None => line.push_str(&format!(" | {:>23}", "-")),
            }
        }
        println!("{}", line);
    }
    println!();
}

fn print_activity_table(runs: &[(SimulationResult, EventTypeCounts)]) {
    println!("═══ Activity ═══");
    println!(
        "  {:<22} {:>7} {:>7} {:>9} {:>12}",
        "scenario", "forums", "links", "projects", "opportunity"
    );
    for (result, counts) in runs {
        println!(
            "  {:<22} {:>7} {:>7} {:>9} {:>12}",
            result.scenario.name(),
            counts.forums,
            counts.links_formed,
            counts.projects_completed,
            counts.opportunity_links
        );
    }
}
