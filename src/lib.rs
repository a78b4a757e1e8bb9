//! # gn_rust - Governance Network Simulation
//!
//! An agent-based model of a regional governance network. Actors of four types
//! (government, civil society, private enterprise, academia) hold weighted,
//! undirected relationships that decay every step and are reinforced by forums
//! convened by a catalyst actor, by dyadic link formation and by joint projects.
//! Scenario interventions (removal of a key actor, a large resource opportunity)
//! are applied on top of the baseline dynamics.
//!
//! ## Core Components
//!
//! - **SimulationEngine**: owns the population, the graph and the random stream,
//!   and advances them through a fixed phase order
//! - **RelationshipGraph**: weighted undirected graph and its structural metrics
//! - **gn_rules**: side-effect free decision probabilities
//! - **MetricsCollector / SimulationResult**: per-step model and actor records
//!
//! ## Usage
//!
//! ```no_run
//! use gn_rust::{ScenarioKind, SimConfig, SimulationEngine};
//!
//! let config = SimConfig {
//!     seed: Some(42),
//!     scenario: ScenarioKind::KeyActorDeparture { step: 50 },
//!     ..Default::default()
//! };
//!
//! let engine = SimulationEngine::new(config).expect("valid configuration");
//! let result = engine.run();
//! result.print_summary();
//! ```
//!
//! The same `(seed, config)` pair always reproduces the same records; see
//! `SimulationResult::fingerprint`.
//!
//! ## Simulator
//!
//! YAML-driven scenario runs and CSV export live in the separate `simulator/`
//! directory, built on this library.

// Shared types
pub mod gn_interface;
pub mod gn_random;

// Model state
pub mod gn_actor;
pub mod gn_graph;
pub mod gn_rules;

// Run setup and execution
pub mod gn_config;
pub mod gn_engine;
pub mod gn_init;
pub mod gn_metrics;
pub mod gn_scenario;

// Re-export commonly used types
pub use gn_actor::Actor;
pub use gn_config::{ConfigError, ScenarioKind, SimConfig, TopologyConfig};
pub use gn_engine::SimulationEngine;
pub use gn_graph::RelationshipGraph;
pub use gn_interface::{
    ActorId, AgentType, EventSink, NoOpSink, SimEvent, Step, StepPhase, OPPORTUNITY_RESOURCES,
};
pub use gn_metrics::{ActorRecord, ModelRecord, SimulationResult};
pub use gn_scenario::Intervention;
