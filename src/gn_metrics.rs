//! Per-step data collection
//!
//! The collector appends one model-level record and one actor-level record per
//! live actor after every step. The accumulated records are the engine's whole
//! output contract; formatting and persistence belong to the caller.

use indexmap::IndexMap;
use serde::Serialize;

use crate::gn_actor::Actor;
use crate::gn_config::ScenarioKind;
use crate::gn_graph::RelationshipGraph;
use crate::gn_interface::{ActorId, AgentType, Step};

// ============================================================================
// Records
// ============================================================================

/// Network-wide state after a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub step: Step,
    pub density: f64,
    pub average_clustering: f64,
    pub edge_count: usize,
    pub successful_projects: usize,
    pub largest_component_size: usize,
    /// Mean hop count between mutually reachable nodes
    pub average_path_length: f64,
    /// Gini over actor resources; the opportunity node is excluded
    pub resource_gini: f64,
    /// Nodes in the graph, the opportunity node included
    pub node_count: usize,
    pub links_formed: usize,
    pub forum_held: bool,
    /// Degree of the opportunity node (0 until injected)
    pub opportunity_degree: usize,
}

/// State of one live actor after a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorRecord {
    pub step: Step,
    pub actor_id: ActorId,
    pub agent_type: AgentType,
    pub resources: f64,
    pub commitment: f64,
    pub degree: usize,
}

/// What happened during a step, as seen by the engine
#[derive(Debug, Clone, Copy, Default)]
pub struct StepActivity {
    pub successful_projects: usize,
    pub links_formed: usize,
    pub forum_held: bool,
}

// ============================================================================
// Collector
// ============================================================================

#[derive(Debug, Default)]
pub struct MetricsCollector {
    model_records: Vec<ModelRecord>,
    actor_records: Vec<ActorRecord>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(
        &mut self,
        step: Step,
        actors: &IndexMap<ActorId, Actor>,
        graph: &RelationshipGraph,
        opportunity_node: Option<ActorId>,
        activity: StepActivity,
    ) {
        let resources: Vec<f64> = actors.values().map(|a| a.resources).collect();

        self.model_records.push(ModelRecord {
            step,
            density: graph.density(),
            average_clustering: graph.average_clustering(),
            edge_count: graph.edge_count(),
            successful_projects: activity.successful_projects,
            largest_component_size: graph.largest_component_size(),
            average_path_length: graph.average_shortest_path_length(),
            resource_gini: RelationshipGraph::gini(&resources),
            node_count: graph.node_count(),
            links_formed: activity.links_formed,
            forum_held: activity.forum_held,
            opportunity_degree: opportunity_node.map(|id| graph.degree(id)).unwrap_or(0),
        });

        for actor in actors.values() {
            self.actor_records.push(ActorRecord {
                step,
                actor_id: actor.id,
                agent_type: actor.agent_type,
                resources: actor.resources,
                commitment: actor.commitment,
                degree: graph.degree(actor.id),
            });
        }
    }

    pub fn model_records(&self) -> &[ModelRecord] {
        &self.model_records
    }

    pub fn actor_records(&self) -> &[ActorRecord] {
        &self.actor_records
    }

    pub fn latest(&self) -> Option<&ModelRecord> {
        self.model_records.last()
    }

    pub fn into_records(self) -> (Vec<ModelRecord>, Vec<ActorRecord>) {
        (self.model_records, self.actor_records)
    }
}

// ============================================================================
// Simulation Result
// ============================================================================

/// Complete output of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Random seed used
    pub seed_used: u64,

    pub scenario: ScenarioKind,

    /// Total steps executed
    pub steps: usize,

    pub model_records: Vec<ModelRecord>,

    pub actor_records: Vec<ActorRecord>,
}

impl SimulationResult {
    pub fn final_record(&self) -> Option<&ModelRecord> {
        self.model_records.last()
    }

    pub fn record_at(&self, step: Step) -> Option<&ModelRecord> {
        self.model_records.iter().find(|r| r.step == step)
    }

    pub fn actors_at(&self, step: Step) -> impl Iterator<Item = &ActorRecord> {
        self.actor_records.iter().filter(move |r| r.step == step)
    }

    pub fn total_projects(&self) -> usize {
        self.model_records.iter().map(|r| r.successful_projects).sum()
    }

    /// Blake3 digest over the exact bit patterns of every record.
    /// Two runs agree on the fingerprint iff their record sequences are identical.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed_used.to_le_bytes());
        hasher.update(self.scenario.name().as_bytes());
        hasher.update(&(self.steps as u64).to_le_bytes());

        for r in &self.model_records {
            hasher.update(&(r.step as u64).to_le_bytes());
            hasher.update(&r.density.to_bits().to_le_bytes());
            hasher.update(&r.average_clustering.to_bits().to_le_bytes());
            hasher.update(&(r.edge_count as u64).to_le_bytes());
            hasher.update(&(r.successful_projects as u64).to_le_bytes());
            hasher.update(&(r.largest_component_size as u64).to_le_bytes());
            hasher.update(&r.average_path_length.to_bits().to_le_bytes());
            hasher.update(&r.resource_gini.to_bits().to_le_bytes());
            hasher.update(&(r.node_count as u64).to_le_bytes());
            hasher.update(&(r.links_formed as u64).to_le_bytes());
            hasher.update(&[r.forum_held as u8]);
            hasher.update(&(r.opportunity_degree as u64).to_le_bytes());
        }

        for r in &self.actor_records {
            hasher.update(&(r.step as u64).to_le_bytes());
            hasher.update(&r.actor_id.to_le_bytes());
            hasher.update(r.agent_type.label().as_bytes());
            hasher.update(&r.resources.to_bits().to_le_bytes());
            hasher.update(&r.commitment.to_bits().to_le_bytes());
            hasher.update(&(r.degree as u64).to_le_bytes());
        }

        *hasher.finalize().as_bytes()
    }

    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Print a summary of the simulation results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║    GOVERNANCE NETWORK SIMULATION RESULTS               ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Scenario: {:?}", self.scenario);
        println!("Seed: {}", self.seed_used);
        println!("Steps: {}", self.steps);
        println!();

        let Some(last) = self.final_record() else {
            println!("(no records)");
            return;
        };

        println!("═══ Final Network ═══");
        println!("  Nodes: {}, Edges: {}", last.node_count, last.edge_count);
        println!("  Density: {:.3}", last.density);
        println!("  Average Clustering: {:.3}", last.average_clustering);
        println!("  Largest Component: {}", last.largest_component_size);
        println!("  Average Path Length: {:.3}", last.average_path_length);
        if last.opportunity_degree > 0 {
            println!("  Opportunity Node Degree: {}", last.opportunity_degree);
        }
        println!();

        println!("═══ Activity ═══");
        let forums = self.model_records.iter().filter(|r| r.forum_held).count();
        let links: usize = self.model_records.iter().map(|r| r.links_formed).sum();
        println!("  Forums Held: {}", forums);
        println!("  Links Formed: {}", links);
        println!("  Successful Projects: {}", self.total_projects());
        println!();

        println!("═══ Resources ═══");
        println!("  Gini: {:.3}", last.resource_gini);
        println!("  Fingerprint: {}", self.fingerprint_hex());
        println!();
    }
}
