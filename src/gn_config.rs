// Simulation configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::gn_interface::{AgentType, Step};

// ============================================================================
// Main Configuration
// ============================================================================

/// Main configuration for a governance network run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Total number of steps executed by `run()`
    pub steps: usize,

    /// Population size per actor type
    pub num_agents_per_type: BTreeMap<AgentType, usize>,

    /// Fraction of strength lost by every edge each step (0.0 to 1.0)
    pub link_decay_rate: f64,

    /// Probability that the catalyst convenes a forum in a step (0.0 to 1.0)
    pub forum_frequency: f64,

    /// Joint resources a pair must exceed for a project to succeed
    pub project_resource_threshold: f64,

    /// Strength of a link created in the action phase
    pub initial_link_strength: f64,

    /// Strength added to every attendee pair of a forum
    pub forum_boost: f64,

    /// Strength added to the pair of a completed project
    pub project_boost: f64,

    /// Minimum (exclusive) tie strength before a neighbor is considered for a project
    pub project_strength_threshold: f64,

    /// Resources gained by each partner of a completed project
    pub project_payoff: f64,

    /// Strength used when an actor links to the opportunity node
    pub opportunity_link_strength: f64,

    /// Starting topology
    pub topology: TopologyConfig,

    /// Random seed for reproducibility (None = generate)
    pub seed: Option<u64>,

    /// Intervention scenario
    pub scenario: ScenarioKind,
}

// ============================================================================
// Initial Topology
// ============================================================================

/// Clustered cliques (one per type) joined by a few weak bridges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Strength of intra-type clique edges
    pub clique_strength: f64,

    /// Strength of cross-type bridging edges
    pub bridge_strength: f64,

    /// Number of random bridging attempts (same-type draws are discarded)
    pub bridge_attempts: usize,
}

// ============================================================================
// Scenario Selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Facilitation only, no interventions
    Baseline,

    /// The key actor is removed at `step`
    KeyActorDeparture { step: Step },

    /// An unbounded-resource opportunity node appears at `step`
    ResourceOpportunity { step: Step },
}

impl ScenarioKind {
    pub fn intervention_step(&self) -> Option<Step> {
        match self {
            ScenarioKind::Baseline => None,
            ScenarioKind::KeyActorDeparture { step } => Some(*step),
            ScenarioKind::ResourceOpportunity { step } => Some(*step),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Baseline => "baseline",
            ScenarioKind::KeyActorDeparture { .. } => "key_actor_departure",
            ScenarioKind::ResourceOpportunity { .. } => "resource_opportunity",
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration problems, reported before any step runs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A rate or probability lies outside [0, 1]
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// A parameter is NaN or infinite
    #[error("{name} must be finite")]
    NonFiniteParameter { name: &'static str },

    /// A magnitude parameter is negative
    #[error("{name} must not be negative, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },

    /// A singleton role has no population to be drawn from
    #[error("at least one {agent_type} actor is required to host the {role}")]
    MissingActorType {
        agent_type: AgentType,
        role: &'static str,
    },

    /// The intervention is scheduled outside [0, steps)
    #[error("intervention step {step} is outside the run of {steps} steps")]
    InterventionOutOfRange { step: Step, steps: usize },

    /// A run without steps
    #[error("steps must be at least 1")]
    ZeroSteps,
}

impl SimConfig {
    /// Number of actors of one type (0 when unlisted)
    pub fn count_of(&self, agent_type: AgentType) -> usize {
        self.num_agents_per_type.get(&agent_type).copied().unwrap_or(0)
    }

    pub fn total_actors(&self) -> usize {
        AgentType::ALL.iter().map(|t| self.count_of(*t)).sum()
    }

    /// Check every parameter range; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }

        check_rate("link_decay_rate", self.link_decay_rate)?;
        check_rate("forum_frequency", self.forum_frequency)?;
        check_rate("initial_link_strength", self.initial_link_strength)?;
        check_rate("project_strength_threshold", self.project_strength_threshold)?;
        check_rate("opportunity_link_strength", self.opportunity_link_strength)?;
        check_rate("topology.clique_strength", self.topology.clique_strength)?;
        check_rate("topology.bridge_strength", self.topology.bridge_strength)?;

        check_finite("project_resource_threshold", self.project_resource_threshold)?;
        check_magnitude("forum_boost", self.forum_boost)?;
        check_magnitude("project_boost", self.project_boost)?;
        check_magnitude("project_payoff", self.project_payoff)?;

        if self.count_of(AgentType::Academic) == 0 {
            return Err(ConfigError::MissingActorType {
                agent_type: AgentType::Academic,
                role: "catalyst",
            });
        }
        if self.count_of(AgentType::Government) == 0 {
            return Err(ConfigError::MissingActorType {
                agent_type: AgentType::Government,
                role: "key actor",
            });
        }

        if let Some(step) = self.scenario.intervention_step() {
            if step >= self.steps {
                return Err(ConfigError::InterventionOutOfRange {
                    step,
                    steps: self.steps,
                });
            }
        }

        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteParameter { name })
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

fn check_magnitude(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value < 0.0 {
        Err(ConfigError::NegativeParameter { name, value })
    } else {
        Ok(())
    }
}

// ============================================================================
// Default Implementations
// ============================================================================

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            num_agents_per_type: BTreeMap::from([
                (AgentType::Government, 5),
                (AgentType::Cso, 5),
                (AgentType::PrivateEnterprise, 3),
                (AgentType::Academic, 2),
            ]),
            link_decay_rate: 0.02,
            forum_frequency: 0.2,
            project_resource_threshold: 100.0,
            initial_link_strength: 0.05,
            forum_boost: 0.1,
            project_boost: 0.2,
            project_strength_threshold: 0.6,
            project_payoff: 10.0,
            opportunity_link_strength: 0.05,
            topology: TopologyConfig::default(),
            seed: None,
            scenario: ScenarioKind::Baseline,
        }
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            clique_strength: 0.7,
            bridge_strength: 0.1,
            bridge_attempts: 3,
        }
    }
}

impl Default for ScenarioKind {
    fn default() -> Self {
        Self::Baseline
    }
}
