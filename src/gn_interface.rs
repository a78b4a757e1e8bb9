// Shared vocabulary of the governance network simulation

use serde::{Deserialize, Serialize};

// ids are handed out sequentially and never reused
pub type ActorId = u64;

// 0-based step index
pub type Step = usize;

/// Resources attributed to the opportunity node.
/// Finite, but large enough never to be the binding constraint in a comparison.
pub const OPPORTUNITY_RESOURCES: f64 = 1.0e6;

/// Scale that maps a resource difference (or an absolute resource level) into [0, 1].
pub const RESOURCE_SCALE: f64 = 100.0;

/// Commitment forced onto the key actor (the Environmental Management Unit).
pub const KEY_ACTOR_COMMITMENT: f64 = 0.95;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Government,
    Cso,
    PrivateEnterprise,
    Academic,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Government,
        AgentType::Cso,
        AgentType::PrivateEnterprise,
        AgentType::Academic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Government => "GOVERNMENT",
            AgentType::Cso => "CSO",
            AgentType::PrivateEnterprise => "PRIVATE_ENTERPRISE",
            AgentType::Academic => "ACADEMIC",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed phases of one step, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StepPhase {
    Forum,
    Decay,
    Action,
    Projects,
    Intervention,
    Snapshot,
}

impl StepPhase {
    pub const ORDER: [StepPhase; 6] = [
        StepPhase::Forum,
        StepPhase::Decay,
        StepPhase::Action,
        StepPhase::Projects,
        StepPhase::Intervention,
        StepPhase::Snapshot,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// A step phase is about to run
    PhaseStarted(StepPhase),
    /// The catalyst convened a forum
    ForumConvened {
        convener: ActorId,
        attendees: usize,
    },
    /// A new link was created in the action phase
    LinkFormed {
        from: ActorId,
        to: ActorId,
        probability: f64,
    },
    /// A successful proposal was recorded for the projects phase.
    /// `strength` and `joint_resources` are the values it was judged on.
    ProjectProposed {
        a: ActorId,
        b: ActorId,
        strength: f64,
        joint_resources: f64,
    },
    /// A pending joint project paid out
    ProjectCompleted {
        a: ActorId,
        b: ActorId,
    },
    /// An actor captured (or reinforced) its link to the opportunity node
    OpportunityLinked {
        actor: ActorId,
        node: ActorId,
        strength: f64,
    },
    /// Scenario intervention: actor deleted together with its edges
    ActorRemoved {
        actor: ActorId,
        edges_removed: usize,
    },
    /// Scenario intervention: opportunity node added to the graph
    OpportunityInjected {
        node: ActorId,
        resources: f64,
    },
}

pub trait EventSink {
    fn log(&mut self, step: Step, event: SimEvent);
}

/// No-op event sink for plain runs
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _step: Step, _event: SimEvent) {}
}
