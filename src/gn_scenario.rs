// Scenario intervention schedule
//
// Layered on top of the baseline engine: the controller only decides *when*
// something happens, the engine applies it. Each scenario carries at most one
// intervention and a one-shot flag guarding it.

use log::info;

use crate::gn_config::ScenarioKind;
use crate::gn_interface::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intervention {
    /// Delete the key actor and all of its edges
    RemoveKeyActor,
    /// Add the opportunity node to the graph
    InjectOpportunity,
}

#[derive(Debug, Clone)]
pub struct ScenarioController {
    kind: ScenarioKind,
    applied: bool,
}

impl ScenarioController {
    pub fn new(kind: ScenarioKind) -> Self {
        Self {
            kind,
            applied: false,
        }
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// The intervention due at `step`, if any.
    ///
    /// Returns `Some` at most once over the controller's lifetime; any further
    /// check, at the same step or another, yields `None`.
    pub fn intervention_for(&mut self, step: Step) -> Option<Intervention> {
        if self.applied || self.kind.intervention_step() != Some(step) {
            return None;
        }

        let intervention = match self.kind {
            ScenarioKind::Baseline => return None,
            ScenarioKind::KeyActorDeparture { .. } => Intervention::RemoveKeyActor,
            ScenarioKind::ResourceOpportunity { .. } => Intervention::InjectOpportunity,
        };

        self.applied = true;
        info!("scenario {}: {:?} at step {}", self.kind.name(), intervention, step);
        Some(intervention)
    }
}
