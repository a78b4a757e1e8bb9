// Actors of the governance network

use crate::gn_interface::{ActorId, AgentType};
use crate::gn_random::RandomStream;

/// Sampling ranges for the attributes of a freshly created actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorProfile {
    pub resources: (f64, f64),
    pub commitment: (f64, f64),
    pub motivation: (f64, f64),
}

impl ActorProfile {
    pub fn for_type(agent_type: AgentType) -> Self {
        match agent_type {
            AgentType::Government => Self {
                resources: (10.0, 50.0),
                commitment: (0.2, 0.5),
                motivation: (0.2, 0.8),
            },
            AgentType::Cso => Self {
                resources: (10.0, 30.0),
                commitment: (0.7, 0.9),
                motivation: (0.8, 0.9),
            },
            AgentType::PrivateEnterprise => Self {
                resources: (50.0, 100.0),
                commitment: (0.2, 0.8),
                motivation: (0.1, 0.3),
            },
            AgentType::Academic => Self {
                resources: (10.0, 50.0),
                commitment: (0.8, 1.0),
                motivation: (0.2, 0.8),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub agent_type: AgentType,
    pub resources: f64,
    pub commitment: f64,
    /// 0 = purely resource-maximizing, 1 = purely relationship-maximizing
    pub motivation_profile: f64,
    pub is_catalyst: bool,
    pub is_key_actor: bool,
}

impl Actor {
    pub fn new(
        id: ActorId,
        agent_type: AgentType,
        resources: f64,
        commitment: f64,
        motivation_profile: f64,
    ) -> Self {
        Self {
            id,
            agent_type,
            resources: resources.max(0.0),
            commitment: commitment.clamp(0.0, 1.0),
            motivation_profile: motivation_profile.clamp(0.0, 1.0),
            is_catalyst: false,
            is_key_actor: false,
        }
    }

    /// Draw a new actor from the profile of its type.
    /// Draw order is resources, commitment, motivation.
    pub fn sample(id: ActorId, agent_type: AgentType, random: &mut RandomStream) -> Self {
        let profile = ActorProfile::for_type(agent_type);
        let resources = random.uniform_range(profile.resources.0, profile.resources.1);
        let commitment = random.uniform_range(profile.commitment.0, profile.commitment.1);
        let motivation = random.uniform_range(profile.motivation.0, profile.motivation.1);

        Self::new(id, agent_type, resources, commitment, motivation)
    }

    pub fn gain_resources(&mut self, amount: f64) {
        self.resources = (self.resources + amount).max(0.0);
    }
}
