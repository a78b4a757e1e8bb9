//! Decision rules
//!
//! Pure functions from actor/graph state to probabilities and gates. Nothing
//! here mutates state or draws randomness; the engine consumes the results as
//! Bernoulli parameters. Every probability leaves this module clamped to [0, 1].

use crate::gn_actor::Actor;
use crate::gn_graph::RelationshipGraph;
use crate::gn_interface::RESOURCE_SCALE;

/// Clamp to [0, 1]; NaN maps to 0
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// 1 for same-type partners, 0 otherwise
pub fn homophily(a: &Actor, b: &Actor) -> f64 {
    if a.agent_type == b.agent_type {
        1.0
    } else {
        0.0
    }
}

/// How attractive `b` is to `a` as a source of resources
pub fn resource_seeking(a: &Actor, b: &Actor) -> f64 {
    clamp_probability((b.resources - a.resources) / RESOURCE_SCALE)
}

/// Probability that `a` forms a link to `b` once it has picked `b` as a candidate.
///
/// The motivation profile of `a` weights homophily against resource seeking.
pub fn link_formation_probability(a: &Actor, b: &Actor) -> f64 {
    let w1 = clamp_probability(a.motivation_profile);
    let w2 = 1.0 - w1;
    clamp_probability(w1 * homophily(a, b) + w2 * resource_seeking(a, b))
}

pub fn project_proposal_probability(actor: &Actor) -> f64 {
    clamp_probability(actor.commitment)
}

pub fn project_success(a: &Actor, b: &Actor, threshold: f64) -> bool {
    a.resources + b.resources > threshold
}

pub fn forum_attendance_probability(actor: &Actor) -> f64 {
    clamp_probability(actor.commitment)
}

/// degree / (live actors - 1); zero when there is nobody else to connect to
pub fn degree_centrality(actor: &Actor, graph: &RelationshipGraph, live_actors: usize) -> f64 {
    if live_actors <= 1 {
        return 0.0;
    }
    clamp_probability(graph.degree(actor.id) as f64 / (live_actors - 1) as f64)
}

/// Probability that `actor` captures a link to the opportunity node.
///
/// Grows with the actor's resources and with its degree centrality.
pub fn opportunity_capture_probability(
    actor: &Actor,
    graph: &RelationshipGraph,
    live_actors: usize,
) -> f64 {
    let wealth = clamp_probability(actor.resources / RESOURCE_SCALE);
    clamp_probability(wealth * degree_centrality(actor, graph, live_actors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gn_interface::AgentType;

    fn actor(id: u64, agent_type: AgentType, resources: f64, commitment: f64, motivation: f64) -> Actor {
        Actor::new(id, agent_type, resources, commitment, motivation)
    }

    #[test]
    fn test_homophily_only_for_same_type() {
        let a = actor(1, AgentType::Cso, 10.0, 0.5, 1.0);
        let b = actor(2, AgentType::Cso, 10.0, 0.5, 0.0);
        let c = actor(3, AgentType::Academic, 10.0, 0.5, 0.0);

        // pure relationship builder, same type, no resource gap
        assert_eq!(link_formation_probability(&a, &b), 1.0);
        assert_eq!(link_formation_probability(&a, &c), 0.0);
    }

    #[test]
    fn test_resource_seeking_is_clamped_and_monotone() {
        let poor = actor(1, AgentType::Cso, 10.0, 0.5, 0.0);
        let mid = actor(2, AgentType::Government, 60.0, 0.5, 0.0);
        let rich = actor(3, AgentType::PrivateEnterprise, 500.0, 0.5, 0.0);

        assert!((resource_seeking(&poor, &mid) - 0.5).abs() < 1e-12);
        assert_eq!(resource_seeking(&poor, &rich), 1.0);
        assert_eq!(resource_seeking(&rich, &poor), 0.0);
        assert!(link_formation_probability(&poor, &rich) >= link_formation_probability(&poor, &mid));
    }

    #[test]
    fn test_motivation_weights_mix() {
        let a = actor(1, AgentType::Government, 0.0, 0.5, 0.25);
        let b = actor(2, AgentType::Government, 50.0, 0.5, 0.5);
        // 0.25 * 1 + 0.75 * 0.5
        assert!((link_formation_probability(&a, &b) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_project_rules() {
        let a = actor(1, AgentType::Cso, 40.0, 0.8, 0.5);
        let b = actor(2, AgentType::Cso, 61.0, 0.3, 0.5);
        assert!(project_success(&a, &b, 100.0));

        let c = actor(3, AgentType::Cso, 60.0, 0.3, 0.5);
        // strictly greater than the threshold
        assert!(!project_success(&a, &c, 100.0));

        assert_eq!(project_proposal_probability(&a), 0.8);
    }

    #[test]
    fn test_opportunity_capture_grows_with_degree_and_resources() {
        let mut graph = RelationshipGraph::new();
        let hub = actor(1, AgentType::PrivateEnterprise, 80.0, 0.5, 0.2);
        let rich_isolate = actor(5, AgentType::PrivateEnterprise, 80.0, 0.5, 0.2);
        let poor_hub = actor(6, AgentType::Cso, 20.0, 0.5, 0.2);
        for other in 2..=4 {
            graph.add_or_strengthen(1, other, 0.0, 0.5);
            graph.add_or_strengthen(6, other, 0.0, 0.5);
        }
        graph.add_node(5);

        let live = 6;
        let p_hub = opportunity_capture_probability(&hub, &graph, live);
        assert!((p_hub - 0.8 * 3.0 / 5.0).abs() < 1e-12);
        assert_eq!(opportunity_capture_probability(&rich_isolate, &graph, live), 0.0);
        assert!(opportunity_capture_probability(&poor_hub, &graph, live) < p_hub);
        assert_eq!(opportunity_capture_probability(&hub, &graph, 1), 0.0);
    }

    #[test]
    fn test_probabilities_always_in_unit_interval() {
        let weird = Actor {
            id: 1,
            agent_type: AgentType::Academic,
            resources: 1.0e9,
            commitment: 7.0,
            motivation_profile: -3.0,
            is_catalyst: false,
            is_key_actor: false,
        };
        let other = actor(2, AgentType::Academic, -50.0, 0.5, 0.5);

        for p in [
            link_formation_probability(&weird, &other),
            link_formation_probability(&other, &weird),
            project_proposal_probability(&weird),
            forum_attendance_probability(&weird),
        ] {
            assert!((0.0..=1.0).contains(&p));
        }
        assert_eq!(clamp_probability(f64::NAN), 0.0);
    }
}
