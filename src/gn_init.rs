//! Initial Network Generation
//!
//! Builds the starting population and a sparse topology with high bonding and
//! low bridging capital: one clique per actor type, joined by a few weak
//! cross-type bridges. All draws come from the run's `RandomStream`, so the
//! same seed always produces the same starting network.

use indexmap::IndexMap;
use log::{debug, info};

use crate::gn_actor::Actor;
use crate::gn_config::SimConfig;
use crate::gn_graph::RelationshipGraph;
use crate::gn_interface::{ActorId, AgentType, KEY_ACTOR_COMMITMENT};
use crate::gn_random::RandomStream;

/// Population and graph at step zero
pub struct InitialNetwork {
    pub actors: IndexMap<ActorId, Actor>,
    pub graph: RelationshipGraph,
    /// First id not handed out yet
    pub next_id: ActorId,
}

pub struct NetworkInitializer<'a> {
    config: &'a SimConfig,
}

impl<'a> NetworkInitializer<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, random: &mut RandomStream) -> InitialNetwork {
        let mut actors = self.create_actors(random);
        Self::designate(&mut actors, AgentType::Government, random, |actor| {
            actor.is_key_actor = true;
            actor.commitment = KEY_ACTOR_COMMITMENT;
        });
        Self::designate(&mut actors, AgentType::Academic, random, |actor| {
            actor.is_catalyst = true;
        });

        let mut graph = RelationshipGraph::new();
        for id in actors.keys() {
            graph.add_node(*id);
        }
        self.build_cliques(&actors, &mut graph);
        let bridges = self.add_bridges(&actors, &mut graph, random);

        info!(
            "initial network: {} actors, {} edges ({} bridges)",
            actors.len(),
            graph.edge_count(),
            bridges
        );

        let next_id = actors.keys().max().map(|id| id + 1).unwrap_or(1);
        InitialNetwork {
            actors,
            graph,
            next_id,
        }
    }

    fn create_actors(&self, random: &mut RandomStream) -> IndexMap<ActorId, Actor> {
        let mut actors = IndexMap::with_capacity(self.config.total_actors());
        let mut next_id: ActorId = 1;

        for agent_type in AgentType::ALL {
            for _ in 0..self.config.count_of(agent_type) {
                actors.insert(next_id, Actor::sample(next_id, agent_type, random));
                next_id += 1;
            }
        }

        actors
    }

    /// Pick one actor of `agent_type` uniformly and apply `mark` to it
    fn designate<F>(
        actors: &mut IndexMap<ActorId, Actor>,
        agent_type: AgentType,
        random: &mut RandomStream,
        mark: F,
    ) where
        F: FnOnce(&mut Actor),
    {
        let candidates: Vec<ActorId> = actors
            .values()
            .filter(|a| a.agent_type == agent_type)
            .map(|a| a.id)
            .collect();

        if let Some(&chosen) = random.choose(&candidates) {
            if let Some(actor) = actors.get_mut(&chosen) {
                mark(actor);
                debug!("designated {} actor {}", agent_type, chosen);
            }
        }
    }

    fn build_cliques(&self, actors: &IndexMap<ActorId, Actor>, graph: &mut RelationshipGraph) {
        let strength = self.config.topology.clique_strength;

        for agent_type in AgentType::ALL {
            let members: Vec<ActorId> = actors
                .values()
                .filter(|a| a.agent_type == agent_type)
                .map(|a| a.id)
                .collect();

            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    graph.add_or_strengthen(a, b, 0.0, strength);
                }
            }
        }
    }

    fn add_bridges(
        &self,
        actors: &IndexMap<ActorId, Actor>,
        graph: &mut RelationshipGraph,
        random: &mut RandomStream,
    ) -> usize {
        let strength = self.config.topology.bridge_strength;
        let mut added = 0;

        for _ in 0..self.config.topology.bridge_attempts {
            let (Some(i), Some(j)) = (random.index(actors.len()), random.index(actors.len())) else {
                break;
            };
            let (Some((_, a)), Some((_, b))) = (actors.get_index(i), actors.get_index(j)) else {
                continue;
            };

            if a.agent_type != b.agent_type && !graph.has_edge(a.id, b.id) {
                graph.add_or_strengthen(a.id, b.id, 0.0, strength);
                added += 1;
            }
        }

        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn small_config() -> SimConfig {
        SimConfig {
            num_agents_per_type: BTreeMap::from([
                (AgentType::Government, 3),
                (AgentType::Cso, 3),
                (AgentType::PrivateEnterprise, 3),
                (AgentType::Academic, 2),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_population_and_roles() {
        let config = small_config();
        let network = NetworkInitializer::new(&config).build(&mut RandomStream::new(42));

        assert_eq!(network.actors.len(), 11);
        assert_eq!(network.next_id, 12);
        assert_eq!(network.graph.node_count(), 11);

        let catalysts: Vec<&Actor> = network.actors.values().filter(|a| a.is_catalyst).collect();
        let keys: Vec<&Actor> = network.actors.values().filter(|a| a.is_key_actor).collect();
        assert_eq!(catalysts.len(), 1);
        assert_eq!(keys.len(), 1);
        assert_eq!(catalysts[0].agent_type, AgentType::Academic);
        assert_eq!(keys[0].agent_type, AgentType::Government);
        assert_eq!(keys[0].commitment, KEY_ACTOR_COMMITMENT);
    }

    #[test]
    fn test_ids_are_sequential_by_type() {
        let config = small_config();
        let network = NetworkInitializer::new(&config).build(&mut RandomStream::new(1));

        let ids: Vec<ActorId> = network.actors.keys().copied().collect();
        assert_eq!(ids, (1..=11).collect::<Vec<_>>());
        assert_eq!(network.actors[&1].agent_type, AgentType::Government);
        assert_eq!(network.actors[&11].agent_type, AgentType::Academic);
    }

    #[test]
    fn test_cliques_and_bridges() {
        let config = small_config();
        let network = NetworkInitializer::new(&config).build(&mut RandomStream::new(42));
        let graph = &network.graph;

        // 3 + 3 + 3 + 1 clique edges
        let clique_edges = 10;
        assert!(graph.edge_count() >= clique_edges);
        assert!(graph.edge_count() <= clique_edges + config.topology.bridge_attempts);

        for (a, b, strength) in graph.edges() {
            let same_type = network.actors[&a].agent_type == network.actors[&b].agent_type;
            if same_type {
                assert_eq!(strength, config.topology.clique_strength);
            } else {
                assert_eq!(strength, config.topology.bridge_strength);
            }
        }
    }

    #[test]
    fn test_same_seed_same_network() {
        let config = small_config();
        let a = NetworkInitializer::new(&config).build(&mut RandomStream::new(9));
        let b = NetworkInitializer::new(&config).build(&mut RandomStream::new(9));

        assert_eq!(a.graph, b.graph);
        assert_eq!(
            a.actors.values().cloned().collect::<Vec<_>>(),
            b.actors.values().cloned().collect::<Vec<_>>()
        );
    }
}
