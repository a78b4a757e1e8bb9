//! Relationship graph
//!
//! Undirected, simple, weighted graph over actor ids. Each edge carries a single
//! `strength` in [0, 1]. Every mutation clamps instead of rejecting, so no call
//! can leave a dangling endpoint, a self-loop or an out-of-range strength behind.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashSet;

use crate::gn_interface::ActorId;

pub fn clamp_strength(strength: f64) -> f64 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipGraph {
    // both directions are stored; adjacency[a][b] == adjacency[b][a]
    adjacency: BTreeMap<ActorId, BTreeMap<ActorId, f64>>,
    edge_count: usize,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: ActorId) {
        self.adjacency.entry(id).or_default();
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Node ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.adjacency.keys().copied()
    }

    /// All edges as `(low, high, strength)`, ordered by `(low, high)`
    pub fn edges(&self) -> Vec<(ActorId, ActorId, f64)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (&a, neighbors) in &self.adjacency {
            for (&b, &strength) in neighbors.range(a + 1..) {
                edges.push((a, b, strength));
            }
        }
        edges
    }

    pub fn has_edge(&self, a: ActorId, b: ActorId) -> bool {
        self.adjacency
            .get(&a)
            .map(|n| n.contains_key(&b))
            .unwrap_or(false)
    }

    pub fn strength(&self, a: ActorId, b: ActorId) -> Option<f64> {
        self.adjacency.get(&a).and_then(|n| n.get(&b)).copied()
    }

    /// Neighbor ids in ascending order (empty for unknown nodes)
    pub fn neighbors(&self, id: ActorId) -> Vec<ActorId> {
        self.adjacency
            .get(&id)
            .map(|n| n.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Neighbors together with the strength of the connecting edge
    pub fn neighbor_strengths(&self, id: ActorId) -> Vec<(ActorId, f64)> {
        self.adjacency
            .get(&id)
            .map(|n| n.iter().map(|(&b, &s)| (b, s)).collect())
            .unwrap_or_default()
    }

    pub fn degree(&self, id: ActorId) -> usize {
        self.adjacency.get(&id).map(|n| n.len()).unwrap_or(0)
    }

    /// Strengthen the edge (a, b) by `delta`, or create it at `initial_if_new`.
    ///
    /// Returns true when a new edge was created. Self-loops are ignored.
    /// Endpoints not yet in the graph are added as nodes.
    pub fn add_or_strengthen(
        &mut self,
        a: ActorId,
        b: ActorId,
        delta: f64,
        initial_if_new: f64,
    ) -> bool {
        if a == b {
            return false;
        }

        let created = match self.strength(a, b) {
            Some(current) => {
                let next = if delta.is_nan() {
                    current
                } else {
                    clamp_strength(current + delta)
                };
                self.set_both(a, b, next);
                false
            }
            None => {
                self.set_both(a, b, clamp_strength(initial_if_new));
                self.edge_count += 1;
                true
            }
        };

        self.debug_check_edge(a, b);
        created
    }

    fn set_both(&mut self, a: ActorId, b: ActorId, strength: f64) {
        self.adjacency.entry(a).or_default().insert(b, strength);
        self.adjacency.entry(b).or_default().insert(a, strength);
    }

    /// Multiply every edge strength by `factor` (clamped to [0, 1])
    pub fn decay_all(&mut self, factor: f64) {
        let factor = clamp_strength(factor);
        for neighbors in self.adjacency.values_mut() {
            for strength in neighbors.values_mut() {
                *strength = clamp_strength(*strength * factor);
            }
        }
    }

    /// Delete a node and all of its incident edges.
    /// Returns the number of edges removed; absent nodes are a no-op.
    pub fn remove_actor(&mut self, id: ActorId) -> usize {
        let Some(neighbors) = self.adjacency.remove(&id) else {
            return 0;
        };

        for other in neighbors.keys() {
            if let Some(back) = self.adjacency.get_mut(other) {
                back.remove(&id);
            }
        }

        let removed = neighbors.len();
        self.edge_count -= removed;
        removed
    }

    // ========================================================================
    // Structural queries
    // ========================================================================

    /// 2E / (N (N - 1)); zero for fewer than two nodes
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        (2 * self.edge_count) as f64 / (n * (n - 1)) as f64
    }

    /// Unweighted local clustering of a single node
    pub fn local_clustering(&self, id: ActorId) -> f64 {
        let Some(neighbors) = self.adjacency.get(&id) else {
            return 0.0;
        };
        let k = neighbors.len();
        if k < 2 {
            return 0.0;
        }

        let ids: Vec<ActorId> = neighbors.keys().copied().collect();
        let mut links = 0usize;
        for (i, &u) in ids.iter().enumerate() {
            for &w in &ids[i + 1..] {
                if self.has_edge(u, w) {
                    links += 1;
                }
            }
        }

        (2 * links) as f64 / (k * (k - 1)) as f64
    }

    /// Mean local clustering over all nodes; zero on the empty graph
    pub fn average_clustering(&self) -> f64 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        let total: f64 = self.nodes().map(|id| self.local_clustering(id)).sum();
        total / self.node_count() as f64
    }

    /// Connected components, each sorted ascending, ordered by smallest member
    pub fn connected_components(&self) -> Vec<Vec<ActorId>> {
        let mut visited: HashSet<ActorId> = HashSet::with_capacity(self.node_count());
        let mut components = Vec::new();

        for start in self.nodes() {
            if !visited.insert(start) {
                continue;
            }

            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if let Some(neighbors) = self.adjacency.get(&current) {
                    for &next in neighbors.keys() {
                        if visited.insert(next) {
                            component.push(next);
                            queue.push_back(next);
                        }
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }

    pub fn largest_component_size(&self) -> usize {
        self.connected_components()
            .iter()
            .map(|c| c.len())
            .max()
            .unwrap_or(0)
    }

    /// Hop distances from `start` to every node it can reach
    fn hop_distances(&self, start: ActorId) -> BTreeMap<ActorId, usize> {
        let mut distances = BTreeMap::new();
        if !self.contains(start) {
            return distances;
        }

        distances.insert(start, 0);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let next_hop = distances[&current] + 1;
            if let Some(neighbors) = self.adjacency.get(&current) {
                for &next in neighbors.keys() {
                    if !distances.contains_key(&next) {
                        distances.insert(next, next_hop);
                        queue.push_back(next);
                    }
                }
            }
        }

        distances
    }

    /// Unweighted hop count between two nodes; `None` when unreachable
    pub fn shortest_path_length(&self, a: ActorId, b: ActorId) -> Option<usize> {
        self.hop_distances(a).get(&b).copied()
    }

    /// Mean hop count over all ordered pairs of distinct, mutually reachable nodes
    pub fn average_shortest_path_length(&self) -> f64 {
        let mut total = 0usize;
        let mut pairs = 0usize;

        for a in self.nodes() {
            for b in self.nodes().filter(|&b| b != a) {
                if let Some(hops) = self.shortest_path_length(a, b) {
                    total += hops;
                    pairs += 1;
                }
            }
        }

        if pairs == 0 {
            0.0
        } else {
            total as f64 / pairs as f64
        }
    }

    /// Gini coefficient of a supplied value vector.
    ///
    /// Zero for fewer than two values or a zero total.
    pub fn gini(values: &[f64]) -> f64 {
        let n = values.len();
        if n <= 1 {
            return 0.0;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let total: f64 = sorted.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return 0.0;
        }

        let numerator: f64 = sorted
            .iter()
            .enumerate()
            .map(|(i, x)| (2.0 * i as f64 + 1.0 - n as f64) * x)
            .sum();

        numerator / (n as f64 * total)
    }

    fn debug_check_edge(&self, a: ActorId, b: ActorId) {
        debug_assert!(a != b, "self-loop on {}", a);
        debug_assert_eq!(self.strength(a, b), self.strength(b, a));
        debug_assert!(self
            .strength(a, b)
            .map(|s| (0.0..=1.0).contains(&s))
            .unwrap_or(true));
    }
}
