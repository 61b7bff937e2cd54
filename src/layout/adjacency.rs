// Undirected adjacency for the radial layout.
//
// Every node id gets an entry, even with no edges. Neighbours keep the order
// in which edges introduced them so BFS parent choice is reproducible.
// Edges naming an unknown id are dropped; self-loops add nothing.

use std::collections::{HashMap, HashSet};

use crate::network::{Edge, Node};

#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// For each node id, neighbours in insertion order (no duplicates).
    pub neighbors: HashMap<String, Vec<String>>,
}

impl Adjacency {
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut neighbors: HashMap<String, Vec<String>> = HashMap::with_capacity(nodes.len());
        for n in nodes {
            neighbors.entry(n.id.clone()).or_default();
        }

        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::with_capacity(edges.len());

        for edge in edges {
            let (s, t) = (edge.source.as_str(), edge.target.as_str());
            if s == t || !neighbors.contains_key(s) || !neighbors.contains_key(t) {
                continue;
            }
            // Normalize pair order so (a,b) and (b,a) count once
            let pair = if s <= t { (s, t) } else { (t, s) };
            if !seen_pairs.insert(pair) {
                continue;
            }
            if let Some(list) = neighbors.get_mut(s) {
                list.push(t.to_string());
            }
            if let Some(list) = neighbors.get_mut(t) {
                list.push(s.to_string());
            }
        }

        Self { neighbors }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.neighbors.contains_key(id)
    }

    /// Neighbours of `id`, or an empty slice for unknown ids.
    pub fn get_neighbors(&self, id: &str) -> &[String] {
        self.neighbors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn get_degree(&self, id: &str) -> usize {
        self.get_neighbors(id).len()
    }
}
