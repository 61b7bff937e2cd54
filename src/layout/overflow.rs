// Overflow bucketing: decide which ring each node is actually drawn on.
//
// Children of one parent start on the ring matching their BFS distance. When
// there are more of them than that ring holds, the excess spills outward in
// layers of the home ring's capacity: layer j lands on ring d + j. Nodes are
// never pushed inward.
//
// These are the rings clusters ask for. Placement may still slide a cluster
// sideways or push it further out when another parent got there first, and
// records the final ring back here.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::distance::Reachability;
use super::rings::ring_capacity;
use super::LayoutConfig;
use crate::network::Node;

#[derive(Debug, Clone, Default)]
pub struct OverflowBuckets {
    /// Effective ring of every node.
    pub ring_of: HashMap<String, u32>,
    /// Cluster members per (effective ring, parent), in placement order.
    pub clusters: HashMap<(u32, String), Vec<String>>,
}

impl OverflowBuckets {
    pub fn assign(nodes: &[Node], reach: &Reachability, cfg: &LayoutConfig) -> Self {
        // (raw distance, parent) -> members in node-list order
        let mut groups: BTreeMap<(u32, &str), Vec<&str>> = BTreeMap::new();
        let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());

        for n in nodes {
            if !seen.insert(n.id.as_str()) {
                continue;
            }
            let d = reach.distance.get(&n.id).copied().unwrap_or(cfg.unreachable_distance);
            let parent = reach.parent_or_root(&n.id);
            groups.entry((d, parent)).or_default().push(n.id.as_str());
        }

        let mut out = Self::default();

        for ((d, parent), members) in groups {
            let capacity = ring_capacity(d as i64, cfg).max(1) as usize;

            for (j, id) in members.into_iter().enumerate() {
                let layer = (j / capacity) as u32;
                let ring = d.saturating_add(layer);

                out.clusters
                    .entry((ring, parent.to_string()))
                    .or_default()
                    .push(id.to_string());
                out.ring_of.insert(id.to_string(), ring);
            }
        }

        out
    }

    /// Index of `id` within its cluster and the cluster size.
    pub fn slot_of(&self, id: &str, parent: &str) -> Option<(usize, usize)> {
        let ring = *self.ring_of.get(id)?;
        let members = self.clusters.get(&(ring, parent.to_string()))?;
        let index = members.iter().position(|m| m == id)?;
        Some((index, members.len()))
    }
}
