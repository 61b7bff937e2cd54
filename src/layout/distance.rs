// Distance/parent resolution: BFS spanning tree rooted at the root id.
//
// The connection graph may contain cycles. A visited-set BFS reduces it to a
// tree where each reachable node has exactly one parent (whoever discovered
// it first) and its shortest hop count from the root.

use std::collections::{HashMap, VecDeque};

use super::adjacency::Adjacency;

#[derive(Debug, Clone)]
pub struct Reachability {
    pub root: String,
    /// Hop count from root, reachable ids only.
    pub distance: HashMap<String, u32>,
    /// First discoverer of each reachable non-root id.
    pub parent: HashMap<String, String>,
    /// BFS visit order, root first. Parents always precede their children.
    pub order: Vec<String>,
    pub max_distance: u32,
}

impl Reachability {
    /// Returns `None` when `root` is not a node of the graph.
    pub fn resolve(adjacency: &Adjacency, root: &str) -> Option<Self> {
        if !adjacency.contains(root) {
            return None;
        }

        let mut distance: HashMap<String, u32> = HashMap::new();
        let mut parent: HashMap<String, String> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        distance.insert(root.to_string(), 0);
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            let d = distance.get(id).copied().unwrap_or(0);
            order.push(id.to_string());

            for nb in adjacency.get_neighbors(id) {
                if distance.contains_key(nb) {
                    continue;
                }
                distance.insert(nb.clone(), d + 1);
                parent.insert(nb.clone(), id.to_string());
                queue.push_back(nb);
            }
        }

        let max_distance = distance.values().copied().max().unwrap_or(0);

        Some(Self {
            root: root.to_string(),
            distance,
            parent,
            order,
            max_distance,
        })
    }

    pub fn is_reachable(&self, id: &str) -> bool {
        self.distance.contains_key(id)
    }

    /// Parent used for clustering. The root and unreachable nodes hang off the root.
    pub fn parent_or_root(&self, id: &str) -> &str {
        self.parent.get(id).map(String::as_str).unwrap_or(&self.root)
    }
}
