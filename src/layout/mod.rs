// Radial layout for a rooted network of people.
//
// Pipeline (one synchronous pass):
// - adjacency: undirected neighbour map from nodes + edges
// - distance: BFS from the root, hop count + first-discoverer parent
// - rings: how many nodes fit on each concentric ring
// - overflow: spill same-parent children that don't fit onto deeper rings
// - radial_placement: turn (ring, cluster index, parent angle) into anchors
//
// Properties:
// - Deterministic: same nodes, edges and config give bit-identical output
// - Idempotent: applying the result twice changes nothing the second time
// - Lenient: missing root is a no-op, unknown edge endpoints are ignored,
//   unreachable nodes keep their position
//
// compute_layout is pure; apply_layout is the write-back step that reports
// which nodes actually changed.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::network::{Edge, Node, Point};

mod adjacency;
mod distance;
mod overflow;
mod radial_placement;
mod rings;

pub use adjacency::Adjacency;
pub use distance::Reachability;
pub use overflow::OverflowBuckets;
pub use radial_placement::place_nodes;
pub use rings::{angle_of, angular_distance, ring_capacity, ring_position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Visual diameter of a person node.
    pub node_diameter: f64,
    /// Spacing between neighbouring nodes and between rings.
    pub gap: f64,
    /// Floor for ring capacity, so ring 1 still fits a first generation.
    pub min_ring_capacity: u32,
    /// Centroid of the root node.
    pub center: Point,
    /// Identifier of the node placed at the center.
    pub root_id: String,
    /// Distance reported for nodes with no path to the root.
    pub unreachable_distance: u32,
}

impl LayoutConfig {
    /// Radial distance between consecutive rings.
    pub fn ring_step(&self) -> f64 {
        self.node_diameter + self.gap
    }

    /// Offset between a node's centroid and its stored top-left anchor.
    pub fn half_node(&self) -> f64 {
        self.node_diameter / 2.0
    }

    pub fn anchor_for(&self, centroid: Point) -> Point {
        Point {
            x: centroid.x - self.half_node(),
            y: centroid.y - self.half_node(),
        }
    }

    pub fn root_anchor(&self) -> Point {
        self.anchor_for(self.center)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_diameter: 80.0,
            gap: 80.0,
            min_ring_capacity: 6,
            center: Point { x: 600.0, y: 360.0 },
            root_id: "root".to_string(),
            unreachable_distance: 999,
        }
    }
}

/// Engine state after a pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutState {
    /// No root present; nothing was touched.
    Idle,
    LaidOut,
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Hop count from the root for every reachable node.
    pub distance: HashMap<String, u32>,
    /// Largest finite distance; 0 when only the root is reachable.
    pub max_distance: u32,
    /// BFS parent for every reachable non-root node.
    pub parent: HashMap<String, String>,
    /// Ring each node is drawn on (>= its distance).
    pub effective_ring: HashMap<String, u32>,
    /// Members per (effective ring, parent), in placement order.
    pub clusters: HashMap<(u32, String), Vec<String>>,
    /// New anchors for every reachable node.
    pub positions: HashMap<String, Point>,
}

impl LayoutResult {
    /// Distance to write back for `id`, using the sentinel for unreachable nodes.
    pub fn distance_or_sentinel(&self, id: &str, cfg: &LayoutConfig) -> u32 {
        self.distance.get(id).copied().unwrap_or(cfg.unreachable_distance)
    }
}

/// Run the whole pipeline over a snapshot. Returns `None` when the root
/// is absent, in which case callers must leave every node untouched.
pub fn compute_layout(nodes: &[Node], edges: &[Edge], cfg: &LayoutConfig) -> Option<LayoutResult> {
    let adjacency = Adjacency::build(nodes, edges);

    let Some(reach) = Reachability::resolve(&adjacency, &cfg.root_id) else {
        debug!("layout skipped: no '{}' node among {} nodes", cfg.root_id, nodes.len());
        return None;
    };

    let mut buckets = OverflowBuckets::assign(nodes, &reach, cfg);
    let positions = place_nodes(&reach, &mut buckets, cfg);

    debug!(
        "layout pass: {} nodes, {} reachable, max distance {}",
        nodes.len(),
        reach.distance.len(),
        reach.max_distance
    );

    Some(LayoutResult {
        distance: reach.distance,
        max_distance: reach.max_distance,
        parent: reach.parent,
        effective_ring: buckets.ring_of,
        clusters: buckets.clusters,
        positions,
    })
}

/// Write derived state back into `nodes`, touching only nodes whose
/// distance, max distance or position differ. Returns the changed ids in
/// node order.
pub fn apply_layout(nodes: &mut [Node], result: &LayoutResult, cfg: &LayoutConfig) -> Vec<String> {
    let mut changed = Vec::new();

    for node in nodes.iter_mut() {
        let distance = Some(result.distance_or_sentinel(&node.id, cfg));
        let max_distance = Some(result.max_distance);
        let position = result.positions.get(&node.id).copied().unwrap_or(node.position);

        if node.distance != distance || node.max_distance != max_distance || node.position != position {
            node.distance = distance;
            node.max_distance = max_distance;
            node.position = position;
            changed.push(node.id.clone());
        }
    }

    debug!("layout write-back: {} of {} nodes changed", changed.len(), nodes.len());
    changed
}
