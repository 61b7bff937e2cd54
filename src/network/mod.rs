//! The person network and its reactive layout driver.
//!
//! `Network` owns the nodes, edges and layout config. Every mutation re-runs
//! the layout pipeline before returning, so callers never observe a graph
//! whose derived positions are stale.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::layout::{apply_layout, angle_of, compute_layout, ring_position, LayoutConfig, LayoutState};

mod types;

pub use types::{Contact, Edge, Education, Experience, Node, PersonData, Point};

/// Outcome of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPass {
    pub state: LayoutState,
    /// Ids whose distance, max distance or position changed, in node order.
    pub changed: Vec<String>,
}

impl LayoutPass {
    fn idle() -> Self {
        Self { state: LayoutState::Idle, changed: Vec::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    config: LayoutConfig,
    /// Bumped on every mutation of nodes or edges.
    revision: u64,
}

impl Network {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Build the initial graph from a loaded root and its connections.
    ///
    /// Connections start on ring 1 in load order and are linked to their
    /// `parent_id` (root when absent). The first pass then settles them.
    pub fn from_snapshot(root: PersonData, connections: Vec<PersonData>, config: LayoutConfig) -> (Self, LayoutPass) {
        let root_id = config.root_id.clone();
        let mut nodes = Vec::with_capacity(connections.len() + 1);
        let mut edges = Vec::with_capacity(connections.len());

        nodes.push(Node::new(root_id.clone(), root).at(config.root_anchor()));

        let count = connections.len();
        let mut taken: HashSet<String> = HashSet::with_capacity(count + 1);
        taken.insert(root_id.clone());
        for (idx, person) in connections.into_iter().enumerate() {
            // A missing, duplicate or root-shadowing id falls back to its load slot.
            let id = match person.id.clone() {
                Some(id) if !taken.contains(&id) => id,
                stored => {
                    let fallback = format!("conn-{idx}");
                    if taken.contains(&fallback) {
                        debug!("skipping connection {idx}: id {stored:?} already taken");
                        continue;
                    }
                    if let Some(stored) = stored {
                        debug!("connection {idx} renamed from '{stored}' to '{fallback}'");
                    }
                    fallback
                }
            };
            taken.insert(id.clone());
            let parent = person.parent_id.clone().unwrap_or_else(|| root_id.clone());
            let start = ring_position(1, idx, count, 0.0, &config);

            nodes.push(Node::new(id.clone(), person).at(config.anchor_for(start)));
            edges.push(Edge::new(parent, id));
        }

        let mut network = Self { nodes, edges, config, revision: 0 };
        let pass = network.relayout();
        (network, pass)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Run the pipeline over the current snapshot and write back what changed.
    pub fn relayout(&mut self) -> LayoutPass {
        let Some(result) = compute_layout(&self.nodes, &self.edges, &self.config) else {
            return LayoutPass::idle();
        };
        let changed = apply_layout(&mut self.nodes, &result, &self.config);
        LayoutPass { state: LayoutState::LaidOut, changed }
    }

    /// Swap in a whole new node/edge set, as after a reload.
    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> LayoutPass {
        self.nodes = nodes;
        self.edges = edges;
        self.touched()
    }

    /// Add a person connected to `parent_id` (root if unknown).
    ///
    /// Returns `None` when the id is already taken.
    pub fn add_person(&mut self, id: impl Into<String>, person: PersonData, parent_id: Option<&str>) -> Option<LayoutPass> {
        let id = id.into();
        if self.contains(&id) {
            debug!("add_person: '{id}' already present");
            return None;
        }

        let parent = parent_id
            .filter(|p| self.contains(p))
            .unwrap_or(self.config.root_id.as_str())
            .to_string();

        // Provisional slot near the parent; the pass below settles it.
        let parent_angle = self
            .node(&parent)
            .map(|p| angle_of(p.position, &self.config))
            .unwrap_or(0.0);
        let count = self.nodes.len().max(1);
        let start = ring_position(1, count - 1, count, parent_angle, &self.config);
        let position = self.config.anchor_for(start);

        let mut person = person;
        person.id = Some(id.clone());
        person.parent_id = Some(parent.clone());

        self.nodes.push(Node::new(id.clone(), person).at(position));
        self.edges.push(Edge::new(id, parent));
        Some(self.touched())
    }

    /// Replace a person's payload. Layout is unaffected but still re-run.
    pub fn update_person(&mut self, id: &str, person: PersonData) -> Option<LayoutPass> {
        let node = self.nodes.iter_mut().find(|n| n.id == id)?;
        node.data = person;
        Some(self.touched())
    }

    /// Remove a person and every edge touching them. The root cannot be removed.
    pub fn delete_person(&mut self, id: &str) -> Option<LayoutPass> {
        if id == self.config.root_id || !self.contains(id) {
            return None;
        }
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
        Some(self.touched())
    }

    /// Link two existing people. Returns `None` if either is unknown.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<LayoutPass> {
        if !self.contains(source) || !self.contains(target) {
            return None;
        }
        self.edges.push(Edge::new(source, target));
        Some(self.touched())
    }

    /// Remove every edge between `a` and `b`, in either direction.
    pub fn disconnect(&mut self, a: &str, b: &str) -> Option<LayoutPass> {
        let before = self.edges.len();
        self.edges
            .retain(|e| !((e.source == a && e.target == b) || (e.source == b && e.target == a)));
        if self.edges.len() == before {
            return None;
        }
        Some(self.touched())
    }

    fn touched(&mut self) -> LayoutPass {
        self.revision += 1;
        let pass = self.relayout();
        debug!(
            "revision {}: {:?}, {} node(s) moved",
            self.revision,
            pass.state,
            pass.changed.len()
        );
        pass
    }
}
