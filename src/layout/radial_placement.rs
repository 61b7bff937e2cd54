// Radial placement: clusters fanned around their parent's angle.
//
// Nodes are visited in BFS order and each cluster is placed whole when its
// first member comes up, so a parent's anchor for this pass is always known
// before its children are placed. The parent's angle is read back from that
// anchor, which makes stored positions the angular memory of the layout:
// rerunning on an unchanged graph reproduces identical bits.
//
// Siblings are spaced with the ring's own angular step. Every ring keeps a
// record of the angles already claimed; a cluster that would land closer
// than one step to a claimed angle slides sideways in half-step increments,
// and when no offset fits it moves out one ring. Children never share their
// parent's ring.

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::debug;

use super::distance::Reachability;
use super::overflow::OverflowBuckets;
use super::rings::{angle_of, angular_distance, point_on_ring, ring_capacity};
use super::LayoutConfig;
use crate::network::Point;

/// Slack for float noise when comparing angular gaps.
const ANGLE_EPS: f64 = 1e-9;

/// Angles claimed so far, per ring.
#[derive(Debug, Default)]
struct RingOccupancy {
    claimed: HashMap<u32, Vec<f64>>,
}

impl RingOccupancy {
    fn fits(&self, ring: u32, angles: &[f64], min_gap: f64) -> bool {
        let Some(taken) = self.claimed.get(&ring) else {
            return true;
        };
        angles
            .iter()
            .all(|a| taken.iter().all(|t| angular_distance(*a, *t) >= min_gap - ANGLE_EPS))
    }

    fn claim(&mut self, ring: u32, angles: &[f64]) {
        self.claimed.entry(ring).or_default().extend_from_slice(angles);
    }
}

/// `count` angles `step` apart, symmetric around `center`.
fn fan(center: f64, count: usize, step: f64) -> Vec<f64> {
    let start = center - step * count.saturating_sub(1) as f64 / 2.0;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// First ring at or beyond `ring` with room for `count` siblings near
/// `center`, and the angles they take there. Offsets are tried nearest first,
/// positive before negative.
fn find_room(occupancy: &RingOccupancy, ring: u32, center: f64, count: usize, cfg: &LayoutConfig) -> (u32, Vec<f64>) {
    let mut ring = ring.max(1);
    loop {
        let capacity = ring_capacity(ring as i64, cfg) as usize;
        if count <= capacity {
            let step = TAU / capacity as f64;
            let half = step / 2.0;
            for k in 0..=2 * capacity {
                let offsets = if k == 0 {
                    vec![0.0]
                } else {
                    vec![k as f64 * half, -(k as f64) * half]
                };
                for offset in offsets {
                    let angles = fan(center + offset, count, step);
                    if occupancy.fits(ring, &angles, step) {
                        return (ring, angles);
                    }
                }
            }
        }
        ring += 1;
    }
}

/// Compute new anchors for every node reachable from the root. The ring each
/// node actually landed on is written back into `buckets`.
pub fn place_nodes(reach: &Reachability, buckets: &mut OverflowBuckets, cfg: &LayoutConfig) -> HashMap<String, Point> {
    let mut positions: HashMap<String, Point> = HashMap::with_capacity(reach.order.len());
    let mut occupancy = RingOccupancy::default();
    let mut landed: Vec<((u32, String), Vec<String>)> = Vec::new();

    positions.insert(reach.root.clone(), cfg.root_anchor());
    landed.push(((0, reach.root.clone()), vec![reach.root.clone()]));

    for id in reach.order.iter().skip(1) {
        // Placed along with an earlier member of its cluster.
        if positions.contains_key(id) {
            continue;
        }
        let parent = reach.parent_or_root(id).to_string();
        // Every reachable node was bucketed.
        let Some(&assigned) = buckets.ring_of.get(id) else {
            continue;
        };
        let members: Vec<String> = buckets
            .clusters
            .get(&(assigned, parent.clone()))
            .map(|m| m.iter().filter(|m| reach.is_reachable(m)).cloned().collect())
            .unwrap_or_default();

        // BFS order puts the parent ahead of its children, so its anchor
        // and ring are already settled.
        let (parent_angle, parent_ring) = if parent == reach.root {
            (0.0, 0)
        } else {
            let anchor = positions.get(&parent).copied().unwrap_or_else(|| cfg.root_anchor());
            (angle_of(anchor, cfg), buckets.ring_of.get(&parent).copied().unwrap_or(0))
        };

        let wanted = assigned.max(parent_ring + 1);
        let (ring, angles) = find_room(&occupancy, wanted, parent_angle, members.len(), cfg);
        occupancy.claim(ring, &angles);
        if ring != assigned {
            debug!("cluster of '{parent}' moved from ring {assigned} to {ring}");
        }

        for (member, angle) in members.iter().zip(angles) {
            buckets.ring_of.insert(member.clone(), ring);
            positions.insert(member.clone(), cfg.anchor_for(point_on_ring(ring, angle, cfg)));
        }
        landed.push(((ring, parent), members));
    }

    // Rebuild cluster membership from where nodes actually landed; only the
    // unreachable buckets survive as they were.
    buckets
        .clusters
        .retain(|_, members| members.iter().all(|m| !reach.is_reachable(m)));
    for (key, members) in landed {
        buckets.clusters.entry(key).or_default().extend(members);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::adjacency::Adjacency;
    use crate::network::{Edge, Node, PersonData};

    const EPS: f64 = 1e-9;

    fn run(ids: &[&str], pairs: &[(&str, &str)], cfg: &LayoutConfig) -> (HashMap<String, Point>, OverflowBuckets) {
        let nodes: Vec<Node> = ids.iter().map(|id| Node::new(*id, PersonData::default())).collect();
        let edges: Vec<Edge> = pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect();
        let reach = Reachability::resolve(&Adjacency::build(&nodes, &edges), &cfg.root_id).unwrap();
        let mut buckets = OverflowBuckets::assign(&nodes, &reach, cfg);
        let positions = place_nodes(&reach, &mut buckets, cfg);
        (positions, buckets)
    }

    /// Every pair of nodes sharing a ring is at least one ring step apart.
    fn assert_rings_clear(pos: &HashMap<String, Point>, buckets: &OverflowBuckets, cfg: &LayoutConfig) {
        let mut by_ring: HashMap<u32, Vec<&String>> = HashMap::new();
        for id in pos.keys() {
            by_ring.entry(buckets.ring_of[id]).or_default().push(id);
        }
        for (ring, ids) in by_ring {
            if ring == 0 {
                continue;
            }
            let min_gap = TAU / ring_capacity(ring as i64, cfg) as f64;
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    let gap = angular_distance(angle_of(pos[*a], cfg), angle_of(pos[*b], cfg));
                    assert!(gap >= min_gap - 1e-6, "{a} and {b} too close on ring {ring}: {gap}");
                }
            }
        }
    }

    #[test]
    fn test_root_centered() {
        let cfg = LayoutConfig::default();
        let (pos, _) = run(&["root"], &[], &cfg);
        assert_eq!(pos.len(), 1);
        assert_eq!(pos["root"], cfg.root_anchor());
    }

    #[test]
    fn test_first_ring_spacing() {
        let cfg = LayoutConfig::default();
        let (pos, _) = run(
            &["root", "a", "b", "c"],
            &[("root", "a"), ("root", "b"), ("root", "c")],
            &cfg,
        );
        let step = TAU / ring_capacity(1, &cfg) as f64;
        let a = angle_of(pos["a"], &cfg);
        let b = angle_of(pos["b"], &cfg);
        let c = angle_of(pos["c"], &cfg);
        assert!((b - a - step).abs() < EPS);
        assert!((c - b - step).abs() < EPS);
        // centered on the root's angle of 0
        assert!(b.abs() < EPS);
    }

    #[test]
    fn test_grandchildren_follow_parent_angle() {
        let cfg = LayoutConfig::default();
        let (pos, _) = run(
            &["root", "a", "b", "a1", "a2"],
            &[("root", "a"), ("root", "b"), ("a", "a1"), ("a", "a2")],
            &cfg,
        );
        let a = angle_of(pos["a"], &cfg);
        let a1 = angle_of(pos["a1"], &cfg);
        let a2 = angle_of(pos["a2"], &cfg);
        assert!(((a1 + a2) / 2.0 - a).abs() < 1e-6);

        let step = TAU / ring_capacity(2, &cfg) as f64;
        assert!((a2 - a1 - step).abs() < 1e-6);
    }

    #[test]
    fn test_neighbouring_fans_do_not_collide() {
        // a and b sit at -30 and +30 degrees; three children each would both
        // reach 0 degrees on ring 2 if fanned blindly.
        let cfg = LayoutConfig::default();
        let (pos, buckets) = run(
            &["root", "a", "b", "a1", "a2", "a3", "b1", "b2", "b3"],
            &[
                ("root", "a"),
                ("root", "b"),
                ("a", "a1"),
                ("a", "a2"),
                ("a", "a3"),
                ("b", "b1"),
                ("b", "b2"),
                ("b", "b3"),
            ],
            &cfg,
        );
        assert_rings_clear(&pos, &buckets, &cfg);

        // a's fan was placed first and keeps its symmetric spot
        let a = angle_of(pos["a"], &cfg);
        assert!((angle_of(pos["a2"], &cfg) - a).abs() < 1e-6);
        // b's fan stays on ring 2, shifted off the shared slot
        assert_eq!(buckets.ring_of["b1"], 2);
        assert!(angular_distance(angle_of(pos["b1"], &cfg), angle_of(pos["a3"], &cfg)) > 0.5);
    }

    #[test]
    fn test_crowded_ring_pushes_cluster_outward() {
        // six children on ring 1, each with three children: 18 grandchildren
        // cannot all fit on ring 2 (capacity 12)
        let cfg = LayoutConfig::default();
        let mut ids = vec!["root".to_string()];
        let mut pairs = Vec::new();
        for i in 0..6 {
            let child = format!("c{i}");
            pairs.push(("root".to_string(), child.clone()));
            for j in 0..3 {
                let grandchild = format!("c{i}g{j}");
                pairs.push((child.clone(), grandchild.clone()));
                ids.push(grandchild);
            }
            ids.push(child);
        }
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
        let (pos, buckets) = run(&ids, &pairs, &cfg);

        assert_eq!(pos.len(), ids.len());
        assert_rings_clear(&pos, &buckets, &cfg);
        assert!(buckets.ring_of.values().any(|r| *r > 2));
        for (ring, parent) in buckets.clusters.keys() {
            if parent != "root" && pos.contains_key(parent) {
                assert!(*ring > buckets.ring_of[parent]);
            }
        }
    }

    #[test]
    fn test_children_of_spilled_node_go_further_out() {
        let cfg = LayoutConfig::default();
        let cap = ring_capacity(1, &cfg) as usize;
        let mut ids = vec!["root".to_string()];
        let mut pairs = Vec::new();
        for i in 0..=cap {
            ids.push(format!("k{i}"));
            pairs.push(("root".to_string(), format!("k{i}")));
        }
        ids.push("leaf".to_string());
        pairs.push((format!("k{cap}"), "leaf".to_string()));
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
        let (_, buckets) = run(&ids, &pairs, &cfg);

        assert_eq!(buckets.ring_of[&format!("k{cap}")], 2);
        assert!(buckets.ring_of["leaf"] >= 3);
    }

    #[test]
    fn test_radius_matches_ring() {
        let cfg = LayoutConfig::default();
        let (pos, _) = run(&["root", "a", "b"], &[("root", "a"), ("a", "b")], &cfg);
        let half = cfg.half_node();
        let radius = |p: Point| ((p.x + half - cfg.center.x).powi(2) + (p.y + half - cfg.center.y).powi(2)).sqrt();
        assert!((radius(pos["a"]) - cfg.ring_step()).abs() < EPS);
        assert!((radius(pos["b"]) - 2.0 * cfg.ring_step()).abs() < EPS);
    }

    #[test]
    fn test_unreachable_not_placed() {
        let cfg = LayoutConfig::default();
        let (pos, _) = run(&["root", "a", "x"], &[("root", "a")], &cfg);
        assert!(pos.contains_key("a"));
        assert!(!pos.contains_key("x"));
    }
}
