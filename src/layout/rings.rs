// Ring geometry shared by the bucketer and the placer.

use std::f64::consts::TAU;

use super::LayoutConfig;
use crate::network::Point;

/// How many nodes fit on `ring` without overlapping when spaced evenly.
/// Ring 0 (and below) is reserved for the root and reports 0.
pub fn ring_capacity(ring: i64, cfg: &LayoutConfig) -> u32 {
    if ring <= 0 {
        return 0;
    }
    let radius = ring as f64 * cfg.ring_step();
    let per_slot = cfg.node_diameter + cfg.gap;
    let fit = if per_slot > 0.0 {
        (TAU * radius / per_slot).floor() as u32
    } else {
        0
    };
    fit.max(cfg.min_ring_capacity)
}

/// Angular step between neighbours in a cluster of `count` on `ring`.
pub(crate) fn angle_step(ring: u32, count: usize, cfg: &LayoutConfig) -> f64 {
    let slots = (ring_capacity(ring as i64, cfg) as usize).max(count).max(1);
    TAU / slots as f64
}

/// Centroid of member `index` of a `count`-sized cluster on `ring`, fanned
/// symmetrically around `center_angle`.
pub fn ring_position(ring: u32, index: usize, count: usize, center_angle: f64, cfg: &LayoutConfig) -> Point {
    if ring == 0 {
        return cfg.center;
    }
    let step = angle_step(ring, count, cfg);
    let span = step * count.saturating_sub(1) as f64;
    point_on_ring(ring, center_angle - span / 2.0 + index as f64 * step, cfg)
}

/// Centroid at `angle` on `ring`.
pub fn point_on_ring(ring: u32, angle: f64, cfg: &LayoutConfig) -> Point {
    let radius = ring as f64 * cfg.ring_step();
    Point {
        x: cfg.center.x + radius * angle.cos(),
        y: cfg.center.y + radius * angle.sin(),
    }
}

/// Shortest angular distance between two angles, in `[0, PI]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Angle around the center of a node stored at top-left `anchor`.
pub fn angle_of(anchor: Point, cfg: &LayoutConfig) -> f64 {
    let cx = anchor.x + cfg.half_node();
    let cy = anchor.y + cfg.half_node();
    (cy - cfg.center.y).atan2(cx - cfg.center.x)
}
