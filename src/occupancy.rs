//! Occupancy queries - collision screening for candidate placement points

use glam::Vec3;

/// External obstruction test for a candidate placement point. The core
/// never performs geometric collision itself beyond the Euclidean
/// distance checks it owns.
pub trait Occupancy {
    /// Whether a footprint of `footprint_radius` at `origin`, probed
    /// `probe_depth` downward, would collide with terrain or existing
    /// geometry.
    fn is_obstructed(&self, origin: Vec3, footprint_radius: f32, probe_depth: f32) -> bool;
}

/// Never reports an obstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobstructed;

impl Occupancy for Unobstructed {
    fn is_obstructed(&self, _origin: Vec3, _footprint_radius: f32, _probe_depth: f32) -> bool {
        false
    }
}

/// Horizontal disc obstacles, typically the footprints of structures
/// already placed. A point is obstructed when its footprint disc
/// overlaps any obstacle disc in the ground plane; the probe depth is
/// irrelevant to the planar test.
#[derive(Debug, Clone, Default)]
pub struct DiscObstacles {
    discs: Vec<(Vec3, f32)>,
}

impl DiscObstacles {
    pub fn new(discs: Vec<(Vec3, f32)>) -> Self {
        Self { discs }
    }

    pub fn push(&mut self, center: Vec3, radius: f32) {
        self.discs.push((center, radius));
    }

    pub fn len(&self) -> usize {
        self.discs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }
}

impl Occupancy for DiscObstacles {
    fn is_obstructed(&self, origin: Vec3, footprint_radius: f32, _probe_depth: f32) -> bool {
        self.discs.iter().any(|(center, radius)| {
            let dx = origin.x - center.x;
            let dz = origin.z - center.z;
            (dx * dx + dz * dz).sqrt() < footprint_radius + radius
        })
    }
}
