//! Sampled terrain snapshot - a square lattice of ground-cover categories

use glam::Vec3;

use crate::cover::{CategoryId, OUT_OF_BOUNDS};

/// Immutable snapshot of the dominant ground-cover category on a
/// row-major lattice covering a square region of side `2 * radius`.
///
/// Owned by the sampler; read-only to consumers. A stale snapshot is
/// replaced by a full re-sample, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    center: Vec3,
    radius: f32,
    spacing: f32,
    side: usize,
    cells: Vec<CategoryId>,
}

impl TerrainGrid {
    pub(crate) fn new(center: Vec3, radius: f32, spacing: f32, cells: Vec<CategoryId>) -> Self {
        let side = Self::side_for(radius, spacing);
        debug_assert_eq!(cells.len(), side * side);
        Self {
            center,
            radius,
            spacing,
            side,
            cells,
        }
    }

    /// Cells per axis for a region: `floor(2 * radius / spacing)`.
    pub fn side_for(radius: f32, spacing: f32) -> usize {
        (2.0 * radius / spacing).floor() as usize
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Category at a flat cell index; [`OUT_OF_BOUNDS`] for indices
    /// outside the lattice.
    pub fn category(&self, idx: usize) -> CategoryId {
        self.cells.get(idx).copied().unwrap_or(OUT_OF_BOUNDS)
    }

    /// Whether any cell carries the given category. The out-of-bounds
    /// sentinel never matches.
    pub fn contains(&self, category: CategoryId) -> bool {
        category != OUT_OF_BOUNDS && self.cells.iter().any(|&cell| cell == category)
    }

    pub fn row_col(&self, idx: usize) -> (usize, usize) {
        (idx / self.side, idx % self.side)
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    /// World position of a cell centre.
    pub fn world_pos(&self, idx: usize) -> Vec3 {
        let (row, col) = self.row_col(idx);
        let half = (self.side / 2) as f32;
        let x = (col as f32 - half) * self.spacing;
        let z = (row as f32 - half) * self.spacing;
        self.center + Vec3::new(x, 0.0, z)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, CategoryId)> + '_ {
        self.cells.iter().copied().enumerate()
    }

    pub(crate) fn set(&mut self, idx: usize, category: CategoryId) {
        self.cells[idx] = category;
    }
}
