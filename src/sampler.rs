//! Terrain sampling - full re-sample of a square region through a cover service

use glam::Vec3;
use tracing::debug;

use crate::cover::{GroundCover, OUT_OF_BOUNDS};
use crate::grid::TerrainGrid;

/// Default lattice pitch in world units.
pub const DEFAULT_SPACING: f32 = 15.0;

/// Samples the dominant ground-cover category at every cell centre of a
/// square lattice around `center`.
///
/// Every call is a full re-sample: the cover service is refreshed and
/// each cell queried again. There is no incremental update; callers
/// re-run this whenever the centre, the radius, or the underlying paint
/// data changes. Deterministic for identical inputs and an unchanged
/// cover service.
pub fn sample(
    cover: &mut dyn GroundCover,
    center: Vec3,
    radius: f32,
    spacing: f32,
) -> TerrainGrid {
    cover.refresh();
    let side = TerrainGrid::side_for(radius, spacing);
    let mut grid = TerrainGrid::new(center, radius, spacing, vec![OUT_OF_BOUNDS; side * side]);
    for idx in 0..grid.len() {
        let category = cover.category_at(grid.world_pos(idx));
        grid.set(idx, category);
    }
    debug!(side, cells = grid.len(), "terrain sampled");
    grid
}
