//! Location suggestion - concrete placement points for a chosen building

use glam::Vec3;
use serde::Serialize;
use tracing::debug;

use crate::catalog::BuildingCatalog;
use crate::census::StructureIndex;
use crate::cover::{CategoryId, OUT_OF_BOUNDS};
use crate::grid::TerrainGrid;
use crate::occupancy::Occupancy;
use crate::rank::{self, Jitter};
use crate::rules::{BuildingRule, TerrainRule};

/// Two candidate points closer than this fold into one suggestion.
pub const MERGE_DISTANCE: f32 = 2.0;

/// Most suggestions returned from one request.
pub const MAX_SUGGESTIONS: usize = 10;

/// Longest neighbor walk along one direction, in lattice steps.
const MAX_WALK_STEPS: i64 = 10;

/// Depth handed to the occupancy probe under each candidate point.
const PROBE_DEPTH: f32 = 100.0;

/// The eight lattice directions as (row, col) deltas; also reused as
/// (x, z) unit offsets by the building-rule expansion.
const DIRECTIONS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A clustered placement suggestion. Two raw candidate points within
/// [`MERGE_DISTANCE`] of each other are treated as the same suggestion;
/// the first point encountered anchors the reported position.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedLocation {
    pub position: Vec3,
    pub weight: f32,
}

/// Read-only surroundings for one suggestion request.
pub struct Scene<'a> {
    /// Last sampled grid; `None` skips the terrain pass entirely.
    pub grid: Option<&'a TerrainGrid>,
    pub census: &'a dyn StructureIndex,
    pub occupancy: &'a dyn Occupancy,
    pub center: Vec3,
    pub radius: f32,
}

/// Searches the grid and the structure census for placement points for
/// `building`, folds near-duplicates, and returns the top suggestions
/// ranked by `weight + jitter`. Entries whose accumulated weight is not
/// strictly positive are dropped. An empty result is a normal outcome,
/// not a fault.
pub fn suggest(
    building: &str,
    catalog: &BuildingCatalog,
    building_rules: &[BuildingRule],
    terrain_rules: &[TerrainRule],
    scene: &Scene<'_>,
    jitter: &mut Jitter,
) -> Vec<SuggestedLocation> {
    let mut locations = collect_candidates(building, catalog, building_rules, terrain_rules, scene);

    locations.retain(|location| location.weight > 0.0);
    rank::rank_by_weight(
        &mut locations,
        |location| location.weight,
        jitter,
        rank::LOCATION_JITTER,
    );
    locations.truncate(MAX_SUGGESTIONS);
    debug!(building, suggestions = locations.len(), "placement search done");
    locations
}

/// Raw accumulation pass: all candidate points folded by proximity, not
/// yet filtered, ranked, or capped.
pub(crate) fn collect_candidates(
    building: &str,
    catalog: &BuildingCatalog,
    building_rules: &[BuildingRule],
    terrain_rules: &[TerrainRule],
    scene: &Scene<'_>,
) -> Vec<SuggestedLocation> {
    let mut locations: Vec<SuggestedLocation> = Vec::new();

    if let Some(grid) = scene.grid {
        let rules: Vec<&TerrainRule> = terrain_rules
            .iter()
            .filter(|rule| rule.suggestion == building)
            .collect();
        for (idx, category) in grid.iter() {
            if category == OUT_OF_BOUNDS {
                continue;
            }
            for rule in &rules {
                // ring rules never fire on a cell that already carries
                // the sought category
                if rule.min_dist != 0.0 && category == rule.terrain {
                    continue;
                }
                if rule.min_dist == 0.0 && category == rule.terrain {
                    fold_location(&mut locations, grid.world_pos(idx), rule.weight);
                } else if rule.max_dist > 0.0
                    && neighbor_in_band(grid, idx, rule.terrain, rule.min_dist, rule.max_dist)
                {
                    fold_location(&mut locations, grid.world_pos(idx), rule.weight);
                }
            }
        }
    }

    if let Some(building_type) = catalog.get(building) {
        let footprint = building_type.footprint;
        for rule in building_rules {
            if rule.existing.is_empty() || footprint <= 0.0 {
                continue;
            }
            if !rule.suggestion.iter().any(|s| s == building) {
                continue;
            }
            for &(dx, dz) in &DIRECTIONS {
                let direction = Vec3::new(dx as f32, 0.0, dz as f32);
                for reference in &rule.existing {
                    for placed in scene
                        .census
                        .find_by_name_and_tag(&reference.name, &reference.tag)
                    {
                        let mut step = 0.0_f32;
                        while step * footprint + rule.min_dist < rule.max_dist {
                            let offset = rule.min_dist + step * footprint;
                            let point = placed.position + direction * offset;
                            if point.distance(scene.center) <= scene.radius
                                && !scene.occupancy.is_obstructed(point, footprint, PROBE_DEPTH)
                            {
                                fold_location(&mut locations, point, rule.weight);
                            }
                            step += 1.0;
                        }
                    }
                }
            }
        }
    }

    locations
}

/// Folds one candidate point into the working set: the weight joins the
/// first existing entry within [`MERGE_DISTANCE`], otherwise the point
/// opens a new entry. The relation is proximity, not equivalence;
/// chains of near-duplicates merge pairwise in encounter order, so
/// callers must not rely on a transitive clustering.
fn fold_location(locations: &mut Vec<SuggestedLocation>, position: Vec3, weight: f32) {
    match locations
        .iter_mut()
        .find(|entry| entry.position.distance(position) < MERGE_DISTANCE)
    {
        Some(entry) => entry.weight += weight,
        None => locations.push(SuggestedLocation { position, weight }),
    }
}

/// Walks the eight lattice directions from `idx` one cell at a time,
/// testing the world-space Euclidean distance band at every step. A
/// direction ends on leaving the grid, on exceeding `max_dist`, or
/// after [`MAX_WALK_STEPS`] steps. Rows and columns are tracked
/// separately, so the walk can never wrap across a grid edge into the
/// far side of a neighboring row.
fn neighbor_in_band(
    grid: &TerrainGrid,
    idx: usize,
    terrain: CategoryId,
    min_dist: f32,
    max_dist: f32,
) -> bool {
    let origin = grid.world_pos(idx);
    let (row, col) = grid.row_col(idx);
    let side = grid.side() as i64;
    for &(dr, dc) in &DIRECTIONS {
        for step in 1..=MAX_WALK_STEPS {
            let r = row as i64 + dr * step;
            let c = col as i64 + dc * step;
            if r < 0 || r >= side || c < 0 || c >= side {
                break;
            }
            let neighbor = grid.index(r as usize, c as usize);
            let dist = origin.distance(grid.world_pos(neighbor));
            if dist > max_dist {
                break;
            }
            if dist < min_dist {
                continue;
            }
            let category = grid.category(neighbor);
            if category != OUT_OF_BOUNDS && category == terrain {
                return true;
            }
        }
    }
    false
}
