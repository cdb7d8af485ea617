//! Building-type scoring - which building best fits the surroundings

use serde::Serialize;

use crate::catalog::BuildingCatalog;
use crate::census::StructureIndex;
use crate::grid::TerrainGrid;
use crate::rank::{self, Jitter};
use crate::rules::{BuildingRule, TerrainRule};

/// One candidate building type with its accumulated rule weight.
#[derive(Debug, Clone, Serialize)]
pub struct WeightedCandidate {
    pub building: String,
    pub weight: f32,
}

/// Scores every catalog building type against the rule set and returns
/// all candidates ranked for presentation.
///
/// Building rules credit `count * weight` to each suggested type, where
/// `count` is the number of matching structures inside `container`.
/// Terrain rules credit a flat `weight` when their category appears
/// anywhere in the grid, regardless of how many cells carry it. A rule
/// suggesting an unknown building type credits nothing; an empty rule
/// store yields all-zero weights.
pub fn evaluate(
    catalog: &BuildingCatalog,
    building_rules: &[BuildingRule],
    terrain_rules: &[TerrainRule],
    grid: &TerrainGrid,
    census: &dyn StructureIndex,
    container: &str,
    jitter: &mut Jitter,
) -> Vec<WeightedCandidate> {
    let mut candidates: Vec<WeightedCandidate> = catalog
        .entries()
        .iter()
        .map(|building| WeightedCandidate {
            building: building.name.clone(),
            weight: 0.0,
        })
        .collect();

    for rule in building_rules {
        if rule.existing.is_empty() {
            continue;
        }
        let names: Vec<&str> = rule.existing.iter().map(|r| r.name.as_str()).collect();
        let count = census.count_matching(container, &names);
        if count == 0 {
            continue;
        }
        for suggested in &rule.suggestion {
            if let Some(candidate) = candidates.iter_mut().find(|c| &c.building == suggested) {
                candidate.weight += count as f32 * rule.weight;
            }
        }
    }

    for rule in terrain_rules {
        if grid.contains(rule.terrain) {
            if let Some(candidate) = candidates
                .iter_mut()
                .find(|c| c.building == rule.suggestion)
            {
                candidate.weight += rule.weight;
            }
        }
    }

    rank::rank_by_weight(
        &mut candidates,
        |candidate| candidate.weight,
        jitter,
        rank::CANDIDATE_JITTER,
    );
    candidates
}
