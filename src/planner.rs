//! Planner facade - binds the external services and runs the passes

use glam::Vec3;
use tracing::{debug, warn};

use crate::catalog::BuildingCatalog;
use crate::census::StructureIndex;
use crate::cover::GroundCover;
use crate::error::PlanError;
use crate::evaluate::{self, WeightedCandidate};
use crate::grid::TerrainGrid;
use crate::occupancy::{Occupancy, Unobstructed};
use crate::rank::Jitter;
use crate::rules::RuleSource;
use crate::sampler;
use crate::suggest::{self, Scene, SuggestedLocation};

pub struct PlannerSettings {
    pub site_name: String,
    pub center: Vec3,
    pub radius: f32,
    pub spacing: f32,
    /// Structure container that scopes census counts.
    pub container: String,
    /// Seed for presentation jitter; `None` keeps ranking deterministic.
    pub seed: Option<u64>,
}

pub struct PlannerBuilder {
    settings: PlannerSettings,
    catalog: BuildingCatalog,
    rules: Box<dyn RuleSource>,
    census: Box<dyn StructureIndex>,
    cover: Option<Box<dyn GroundCover>>,
    occupancy: Box<dyn Occupancy>,
}

impl PlannerBuilder {
    pub fn new(
        settings: PlannerSettings,
        catalog: BuildingCatalog,
        rules: Box<dyn RuleSource>,
        census: Box<dyn StructureIndex>,
    ) -> Self {
        Self {
            settings,
            catalog,
            rules,
            census,
            cover: None,
            occupancy: Box::new(Unobstructed),
        }
    }

    pub fn with_cover(mut self, cover: Box<dyn GroundCover>) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn with_occupancy(mut self, occupancy: Box<dyn Occupancy>) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn build(self) -> Planner {
        Planner {
            jitter: Jitter::from_seed(self.settings.seed),
            settings: self.settings,
            catalog: self.catalog,
            rules: self.rules,
            census: self.census,
            cover: self.cover,
            occupancy: self.occupancy,
            grid: None,
        }
    }
}

/// One suggestion session over a fixed site frame. Owns the sampled
/// grid snapshot and re-reads the rule store on every request.
pub struct Planner {
    settings: PlannerSettings,
    catalog: BuildingCatalog,
    rules: Box<dyn RuleSource>,
    census: Box<dyn StructureIndex>,
    cover: Option<Box<dyn GroundCover>>,
    occupancy: Box<dyn Occupancy>,
    grid: Option<TerrainGrid>,
    jitter: Jitter,
}

impl Planner {
    /// Full terrain re-sample. Needed again whenever the site frame or
    /// the underlying paint data changes; there is no incremental
    /// update.
    pub fn analyze(&mut self) -> Result<(), PlanError> {
        let cover = self
            .cover
            .as_deref_mut()
            .ok_or(PlanError::GroundCoverMissing)?;
        let grid = sampler::sample(
            cover,
            self.settings.center,
            self.settings.radius,
            self.settings.spacing,
        );
        debug!(
            site = %self.settings.site_name,
            cells = grid.len(),
            "terrain analyzed"
        );
        self.grid = Some(grid);
        Ok(())
    }

    /// Ranked building-type suggestions for the current surroundings.
    /// Re-samples the terrain and re-reads the rule store.
    pub fn evaluate(&mut self) -> Result<Vec<WeightedCandidate>, PlanError> {
        self.analyze()?;
        let building_rules = self.rules.load_building_rules()?;
        let terrain_rules = self.rules.load_terrain_rules()?;
        let grid = self.grid.as_ref().ok_or(PlanError::GroundCoverMissing)?;
        Ok(evaluate::evaluate(
            &self.catalog,
            &building_rules,
            &terrain_rules,
            grid,
            self.census.as_ref(),
            &self.settings.container,
            &mut self.jitter,
        ))
    }

    /// Ranked placement suggestions for one chosen building type.
    /// Re-reads the rule store and uses the last analyzed grid; before
    /// the first analysis only building rules can contribute.
    pub fn suggest(&mut self, building: &str) -> Result<Vec<SuggestedLocation>, PlanError> {
        let building_rules = self.rules.load_building_rules()?;
        let terrain_rules = self.rules.load_terrain_rules()?;
        let scene = Scene {
            grid: self.grid.as_ref(),
            census: self.census.as_ref(),
            occupancy: self.occupancy.as_ref(),
            center: self.settings.center,
            radius: self.settings.radius,
        };
        let locations = suggest::suggest(
            building,
            &self.catalog,
            &building_rules,
            &terrain_rules,
            &scene,
            &mut self.jitter,
        );
        if locations.is_empty() {
            warn!(building, "no placement suggestions to show");
        }
        Ok(locations)
    }

    pub fn site_name(&self) -> &str {
        &self.settings.site_name
    }

    pub fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> Option<&TerrainGrid> {
        self.grid.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuildingType;
    use crate::census::{PlacedStructure, SceneIndex};
    use crate::cover::LayeredCover;
    use crate::rules::{StaticRules, StructureRef, TerrainRule};

    fn settings() -> PlannerSettings {
        PlannerSettings {
            site_name: "test".into(),
            center: Vec3::ZERO,
            radius: 30.0,
            spacing: 15.0,
            container: "Buildings".into(),
            seed: None,
        }
    }

    fn catalog() -> BuildingCatalog {
        BuildingCatalog::new(vec![
            BuildingType {
                name: "Farm".into(),
                footprint: 3.0,
                height: 2.0,
            },
            BuildingType {
                name: "House".into(),
                footprint: 2.0,
                height: 4.0,
            },
        ])
    }

    fn grass_cover() -> LayeredCover {
        LayeredCover::from_dominant(
            Vec3::new(-30.0, 0.0, -30.0),
            60.0,
            60.0,
            vec!["grass".into()],
            &[vec![0; 4], vec![0; 4], vec![0; 4], vec![0; 4]],
        )
    }

    #[test]
    fn missing_cover_is_a_reportable_fault() {
        let mut planner = PlannerBuilder::new(
            settings(),
            catalog(),
            Box::new(StaticRules::default()),
            Box::new(SceneIndex::default()),
        )
        .build();

        assert!(matches!(
            planner.evaluate(),
            Err(PlanError::GroundCoverMissing)
        ));
    }

    #[test]
    fn evaluate_samples_and_scores() {
        let rules = StaticRules {
            building: Vec::new(),
            terrain: vec![TerrainRule {
                terrain: 0,
                suggestion: "Farm".into(),
                min_dist: 0.0,
                max_dist: 0.0,
                weight: 10.0,
            }],
        };
        let mut planner = PlannerBuilder::new(
            settings(),
            catalog(),
            Box::new(rules),
            Box::new(SceneIndex::default()),
        )
        .with_cover(Box::new(grass_cover()))
        .build();

        let candidates = planner.evaluate().expect("evaluation runs");
        assert_eq!(candidates[0].building, "Farm");
        assert_eq!(candidates[0].weight, 10.0);
        assert!(planner.grid().is_some());
    }

    #[test]
    fn suggest_without_analysis_uses_building_rules_only() {
        let rules = StaticRules {
            building: vec![crate::rules::BuildingRule {
                existing: vec![StructureRef {
                    name: "Well".into(),
                    tag: "Prop".into(),
                }],
                suggestion: vec!["House".into()],
                min_dist: 5.0,
                max_dist: 10.0,
                weight: 20.0,
            }],
            terrain: vec![TerrainRule {
                terrain: 0,
                suggestion: "House".into(),
                min_dist: 0.0,
                max_dist: 0.0,
                weight: 10.0,
            }],
        };
        let census = SceneIndex::new(vec![PlacedStructure {
            name: "Well".into(),
            tag: "Prop".into(),
            container: "Buildings".into(),
            position: Vec3::ZERO,
        }]);
        let mut planner =
            PlannerBuilder::new(settings(), catalog(), Box::new(rules), Box::new(census))
                .with_cover(Box::new(grass_cover()))
                .build();

        let locations = planner.suggest("House").expect("suggestion runs");
        assert!(!locations.is_empty());
        // no grid yet, so the terrain rule cannot have contributed
        assert!(locations.iter().all(|l| l.weight % 20.0 == 0.0));
    }

    #[test]
    fn empty_result_is_signaled_not_an_error() {
        let mut planner = PlannerBuilder::new(
            settings(),
            catalog(),
            Box::new(StaticRules::default()),
            Box::new(SceneIndex::default()),
        )
        .with_cover(Box::new(grass_cover()))
        .build();

        planner.analyze().expect("analysis runs");
        let locations = planner.suggest("House").expect("suggestion runs");
        assert!(locations.is_empty());
    }
}
