//! Placement rules - authored dependencies between buildings and terrain

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::cover::CategoryId;
use crate::error::PlanError;

/// Reference to an already-placed structure by scene name and tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructureRef {
    pub name: String,
    pub tag: String,
}

/// Placement relative to existing structures: promotes the suggested
/// building types near any matching structure, within a distance band.
#[derive(Debug, Clone)]
pub struct BuildingRule {
    pub existing: Vec<StructureRef>,
    pub suggestion: Vec<String>,
    pub min_dist: f32,
    pub max_dist: f32,
    pub weight: f32,
}

/// Placement relative to ground cover. `min_dist == 0` is the
/// distinguished "this cell itself must match" mode; a positive
/// `min_dist` asks for the category in a ring around the cell instead.
#[derive(Debug, Clone)]
pub struct TerrainRule {
    pub terrain: CategoryId,
    pub suggestion: String,
    pub min_dist: f32,
    pub max_dist: f32,
    pub weight: f32,
}

fn check_band(min_dist: f32, max_dist: f32) -> Result<(), PlanError> {
    if min_dist < 0.0 || max_dist < min_dist {
        return Err(PlanError::Rule(format!(
            "distance band requires max_dist >= min_dist >= 0, got [{min_dist}, {max_dist}]"
        )));
    }
    Ok(())
}

impl BuildingRule {
    pub fn validate(&self) -> Result<(), PlanError> {
        check_band(self.min_dist, self.max_dist)
    }
}

impl TerrainRule {
    pub fn validate(&self) -> Result<(), PlanError> {
        check_band(self.min_dist, self.max_dist)?;
        if self.terrain < 0 {
            return Err(PlanError::Rule(format!(
                "terrain rule for '{}' references a negative category",
                self.suggestion
            )));
        }
        Ok(())
    }
}

/// Rule repository. Re-queried at the start of every evaluation or
/// suggestion request; results are never cached across requests.
pub trait RuleSource {
    fn load_building_rules(&self) -> Result<Vec<BuildingRule>, PlanError>;
    fn load_terrain_rules(&self) -> Result<Vec<TerrainRule>, PlanError>;
}

/// Fixed in-memory rule set.
#[derive(Debug, Clone, Default)]
pub struct StaticRules {
    pub building: Vec<BuildingRule>,
    pub terrain: Vec<TerrainRule>,
}

impl RuleSource for StaticRules {
    fn load_building_rules(&self) -> Result<Vec<BuildingRule>, PlanError> {
        for rule in &self.building {
            rule.validate()?;
        }
        Ok(self.building.clone())
    }

    fn load_terrain_rules(&self) -> Result<Vec<TerrainRule>, PlanError> {
        for rule in &self.terrain {
            rule.validate()?;
        }
        Ok(self.terrain.clone())
    }
}

fn default_min_dist() -> f32 {
    5.0
}

fn default_max_dist() -> f32 {
    5.0
}

fn default_weight() -> f32 {
    10.0
}

#[derive(Debug, Default, Deserialize)]
struct RuleFileSpec {
    #[serde(default)]
    building: Vec<BuildingRuleSpec>,
    #[serde(default)]
    terrain: Vec<TerrainRuleSpec>,
}

#[derive(Debug, Deserialize)]
struct BuildingRuleSpec {
    #[serde(default)]
    existing: Vec<StructureRef>,
    #[serde(default)]
    suggestion: Vec<String>,
    #[serde(default = "default_min_dist")]
    min_dist: f32,
    #[serde(default = "default_max_dist")]
    max_dist: f32,
    #[serde(default = "default_weight")]
    weight: f32,
}

#[derive(Debug, Deserialize)]
struct TerrainRuleSpec {
    terrain: String,
    suggestion: String,
    #[serde(default = "default_min_dist")]
    min_dist: f32,
    #[serde(default = "default_max_dist")]
    max_dist: f32,
    #[serde(default = "default_weight")]
    weight: f32,
}

/// YAML-file rule repository. The file is re-read on every load so
/// edits between two requests take effect immediately. Terrain layer
/// names are resolved against the cover palette; a rule naming an
/// unknown layer is dropped with a warning, never an error.
#[derive(Debug, Clone)]
pub struct RuleFile {
    path: PathBuf,
    palette: Vec<String>,
}

impl RuleFile {
    pub fn new(path: impl AsRef<Path>, palette: Vec<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            palette,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_spec(&self) -> Result<RuleFileSpec, PlanError> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read rules file {}", self.path.display()))
            .map_err(PlanError::RuleLoad)?;
        let spec: RuleFileSpec = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
            .map_err(PlanError::RuleLoad)?;
        Ok(spec)
    }

    fn resolve_layer(&self, name: &str) -> Option<CategoryId> {
        self.palette
            .iter()
            .position(|layer| layer == name)
            .map(|idx| idx as CategoryId)
    }
}

impl RuleSource for RuleFile {
    fn load_building_rules(&self) -> Result<Vec<BuildingRule>, PlanError> {
        let spec = self.read_spec()?;
        let mut rules = Vec::with_capacity(spec.building.len());
        for raw in spec.building {
            let rule = BuildingRule {
                existing: raw.existing,
                suggestion: raw.suggestion,
                min_dist: raw.min_dist,
                max_dist: raw.max_dist,
                weight: raw.weight,
            };
            rule.validate()?;
            rules.push(rule);
        }
        Ok(rules)
    }

    fn load_terrain_rules(&self) -> Result<Vec<TerrainRule>, PlanError> {
        let spec = self.read_spec()?;
        let mut rules = Vec::with_capacity(spec.terrain.len());
        for raw in spec.terrain {
            let Some(terrain) = self.resolve_layer(&raw.terrain) else {
                warn!(layer = %raw.terrain, "terrain rule references unknown layer, skipping");
                continue;
            };
            let rule = TerrainRule {
                terrain,
                suggestion: raw.suggestion,
                min_dist: raw.min_dist,
                max_dist: raw.max_dist,
                weight: raw.weight,
            };
            rule.validate()?;
            rules.push(rule);
        }
        Ok(rules)
    }
}
