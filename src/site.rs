//! Site description - YAML configuration for one suggestion session

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::Deserialize;

use crate::catalog::{BuildingCatalog, BuildingType};
use crate::census::{PlacedStructure, SceneIndex};
use crate::cover::LayeredCover;
use crate::occupancy::DiscObstacles;
use crate::planner::{Planner, PlannerBuilder, PlannerSettings};
use crate::rules::RuleFile;
use crate::sampler;

fn default_radius() -> f32 {
    345.0
}

fn default_spacing() -> f32 {
    sampler::DEFAULT_SPACING
}

fn default_container() -> String {
    "Buildings".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    #[serde(default)]
    pub seed: Option<u64>,
    pub site: SiteFrame,
    #[serde(default = "default_container")]
    pub container: String,
    pub cover: CoverSpec,
    pub catalog: Vec<BuildingType>,
    #[serde(default)]
    pub structures: Vec<StructureSpec>,
    /// Rules file path, relative to the site file's directory.
    pub rules_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteFrame {
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverSpec {
    pub origin: [f32; 3],
    pub size: [f32; 2],
    pub layers: Vec<String>,
    /// Rows of dominant layer indices; row count is the raster height,
    /// the first row's length its width.
    pub dominant: Vec<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureSpec {
    pub name: String,
    pub tag: String,
    #[serde(default)]
    pub container: Option<String>,
    pub position: [f32; 3],
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.site.radius < 1.0 {
            bail!("site radius must be at least 1");
        }
        if self.site.spacing <= 0.0 {
            bail!("sampling spacing must be positive");
        }
        if self.cover.layers.is_empty() {
            bail!("cover must define at least one layer");
        }
        if self.cover.dominant.is_empty() {
            bail!("cover must define at least one dominant row");
        }
        let width = self.cover.dominant[0].len();
        for (row, cells) in self.cover.dominant.iter().enumerate() {
            if cells.len() != width {
                bail!("cover row {row} has {} cells, expected {width}", cells.len());
            }
            for &layer in cells {
                if layer < 0 || layer as usize >= self.cover.layers.len() {
                    bail!("cover row {row} references unknown layer index {layer}");
                }
            }
        }
        if self.catalog.is_empty() {
            bail!("catalog must define at least one building type");
        }
        for building in &self.catalog {
            if building.footprint <= 0.0 {
                bail!("building '{}' needs a positive footprint", building.name);
            }
        }
        Ok(())
    }

    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.site.center)
    }

    pub fn build_cover(&self) -> LayeredCover {
        LayeredCover::from_dominant(
            Vec3::from_array(self.cover.origin),
            self.cover.size[0],
            self.cover.size[1],
            self.cover.layers.clone(),
            &self.cover.dominant,
        )
    }

    pub fn build_catalog(&self) -> BuildingCatalog {
        BuildingCatalog::new(self.catalog.clone())
    }

    pub fn build_census(&self) -> SceneIndex {
        SceneIndex::new(
            self.structures
                .iter()
                .map(|spec| PlacedStructure {
                    name: spec.name.clone(),
                    tag: spec.tag.clone(),
                    container: spec
                        .container
                        .clone()
                        .unwrap_or_else(|| self.container.clone()),
                    position: Vec3::from_array(spec.position),
                })
                .collect(),
        )
    }

    /// Obstacle discs for the placed structures: a structure occupies
    /// the footprint of its catalog type, or a unit disc when its name
    /// is not in the catalog.
    pub fn build_obstacles(&self) -> DiscObstacles {
        let catalog = self.build_catalog();
        let mut obstacles = DiscObstacles::default();
        for spec in &self.structures {
            let radius = catalog.get(&spec.name).map_or(1.0, |b| b.footprint);
            obstacles.push(Vec3::from_array(spec.position), radius);
        }
        obstacles
    }
}

/// Loads site files relative to a base directory, mirroring how rule
/// and site assets live next to each other on disk.
pub struct SiteLoader {
    base_dir: PathBuf,
}

impl SiteLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<SiteConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read site file {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Wires a planner to the site's in-memory services and its rule
    /// file. `site_path` anchors the relative `rules_file` reference.
    pub fn build_planner(&self, site_path: impl AsRef<Path>, config: &SiteConfig) -> Result<Planner> {
        let site_path = self.base_dir.join(site_path);
        let rules_dir = site_path.parent().unwrap_or(Path::new("."));
        let rules_path = rules_dir.join(&config.rules_file);
        if !rules_path.exists() {
            bail!("rules file {} does not exist", rules_path.display());
        }

        let cover = config.build_cover();
        let rules = RuleFile::new(&rules_path, cover.layers().to_vec());
        let settings = PlannerSettings {
            site_name: config.name.clone(),
            center: config.center(),
            radius: config.site.radius,
            spacing: config.site.spacing,
            container: config.container.clone(),
            seed: config.seed,
        };

        Ok(PlannerBuilder::new(
            settings,
            config.build_catalog(),
            Box::new(rules),
            Box::new(config.build_census()),
        )
        .with_cover(Box::new(cover))
        .with_occupancy(Box::new(config.build_obstacles()))
        .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SITE: &str = "\
name: pond
seed: 11
site:
  center: [0, 0, 0]
  radius: 30
  spacing: 15
cover:
  origin: [-30, 0, -30]
  size: [60, 60]
  layers: [grass, water]
  dominant:
    - [0, 0, 1, 1]
    - [0, 0, 1, 1]
    - [0, 0, 0, 0]
    - [0, 0, 0, 0]
catalog:
  - name: House
    footprint: 2
    height: 4
  - name: Farm
structures:
  - name: Well
    tag: Prop
    position: [5, 0, 5]
rules_file: pond_rules.yaml
";

    #[test]
    fn site_file_parses_with_defaults() {
        let config: SiteConfig = serde_yaml::from_str(SITE).expect("site parses");
        config.validate().expect("site validates");

        assert_eq!(config.name, "pond");
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.container, "Buildings");
        // Farm picks up the catalog defaults
        let catalog = config.build_catalog();
        assert_eq!(catalog.get("Farm").map(|b| b.footprint), Some(1.0));
        assert_eq!(catalog.get("Farm").map(|b| b.height), Some(1.0));
    }

    #[test]
    fn ragged_cover_rows_fail_validation() {
        let broken = SITE.replace("    - [0, 0, 1, 1]\n    - [0, 0, 1, 1]\n", "    - [0, 0, 1]\n    - [0, 0, 1, 1]\n");
        let config: SiteConfig = serde_yaml::from_str(&broken).expect("site parses");

        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_layer_index_fails_validation() {
        let broken = SITE.replace("- [0, 0, 0, 0]\n    - [0, 0, 0, 0]", "- [0, 0, 0, 0]\n    - [0, 0, 0, 5]");
        let config: SiteConfig = serde_yaml::from_str(&broken).expect("site parses");

        assert!(config.validate().is_err());
    }

    #[test]
    fn structures_inherit_the_site_container() {
        let config: SiteConfig = serde_yaml::from_str(SITE).expect("site parses");
        let census = config.build_census();

        use crate::census::StructureIndex;
        assert_eq!(census.count_matching("Buildings", &["Well"]), 1);
    }

    #[test]
    fn loader_wires_a_working_planner() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("pond.yaml"), SITE).expect("write site");
        let mut rules = fs::File::create(dir.path().join("pond_rules.yaml")).expect("rules file");
        rules
            .write_all(b"terrain:\n  - terrain: water\n    suggestion: House\n    min_dist: 15\n    max_dist: 30\n")
            .expect("write rules");

        let loader = SiteLoader::new(dir.path());
        let config = loader.load("pond.yaml").expect("site loads");
        let mut planner = loader
            .build_planner("pond.yaml", &config)
            .expect("planner builds");

        let candidates = planner.evaluate().expect("evaluation runs");
        assert!(candidates.iter().any(|c| c.building == "House" && c.weight == 10.0));
    }

    #[test]
    fn missing_rules_file_fails_to_wire() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("pond.yaml"), SITE).expect("write site");

        let loader = SiteLoader::new(dir.path());
        let config = loader.load("pond.yaml").expect("site loads");
        assert!(loader.build_planner("pond.yaml", &config).is_err());
    }
}
