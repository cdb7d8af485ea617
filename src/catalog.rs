//! Building catalog - placeable building types and their physical size

use serde::{Deserialize, Serialize};

fn default_footprint() -> f32 {
    1.0
}

fn default_height() -> f32 {
    1.0
}

/// A building type the designer can place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingType {
    pub name: String,
    /// Horizontal clearance radius required around the placement point.
    #[serde(default = "default_footprint")]
    pub footprint: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

/// The known building types, sorted by name so presentation order is
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct BuildingCatalog {
    entries: Vec<BuildingType>,
}

impl BuildingCatalog {
    pub fn new(mut entries: Vec<BuildingType>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    pub fn entries(&self) -> &[BuildingType] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&BuildingType> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
