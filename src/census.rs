//! Structure census - queries over already-placed structures

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Record of a structure already placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedStructure {
    pub name: String,
    pub tag: String,
    /// Logical grouping the structure lives under, e.g. "Buildings".
    pub container: String,
    pub position: Vec3,
}

/// Abstract registry over whatever world representation exists. The
/// core only ever reads through this interface.
pub trait StructureIndex {
    /// All placed structures matching both scene name and tag.
    fn find_by_name_and_tag(&self, name: &str, tag: &str) -> Vec<PlacedStructure>;

    /// Number of structures inside `container` whose name is in `names`.
    fn count_matching(&self, container: &str, names: &[&str]) -> usize;
}

/// In-memory scene index.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    structures: Vec<PlacedStructure>,
}

impl SceneIndex {
    pub fn new(structures: Vec<PlacedStructure>) -> Self {
        Self { structures }
    }

    pub fn push(&mut self, structure: PlacedStructure) {
        self.structures.push(structure);
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureIndex for SceneIndex {
    fn find_by_name_and_tag(&self, name: &str, tag: &str) -> Vec<PlacedStructure> {
        self.structures
            .iter()
            .filter(|s| s.name == name && s.tag == tag)
            .cloned()
            .collect()
    }

    fn count_matching(&self, container: &str, names: &[&str]) -> usize {
        self.structures
            .iter()
            .filter(|s| s.container == container && names.contains(&s.name.as_str()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> SceneIndex {
        SceneIndex::new(vec![
            PlacedStructure {
                name: "Well".into(),
                tag: "Prop".into(),
                container: "Buildings".into(),
                position: Vec3::ZERO,
            },
            PlacedStructure {
                name: "Well".into(),
                tag: "Decoration".into(),
                container: "Props".into(),
                position: Vec3::new(4.0, 0.0, 4.0),
            },
            PlacedStructure {
                name: "House".into(),
                tag: "Building".into(),
                container: "Buildings".into(),
                position: Vec3::new(-10.0, 0.0, 3.0),
            },
        ])
    }

    #[test]
    fn find_matches_name_and_tag() {
        let scene = sample_scene();

        let wells = scene.find_by_name_and_tag("Well", "Prop");
        assert_eq!(wells.len(), 1);
        assert_eq!(wells[0].position, Vec3::ZERO);

        assert!(scene.find_by_name_and_tag("Well", "Building").is_empty());
        assert!(scene.find_by_name_and_tag("Keep", "Prop").is_empty());
    }

    #[test]
    fn count_is_scoped_to_the_container() {
        let scene = sample_scene();

        assert_eq!(scene.count_matching("Buildings", &["Well"]), 1);
        assert_eq!(scene.count_matching("Buildings", &["Well", "House"]), 2);
        assert_eq!(scene.count_matching("Props", &["Well"]), 1);
        assert_eq!(scene.count_matching("Buildings", &["Keep"]), 0);
    }
}
