//! Ground-cover queries - dominant paint layer at a world position

use glam::Vec3;
use tracing::debug;

/// Identifier of a terrain paint layer.
pub type CategoryId = i32;

/// Returned for positions outside the covered terrain.
pub const OUT_OF_BOUNDS: CategoryId = -1;

/// External ground-cover service.
///
/// The underlying paint data changes rarely but sampling happens often,
/// so implementations cache and expose an explicit recache hook.
pub trait GroundCover {
    /// Dominant category at a world position, or [`OUT_OF_BOUNDS`] when
    /// the position lies outside the terrain.
    fn category_at(&self, position: Vec3) -> CategoryId;

    /// Recaches from the underlying paint data. Called once per
    /// analysis pass.
    fn refresh(&mut self);
}

/// In-memory layered raster anchored at a world origin.
///
/// Stores a per-cell, per-layer paint weight. The dominant layer of
/// each cell is cached and only recomputed on
/// [`refresh`](GroundCover::refresh), so paint edits are invisible to
/// lookups until the next recache.
#[derive(Debug, Clone)]
pub struct LayeredCover {
    origin: Vec3,
    size_x: f32,
    size_z: f32,
    width: usize,
    height: usize,
    layers: Vec<String>,
    weights: Vec<f32>,
    dominant: Vec<CategoryId>,
}

impl LayeredCover {
    /// Raster of `width * height` cells spanning `size_x * size_z`
    /// world units from `origin`, all weights zero.
    pub fn new(
        origin: Vec3,
        size_x: f32,
        size_z: f32,
        width: usize,
        height: usize,
        layers: Vec<String>,
    ) -> Self {
        let mut cover = Self {
            origin,
            size_x,
            size_z,
            width,
            height,
            weights: vec![0.0; width * height * layers.len()],
            dominant: vec![0; width * height],
            layers,
        };
        cover.recache();
        cover
    }

    /// Builds a raster from rows of dominant layer indices (full weight
    /// on the named layer, zero elsewhere). Row count fixes the raster
    /// height, the first row's length its width.
    pub fn from_dominant(
        origin: Vec3,
        size_x: f32,
        size_z: f32,
        layers: Vec<String>,
        rows: &[Vec<CategoryId>],
    ) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cover = Self::new(origin, size_x, size_z, width, height, layers);
        for (row, cells) in rows.iter().enumerate() {
            for (col, &layer) in cells.iter().enumerate() {
                if layer >= 0 && (layer as usize) < cover.layers.len() {
                    cover.paint(row, col, layer as usize, 1.0);
                }
            }
        }
        cover.recache();
        cover
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Palette index for a layer name.
    pub fn layer_index(&self, name: &str) -> Option<CategoryId> {
        self.layers
            .iter()
            .position(|layer| layer == name)
            .map(|idx| idx as CategoryId)
    }

    /// Sets one paint weight. Takes effect on the next refresh.
    pub fn paint(&mut self, row: usize, col: usize, layer: usize, weight: f32) {
        if row < self.height && col < self.width && layer < self.layers.len() {
            let idx = (row * self.width + col) * self.layers.len() + layer;
            self.weights[idx] = weight;
        }
    }

    fn recache(&mut self) {
        let layer_count = self.layers.len();
        for cell in 0..self.width * self.height {
            let mut dominant = 0;
            let mut greatest = f32::MIN;
            for layer in 0..layer_count {
                let weight = self.weights[cell * layer_count + layer];
                if weight > greatest {
                    greatest = weight;
                    dominant = layer as CategoryId;
                }
            }
            self.dominant[cell] = dominant;
        }
    }
}

impl GroundCover for LayeredCover {
    fn category_at(&self, position: Vec3) -> CategoryId {
        let relative = position - self.origin;
        let col = (relative.x / self.size_x * self.width as f32).round() as i64;
        let row = (relative.z / self.size_z * self.height as f32).round() as i64;
        if col < 0 || col >= self.width as i64 || row < 0 || row >= self.height as i64 {
            return OUT_OF_BOUNDS;
        }
        self.dominant[row as usize * self.width + col as usize]
    }

    fn refresh(&mut self) {
        self.recache();
        debug!(
            cells = self.dominant.len(),
            layers = self.layers.len(),
            "ground cover recached"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer_cover() -> LayeredCover {
        LayeredCover::new(
            Vec3::ZERO,
            40.0,
            40.0,
            4,
            4,
            vec!["grass".into(), "rock".into()],
        )
    }

    #[test]
    fn dominant_layer_wins() {
        let mut cover = two_layer_cover();
        cover.paint(1, 2, 0, 0.3);
        cover.paint(1, 2, 1, 0.7);
        cover.refresh();

        assert_eq!(cover.category_at(Vec3::new(20.0, 0.0, 10.0)), 1);
    }

    #[test]
    fn ties_pick_the_first_layer() {
        let mut cover = two_layer_cover();
        cover.paint(0, 0, 0, 0.5);
        cover.paint(0, 0, 1, 0.5);
        cover.refresh();

        assert_eq!(cover.category_at(Vec3::ZERO), 0);
    }

    #[test]
    fn outside_the_raster_is_out_of_bounds() {
        let cover = two_layer_cover();

        assert_eq!(cover.category_at(Vec3::new(-30.0, 0.0, 10.0)), OUT_OF_BOUNDS);
        assert_eq!(cover.category_at(Vec3::new(10.0, 0.0, 400.0)), OUT_OF_BOUNDS);
    }

    #[test]
    fn paint_edits_wait_for_refresh() {
        let mut cover = two_layer_cover();
        cover.paint(2, 2, 1, 1.0);

        assert_eq!(cover.category_at(Vec3::new(20.0, 0.0, 20.0)), 0);
        cover.refresh();
        assert_eq!(cover.category_at(Vec3::new(20.0, 0.0, 20.0)), 1);
    }

    #[test]
    fn from_dominant_rows() {
        let rows = vec![vec![0, 1], vec![1, 0]];
        let cover = LayeredCover::from_dominant(
            Vec3::ZERO,
            20.0,
            20.0,
            vec!["grass".into(), "rock".into()],
            &rows,
        );

        assert_eq!(cover.category_at(Vec3::new(0.0, 0.0, 0.0)), 0);
        assert_eq!(cover.category_at(Vec3::new(10.0, 0.0, 0.0)), 1);
        assert_eq!(cover.category_at(Vec3::new(0.0, 0.0, 10.0)), 1);
    }

    #[test]
    fn layer_lookup_by_name() {
        let cover = two_layer_cover();

        assert_eq!(cover.layer_index("rock"), Some(1));
        assert_eq!(cover.layer_index("lava"), None);
    }
}
