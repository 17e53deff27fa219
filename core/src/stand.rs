//! Stand membership of light pixels.

use crate::{
    grid::Grid,
    types::{PixelPos, StandId},
};

/// Pixel-membership query for named stands.
pub trait StandFootprint {
    /// Stand the pixel belongs to, if any.
    fn stand_at(&self, pixel: PixelPos) -> Option<StandId>;

    /// Every pixel of the stand, in row-major order.
    fn pixels(&self, stand: StandId) -> Vec<PixelPos>;

    fn contains(&self, stand: StandId, pixel: PixelPos) -> bool {
        self.stand_at(pixel) == Some(stand)
    }
}

/// Stand ids rasterised on the light grid; negative cells belong to no stand.
#[derive(Debug, Clone)]
pub struct StandGrid {
    grid: Grid<StandId>,
}

impl StandGrid {
    pub fn new(size_x: i32, size_y: i32) -> Self {
        Self {
            grid: Grid::filled(size_x, size_y, crate::types::LIGHT_CELL_SIZE, (0.0, 0.0), -1),
        }
    }

    pub fn set(&mut self, pixel: PixelPos, stand: StandId) {
        if let Some(cell) = self.grid.get_mut(pixel) {
            *cell = stand;
        }
    }

    /// Assign every pixel in `[from, to)` to `stand`.
    pub fn fill_rect(&mut self, from: PixelPos, to: PixelPos, stand: StandId) {
        for y in from.y..to.y {
            for x in from.x..to.x {
                self.set(PixelPos::new(x, y), stand);
            }
        }
    }
}

impl StandFootprint for StandGrid {
    fn stand_at(&self, pixel: PixelPos) -> Option<StandId> {
        self.grid.get(pixel).copied().filter(|id| *id >= 0)
    }

    fn pixels(&self, stand: StandId) -> Vec<PixelPos> {
        if stand < 0 {
            return Vec::new();
        }
        self.grid
            .iter()
            .filter(|(_, id)| **id == stand)
            .map(|(pos, _)| pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_pixels_belong_to_no_stand() {
        let mut stands = StandGrid::new(10, 10);
        stands.fill_rect(PixelPos::new(0, 0), PixelPos::new(2, 3), 7);
        assert_eq!(stands.stand_at(PixelPos::new(1, 2)), Some(7));
        assert_eq!(stands.stand_at(PixelPos::new(2, 2)), None);
        assert_eq!(stands.stand_at(PixelPos::new(-1, 0)), None);
        assert_eq!(stands.pixels(7).len(), 6);
        assert!(stands.contains(7, PixelPos::new(0, 0)));
    }

    #[test]
    fn negative_stand_ids_have_no_pixels() {
        let mut stands = StandGrid::new(10, 10);
        stands.fill_rect(PixelPos::new(0, 0), PixelPos::new(2, 3), 7);
        assert!(stands.pixels(-1).is_empty(), "unassigned cells are not a stand");
        assert!(!stands.contains(-1, PixelPos::new(5, 5)));
    }
}
