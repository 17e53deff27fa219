//! Shared primitive types and landscape constants.

use serde::{Deserialize, Serialize};

/// Side length of one light pixel in metres.
pub const LIGHT_CELL_SIZE: f64 = 2.0;

/// Side length of one resource unit in metres.
pub const RU_SIZE: f64 = 100.0;

/// Light pixels per resource-unit side (100 m / 2 m).
pub const LIGHT_CELLS_PER_RU: i32 = 50;

/// Sapling slots per light pixel.
pub const NSAPCELLS: usize = 5;

/// Stand identifier as used by the stand grid. Negative values mean "no stand".
pub type StandId = i32;

/// A pixel address on the light grid (x to the east, y to the north).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Fold an absolute pixel position into the resource unit whose corner
    /// pixel is `offset`. Works regardless of the absolute landscape shift.
    pub fn fold_into(self, offset: PixelPos) -> PixelPos {
        PixelPos {
            x: offset.x + self.x.rem_euclid(LIGHT_CELLS_PER_RU),
            y: offset.y + self.y.rem_euclid(LIGHT_CELLS_PER_RU),
        }
    }
}

/// Axis-aligned rectangle in model coordinates (metres). Right/top edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Offset between model coordinates (landscape origin at 0/0) and
/// real-world (GIS) coordinates. No rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GisTransform {
    pub origin_x: f64,
    pub origin_y: f64,
}

impl GisTransform {
    pub fn new(origin_x: f64, origin_y: f64) -> Self {
        Self { origin_x, origin_y }
    }

    pub fn model_to_gis(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.origin_x, y + self.origin_y)
    }

    pub fn gis_to_model(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.origin_x, y - self.origin_y)
    }
}

/// Carbon / nitrogen mass pair (kg/ha).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CNPair {
    pub c: f64,
    pub n: f64,
}

impl CNPair {
    pub const fn new(c: f64, n: f64) -> Self {
        Self { c, n }
    }

    pub fn is_empty(&self) -> bool {
        self.c == 0.0
    }
}

impl std::ops::AddAssign for CNPair {
    fn add_assign(&mut self, rhs: Self) {
        self.c += rhs.c;
        self.n += rhs.n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_keeps_position_inside_target_unit() {
        let offset = PixelPos::new(50, 0);
        assert_eq!(PixelPos::new(10, 20).fold_into(offset), PixelPos::new(60, 20));
        assert_eq!(PixelPos::new(160, 120).fold_into(offset), PixelPos::new(60, 20));
        assert_eq!(PixelPos::new(-40, -1).fold_into(offset), PixelPos::new(60, 49));
    }

    #[test]
    fn rect_right_edge_is_exclusive() {
        let r = Rect { x_min: 0.0, y_min: 0.0, x_max: 100.0, y_max: 100.0 };
        assert!(r.contains(0.0, 99.9));
        assert!(!r.contains(100.0, 50.0));
    }
}
