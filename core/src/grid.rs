//! Regular raster over model coordinates.
//!
//! Cell (0,0) is the south-west corner; x grows to the east and y to the north.
//! Data is stored row-major (`y * size_x + x`).

use crate::types::{PixelPos, Rect};

#[derive(Debug, Clone)]
pub struct Grid<T> {
    size_x: i32,
    size_y: i32,
    cell_size: f64,
    origin_x: f64,
    origin_y: f64,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(size_x: i32, size_y: i32, cell_size: f64, origin: (f64, f64), value: T) -> Self {
        assert!(size_x >= 0 && size_y >= 0, "grid dimensions must be non-negative");
        Self {
            size_x,
            size_y,
            cell_size,
            origin_x: origin.0,
            origin_y: origin.1,
            data: vec![value; (size_x * size_y) as usize],
        }
    }

    /// Reset every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value.clone());
    }
}

impl<T> Grid<T> {
    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn extent(&self) -> Rect {
        Rect {
            x_min: self.origin_x,
            y_min: self.origin_y,
            x_max: self.origin_x + self.size_x as f64 * self.cell_size,
            y_max: self.origin_y + self.size_y as f64 * self.cell_size,
        }
    }

    pub fn contains(&self, pos: PixelPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size_x && pos.y < self.size_y
    }

    pub fn linear_index(&self, pos: PixelPos) -> Option<usize> {
        self.contains(pos).then(|| (pos.y * self.size_x + pos.x) as usize)
    }

    pub fn position_of(&self, index: usize) -> PixelPos {
        let i = index as i32;
        PixelPos::new(i % self.size_x, i / self.size_x)
    }

    /// Pixel holding the model coordinate, or `None` outside the grid.
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<PixelPos> {
        let pos = PixelPos::new(
            ((x - self.origin_x) / self.cell_size).floor() as i32,
            ((y - self.origin_y) / self.cell_size).floor() as i32,
        );
        self.contains(pos).then_some(pos)
    }

    pub fn cell_center(&self, pos: PixelPos) -> (f64, f64) {
        (
            self.origin_x + (pos.x as f64 + 0.5) * self.cell_size,
            self.origin_y + (pos.y as f64 + 0.5) * self.cell_size,
        )
    }

    pub fn get(&self, pos: PixelPos) -> Option<&T> {
        self.linear_index(pos).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, pos: PixelPos) -> Option<&mut T> {
        self.linear_index(pos).map(move |i| &mut self.data[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (PixelPos, &T)> {
        let size_x = self.size_x;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (PixelPos::new(i as i32 % size_x, i as i32 / size_x), v))
    }

    pub fn values(&self) -> &[T] {
        &self.data
    }
}

impl<T> std::ops::Index<PixelPos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: PixelPos) -> &T {
        let i = self
            .linear_index(pos)
            .unwrap_or_else(|| panic!("pixel {pos:?} outside grid"));
        &self.data[i]
    }
}

impl<T> std::ops::IndexMut<PixelPos> for Grid<T> {
    fn index_mut(&mut self, pos: PixelPos) -> &mut T {
        let i = self
            .linear_index(pos)
            .unwrap_or_else(|| panic!("pixel {pos:?} outside grid"));
        &mut self.data[i]
    }
}
