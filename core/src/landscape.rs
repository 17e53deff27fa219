//! The live landscape: resource units, the light grid and the sapling layer.
//!
//! Model coordinates start at (0, 0) in the south-west corner of the
//! resource-unit grid. The light grid and the sapling grid share the same
//! 2 m pixel addressing, so a `PixelPos` is valid for both.

use crate::{
    config::{LandscapeConfig, SnapshotConfig},
    grid::Grid,
    resource_unit::ResourceUnit,
    sapling::SaplingCell,
    snags::Snags,
    soil::Soil,
    species::SpeciesSet,
    types::{GisTransform, PixelPos, Rect, LIGHT_CELLS_PER_RU, LIGHT_CELL_SIZE, RU_SIZE},
};

pub struct Landscape {
    pub species: SpeciesSet,
    pub gis: GisTransform,
    pub resource_units: Vec<ResourceUnit>,
    /// Resource-unit grid; cells hold the position in `resource_units`.
    ru_grid: Grid<Option<usize>>,
    pub light_grid: Grid<f32>,
    saplings: Grid<SaplingCell>,
}

impl Landscape {
    pub fn new(config: &LandscapeConfig, species: SpeciesSet) -> Self {
        let origin = (0.0, 0.0);
        let mut ru_grid = Grid::filled(config.ru_columns, config.ru_rows, RU_SIZE, origin, None);
        let light_x = config.ru_columns * LIGHT_CELLS_PER_RU;
        let light_y = config.ru_rows * LIGHT_CELLS_PER_RU;
        let mut saplings = Grid::filled(light_x, light_y, LIGHT_CELL_SIZE, origin, SaplingCell::default());

        let mut resource_units = Vec::new();
        for y in 0..config.ru_rows {
            for x in 0..config.ru_columns {
                if config.inactive_cells.contains(&[x, y]) {
                    continue;
                }
                let cell = PixelPos::new(x, y);
                let index = ru_grid.linear_index(cell).map_or(-1, |i| i as i32);
                let mut ru = ResourceUnit::new(index, cell);
                if config.soil_enabled {
                    ru.soil = Some(Soil::new(config.soil_kyl, config.soil_kyr));
                }
                if config.snags_enabled {
                    ru.snags = Some(Snags::new(config.snag_climate_factor));
                }
                for py in 0..LIGHT_CELLS_PER_RU {
                    for px in 0..LIGHT_CELLS_PER_RU {
                        let pixel = PixelPos::new(ru.light_offset.x + px, ru.light_offset.y + py);
                        if let Some(sc) = saplings.get_mut(pixel) {
                            sc.on_landscape = true;
                        }
                    }
                }
                ru_grid[cell] = Some(resource_units.len());
                resource_units.push(ru);
            }
        }

        Self {
            species,
            gis: GisTransform::new(config.gis_origin_x, config.gis_origin_y),
            resource_units,
            ru_grid,
            light_grid: Grid::filled(light_x, light_y, LIGHT_CELL_SIZE, origin, 1.0),
            saplings,
        }
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(&config.landscape, SpeciesSet::new(config.species.clone()))
    }

    /// Model-coordinate extent of the simulated area.
    pub fn extent(&self) -> Rect {
        self.light_grid.extent()
    }

    pub fn ru_grid(&self) -> &Grid<Option<usize>> {
        &self.ru_grid
    }

    /// Position in `resource_units` of the unit with grid index `index`.
    pub fn slot_of_index(&self, index: i32) -> Option<usize> {
        if index < 0 || index as usize >= self.ru_grid.len() {
            return None;
        }
        let cell = self.ru_grid.position_of(index as usize);
        self.ru_grid.get(cell).copied().flatten()
    }

    pub fn resource_unit_at_pixel(&self, pixel: PixelPos) -> Option<usize> {
        let cell = PixelPos::new(
            pixel.x.div_euclid(LIGHT_CELLS_PER_RU),
            pixel.y.div_euclid(LIGHT_CELLS_PER_RU),
        );
        self.ru_grid.get(cell).copied().flatten()
    }

    /// Light pixel at a model coordinate.
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<PixelPos> {
        self.light_grid.pixel_at(x, y)
    }

    pub fn pixel_center(&self, pixel: PixelPos) -> (f64, f64) {
        self.light_grid.cell_center(pixel)
    }

    /// Sapling cell of a pixel; `None` off the grid or outside active units.
    pub fn sapling_cell(&self, pixel: PixelPos) -> Option<&SaplingCell> {
        self.saplings.get(pixel).filter(|c| c.on_landscape)
    }

    pub fn sapling_cell_mut(&mut self, pixel: PixelPos) -> Option<&mut SaplingCell> {
        self.saplings.get_mut(pixel).filter(|c| c.on_landscape)
    }

    /// Sapling cells belonging to a resource unit, row by row.
    pub fn sapling_cells_of(&self, slot: usize) -> impl Iterator<Item = (PixelPos, &SaplingCell)> {
        ru_sapling_cells(&self.saplings, self.resource_units[slot].light_offset)
    }

    pub fn tree_count(&self) -> usize {
        self.resource_units.iter().map(|ru| ru.trees.len()).sum()
    }

    pub fn sapling_count(&self) -> usize {
        self.saplings.values().iter().map(SaplingCell::occupied_count).sum()
    }

    /// Stamp every tree's shading onto the light grid, then read back each
    /// tree's light resource index as the mean light over its stamp.
    pub fn apply_and_read_light_pattern(&mut self) {
        self.light_grid.fill(1.0);

        for ru in &self.resource_units {
            for tree in &ru.trees {
                let Some(species) = self.species.get(tree.species) else {
                    continue;
                };
                let radius = tree.stamp.map_or(0, |s| s.radius);
                let shade = (species.shading * f64::from(tree.opacity)) as f32;
                for (pixel, weight) in stamp_footprint(tree.pixel, radius) {
                    if let Some(v) = self.light_grid.get_mut(pixel) {
                        *v *= 1.0 - shade * weight;
                    }
                }
            }
        }

        for ru in &mut self.resource_units {
            for tree in &mut ru.trees {
                let radius = tree.stamp.map_or(0, |s| s.radius);
                let (sum, n) = stamp_footprint(tree.pixel, radius)
                    .filter_map(|(pixel, _)| self.light_grid.get(pixel))
                    .fold((0.0f32, 0u32), |(s, n), v| (s + v, n + 1));
                tree.light_resource_index = if n > 0 { sum / n as f32 } else { 1.0 };
            }
        }
    }

    pub fn recalculate_statistics(&mut self) {
        let saplings = &self.saplings;
        for ru in &mut self.resource_units {
            let cells = ru_sapling_cells(saplings, ru.light_offset).map(|(_, c)| c);
            ru.recalculate_statistics(cells);
        }
    }

    pub fn recalculate_statistics_for(&mut self, slot: usize) {
        let saplings = &self.saplings;
        let ru = &mut self.resource_units[slot];
        let cells = ru_sapling_cells(saplings, ru.light_offset).map(|(_, c)| c);
        ru.recalculate_statistics(cells);
    }
}

fn ru_sapling_cells(
    grid: &Grid<SaplingCell>,
    offset: PixelPos,
) -> impl Iterator<Item = (PixelPos, &SaplingCell)> {
    (0..LIGHT_CELLS_PER_RU).flat_map(move |dy| {
        (0..LIGHT_CELLS_PER_RU).filter_map(move |dx| {
            let pixel = PixelPos::new(offset.x + dx, offset.y + dy);
            grid.get(pixel).map(|c| (pixel, c))
        })
    })
}

/// Pixels within `radius` of `center`, with a linear distance falloff weight.
fn stamp_footprint(center: PixelPos, radius: i32) -> impl Iterator<Item = (PixelPos, f32)> {
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius).filter_map(move |dx| {
            let d = ((dx * dx + dy * dy) as f32).sqrt();
            (d <= radius as f32 + 0.5).then(|| {
                let weight = 1.0 - d / (radius as f32 + 1.0);
                (PixelPos::new(center.x + dx, center.y + dy), weight)
            })
        })
    })
}
