//! Resource units: 100 m tiles owning trees and soil/deadwood pools.

use crate::{
    sapling::SaplingCell,
    snags::Snags,
    soil::{Soil, WaterCycle},
    tree::Tree,
    types::{PixelPos, LIGHT_CELLS_PER_RU},
};

/// Aggregate statistics cached per resource unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TreeStatistics {
    pub stems: usize,
    pub basal_area: f64,
    pub leaf_area: f64,
    pub mean_dbh: f64,
    pub mean_height: f64,
    pub stem_mass: f64,
    pub saplings: usize,
}

#[derive(Debug, Clone)]
pub struct ResourceUnit {
    /// Resource-unit grid index. Stable within a run only; negative means
    /// the unit takes no part in index remapping.
    pub index: i32,
    /// Cell on the resource-unit grid.
    pub cell: PixelPos,
    /// Light pixel of the south-west corner; always a multiple of `LIGHT_CELLS_PER_RU`.
    pub light_offset: PixelPos,
    pub trees: Vec<Tree>,
    pub soil: Option<Soil>,
    pub snags: Option<Snags>,
    pub water: WaterCycle,
    pub statistics: TreeStatistics,
}

impl ResourceUnit {
    pub fn new(index: i32, cell: PixelPos) -> Self {
        Self {
            index,
            cell,
            light_offset: PixelPos::new(cell.x * LIGHT_CELLS_PER_RU, cell.y * LIGHT_CELLS_PER_RU),
            trees: Vec::new(),
            soil: None,
            snags: None,
            water: WaterCycle::default(),
            statistics: TreeStatistics::default(),
        }
    }

    /// Rebuild `statistics` from the current tree list and the sapling cells
    /// that fall into this unit.
    pub fn recalculate_statistics<'a>(&mut self, sapling_cells: impl Iterator<Item = &'a SaplingCell>) {
        let mut stats = TreeStatistics::default();
        for tree in &self.trees {
            stats.stems += 1;
            stats.basal_area += tree.basal_area();
            stats.leaf_area += f64::from(tree.leaf_area);
            stats.mean_dbh += f64::from(tree.dbh);
            stats.mean_height += f64::from(tree.height);
            stats.stem_mass += f64::from(tree.stem_mass);
        }
        if stats.stems > 0 {
            stats.mean_dbh /= stats.stems as f64;
            stats.mean_height /= stats.stems as f64;
        }
        stats.saplings = sapling_cells.map(SaplingCell::occupied_count).sum();
        self.statistics = stats;
    }
}
