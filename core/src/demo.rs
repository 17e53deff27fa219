//! Deterministic demo population for the command-line tool and tests.

use crate::{
    landscape::Landscape,
    rng::{RngBank, StreamSlot},
    sapling::{FLAG_BROWSED, FLAG_SPROUT},
    soil::{DecomposingPool, SoilState},
    stand::StandGrid,
    tree::Tree,
    types::{CNPair, PixelPos, LIGHT_CELLS_PER_RU},
};

#[derive(Debug, Clone, Copy)]
pub struct DemoDensity {
    pub trees_per_unit: usize,
    /// Share of a unit's pixels that receive saplings.
    pub sapling_cover: f64,
}

impl Default for DemoDensity {
    fn default() -> Self {
        Self { trees_per_unit: 40, sapling_cover: 0.05 }
    }
}

/// Fill every resource unit with trees, soil and snag state and the
/// sapling layer with a few cohorts, then rebuild derived state.
pub fn populate(landscape: &mut Landscape, seed: u64, density: DemoDensity) {
    let bank = RngBank::new(seed);
    let mut rng = bank.stream(StreamSlot::Trees);
    let n_species = landscape.species.len() as u32;
    let mut next_id = 1;

    for slot in 0..landscape.resource_units.len() {
        let offset = landscape.resource_units[slot].light_offset;
        for _ in 0..density.trees_per_unit {
            let pixel = PixelPos::new(
                offset.x + rng.below(LIGHT_CELLS_PER_RU as u32) as i32,
                offset.y + rng.below(LIGHT_CELLS_PER_RU as u32) as i32,
            );
            let species = rng.below(n_species) as usize;
            let mut tree = Tree::new(next_id, species, pixel);
            next_id += 1;

            let dbh = rng.range_f64(5.0, 60.0);
            tree.dbh = dbh as f32;
            tree.height = (1.3 + dbh * rng.range_f64(0.6, 1.1)) as f32;
            tree.age = (dbh * rng.range_f64(1.5, 3.0)) as i32;
            tree.leaf_area = (dbh * 1.6) as f32;
            tree.opacity = rng.range_f64(0.4, 0.95) as f32;
            tree.foliage_mass = (dbh * 0.4) as f32;
            tree.stem_mass = (0.1 * dbh.powf(2.4)) as f32;
            tree.fine_root_mass = (dbh * 0.3) as f32;
            tree.coarse_root_mass = (0.02 * dbh.powf(2.4)) as f32;
            tree.npp_reserve = (tree.foliage_mass * 2.0).max(0.5);
            tree.stress_index = rng.range_f64(0.0, 0.3) as f32;
            tree.stamp = landscape.species.get(species).map(|s| s.stamp(tree.dbh, tree.height));
            landscape.resource_units[slot].trees.push(tree);
        }
    }

    let mut soil_rng = bank.stream(StreamSlot::Soil);
    let mut snag_rng = bank.stream(StreamSlot::Snags);
    for ru in &mut landscape.resource_units {
        if let Some(soil) = ru.soil.as_mut() {
            let mut state: SoilState = soil.state();
            let pool = |rng: &mut crate::rng::StreamRng, c: f64, k: f64| {
                let c = rng.range_f64(0.5, 1.5) * c;
                DecomposingPool::new(c, c / rng.range_f64(20.0, 60.0), k * rng.range_f64(0.9, 1.1))
            };
            state.input_labile = pool(&mut soil_rng, 300.0, state.kyl);
            state.input_refractory = pool(&mut soil_rng, 900.0, state.kyr);
            state.young_labile = pool(&mut soil_rng, 3000.0, state.kyl);
            state.young_refractory = pool(&mut soil_rng, 12_000.0, state.kyr);
            let som = soil_rng.range_f64(60_000.0, 140_000.0);
            state.organic_matter = CNPair::new(som, som / 12.0);
            soil.restore(&state);
            ru.water.set_content(soil_rng.range_f64(40.0, 250.0), soil_rng.range_f64(0.0, 30.0));
        }

        if let Some(snags) = ru.snags.as_mut() {
            let mut state = snags.state();
            let mut total = CNPair::default();
            for (i, class) in state.classes.iter_mut().enumerate() {
                let scale = (i + 1) as f64;
                class.count = snag_rng.below(10) as f64;
                class.pool = CNPair::new(class.count * 50.0 * scale, class.count * 0.15 * scale);
                class.mean_dbh = 10.0 * scale + snag_rng.range_f64(0.0, 5.0);
                class.mean_height = class.mean_dbh * 0.9;
                class.mean_volume = 0.0005 * class.mean_dbh.powf(2.5);
                class.time_since_death = snag_rng.range_f64(0.0, 15.0);
                class.decay_rate = snag_rng.range_f64(0.02, 0.08);
                class.half_life = 0.693 / class.decay_rate;
                total += class.pool;
            }
            state.total_standing = total;
            for year in 0..state.branches.slots.len() {
                state.branches.add(CNPair::new(snag_rng.range_f64(10.0, 80.0), snag_rng.range_f64(0.05, 0.4)));
                if year + 1 < state.branches.slots.len() {
                    state.branches.advance();
                }
            }
            snags.restore(&state);
        }
    }

    let mut sap_rng = bank.stream(StreamSlot::Saplings);
    let offsets: Vec<PixelPos> = landscape.resource_units.iter().map(|ru| ru.light_offset).collect();
    for offset in offsets {
        for dy in 0..LIGHT_CELLS_PER_RU {
            for dx in 0..LIGHT_CELLS_PER_RU {
                if !sap_rng.chance(density.sapling_cover) {
                    continue;
                }
                let cohorts = 1 + sap_rng.below(3);
                let species = sap_rng.below(n_species) as i16;
                let Some(cell) = landscape.sapling_cell_mut(PixelPos::new(offset.x + dx, offset.y + dy)) else {
                    continue;
                };
                for _ in 0..cohorts {
                    let height = sap_rng.range_f64(0.05, 4.0) as f32;
                    let age = 1 + sap_rng.below(12) as u16;
                    if let Some(s) = cell.add_if_slot_free(height, age, species) {
                        s.stress_years = sap_rng.below(4) as u8;
                        if sap_rng.chance(0.1) {
                            s.flags |= FLAG_SPROUT;
                        }
                        if sap_rng.chance(0.2) {
                            s.flags |= FLAG_BROWSED;
                        }
                    }
                }
            }
        }
    }

    landscape.apply_and_read_light_pattern();
    landscape.recalculate_statistics();
    log::debug!(
        "demo: populated {} resource units with {} trees and {} saplings",
        landscape.resource_units.len(),
        landscape.tree_count(),
        landscape.sapling_count()
    );
}

/// One stand per active resource unit; stand id = resource-unit index + 1.
pub fn unit_stands(landscape: &Landscape) -> StandGrid {
    let grid = &landscape.light_grid;
    let mut stands = StandGrid::new(grid.size_x(), grid.size_y());
    for ru in &landscape.resource_units {
        let to = PixelPos::new(ru.light_offset.x + LIGHT_CELLS_PER_RU, ru.light_offset.y + LIGHT_CELLS_PER_RU);
        stands.fill_rect(ru.light_offset, to, ru.index + 1);
    }
    stands
}
