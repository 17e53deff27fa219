//! Sapling cohorts <-> `saplings` / `saplings_stand` records.
//!
//! Saplings are stored with the species index, not the species code, so a
//! snapshot only reloads into a model with the same species ordering.
//! Loading never grows a cell: records that find no free slot are dropped.

use crate::{
    config::ModelSettings,
    error::{SnapshotError, SnapshotResult},
    landscape::Landscape,
    remap::ResourceUnitRemap,
    report::LoadReport,
    sapling::{SaplingCell, SaplingTree},
    stand::StandFootprint,
    types::{PixelPos, StandId},
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaplingValues {
    pub species_index: i16,
    pub age: u16,
    pub height: f32,
    pub stress_years: u8,
    pub flags: u8,
}

impl SaplingValues {
    pub fn of(sapling: &SaplingTree) -> Self {
        Self {
            species_index: sapling.species_index,
            age: sapling.age,
            height: sapling.height,
            stress_years: sapling.stress_years,
            flags: sapling.flags,
        }
    }

    /// Place into the first free slot of `cell`; false when the cell is full.
    fn place(&self, cell: &mut SaplingCell) -> bool {
        match cell.add_if_slot_free(self.height, self.age, self.species_index) {
            Some(sapling) => {
                sapling.stress_years = self.stress_years;
                sapling.flags = self.flags;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaplingRecord {
    pub ru_index: i32,
    pub x: i32,
    pub y: i32,
    pub values: SaplingValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandSaplingRecord {
    pub stand_id: StandId,
    /// Real-world coordinate of the cell centre.
    pub x: f64,
    pub y: f64,
    pub values: SaplingValues,
}

fn check_species(landscape: &Landscape, species_index: i16) -> SnapshotResult<()> {
    let known = usize::try_from(species_index).is_ok_and(|i| landscape.species.get(i).is_some());
    if known {
        Ok(())
    } else {
        Err(SnapshotError::UnknownSpecies { species: format!("index {species_index}") })
    }
}

pub fn capture_saplings(landscape: &Landscape) -> Vec<SaplingRecord> {
    let mut records = Vec::new();
    for (slot, ru) in landscape.resource_units.iter().enumerate() {
        for (pixel, cell) in landscape.sapling_cells_of(slot) {
            for sapling in cell.occupied() {
                records.push(SaplingRecord {
                    ru_index: ru.index,
                    x: pixel.x,
                    y: pixel.y,
                    values: SaplingValues::of(sapling),
                });
            }
        }
    }
    records
}

/// Add stored saplings on top of whatever the cells already hold.
pub fn restore_saplings(
    landscape: &mut Landscape,
    records: &[SaplingRecord],
    remap: &ResourceUnitRemap,
    settings: &ModelSettings,
    report: &mut LoadReport,
) -> SnapshotResult<()> {
    let slots: Vec<Option<usize>> = records.iter().map(|r| remap.resolve(r.ru_index)).collect();
    for (record, slot) in records.iter().zip(&slots) {
        if slot.is_some() {
            check_species(landscape, record.values.species_index)?;
        }
    }

    for (record, slot) in records.iter().zip(slots) {
        let Some(slot) = slot else {
            report.saplings_skipped += 1;
            continue;
        };
        let offset = landscape.resource_units[slot].light_offset;
        let pixel = PixelPos::new(record.x, record.y).fold_into(offset);
        let Some(cell) = landscape.sapling_cell_mut(pixel) else {
            report.saplings_skipped += 1;
            continue;
        };
        if record.values.place(cell) {
            report.saplings_loaded += 1;
        } else {
            report.saplings_dropped += 1;
        }

        let seen = report.saplings_loaded + report.saplings_dropped;
        if settings.progress_interval > 0 && seen % settings.progress_interval == 0 {
            log::debug!("snapshot: {seen} saplings processed...");
        }
    }

    log::debug!(
        "snapshot: loaded {} saplings, {} dropped on full cells, {} without a target",
        report.saplings_loaded,
        report.saplings_dropped,
        report.saplings_skipped
    );
    Ok(())
}

pub fn capture_stand_saplings(
    landscape: &Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
) -> Vec<StandSaplingRecord> {
    let mut records = Vec::new();
    for pixel in footprint.pixels(stand_id) {
        let Some(cell) = landscape.sapling_cell(pixel) else {
            continue;
        };
        let (mx, my) = landscape.pixel_center(pixel);
        let (x, y) = landscape.gis.model_to_gis(mx, my);
        for sapling in cell.occupied() {
            records.push(StandSaplingRecord { stand_id, x, y, values: SaplingValues::of(sapling) });
        }
    }
    records
}

/// Light pixel of a stored stand sapling, if it falls inside the extent and
/// on the stand.
fn stand_pixel(
    landscape: &Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    x: f64,
    y: f64,
) -> Option<PixelPos> {
    let (mx, my) = landscape.gis.gis_to_model(x, y);
    if !landscape.extent().contains(mx, my) {
        return None;
    }
    landscape.pixel_at(mx, my).filter(|p| footprint.contains(stand_id, *p))
}

/// Clear every sapling cell of the stand, then place the stored saplings
/// that fall on the stand. Returns the resource-unit slots touched.
pub fn restore_stand_saplings(
    landscape: &mut Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    records: &[StandSaplingRecord],
    report: &mut LoadReport,
) -> SnapshotResult<BTreeSet<usize>> {
    let targets: Vec<Option<PixelPos>> = records
        .iter()
        .map(|r| stand_pixel(landscape, footprint, stand_id, r.x, r.y))
        .collect();
    for (record, target) in records.iter().zip(&targets) {
        if target.is_some() {
            check_species(landscape, record.values.species_index)?;
        }
    }

    let mut touched = BTreeSet::new();
    for pixel in footprint.pixels(stand_id) {
        if let Some(cell) = landscape.sapling_cell_mut(pixel) {
            report.saplings_removed += cell.clear();
        }
        if let Some(slot) = landscape.resource_unit_at_pixel(pixel) {
            touched.insert(slot);
        }
    }

    for (record, target) in records.iter().zip(targets) {
        let Some(pixel) = target else {
            report.saplings_skipped += 1;
            continue;
        };
        let Some(cell) = landscape.sapling_cell_mut(pixel) else {
            report.saplings_skipped += 1;
            continue;
        };
        if record.values.place(cell) {
            report.saplings_loaded += 1;
        } else {
            report.saplings_dropped += 1;
        }
    }
    Ok(touched)
}
