//! Full-landscape snapshots: every tree, soil and snag pool, and (with
//! regeneration enabled) every sapling, saved to or loaded from one SQLite
//! file plus a companion resource-unit index raster.
//!
//! Saves are atomic on the store side. Loads mutate the live landscape
//! incrementally; after a failed load the landscape must be discarded.

use crate::{
    config::ModelSettings,
    error::SnapshotResult,
    landscape::Landscape,
    raster::AsciiRaster,
    remap::ResourceUnitRemap,
    report::{LoadReport, SaveReport},
    sapling_codec::{capture_saplings, restore_saplings},
    snag_codec::{capture_snags, restore_snags},
    soil_codec::{capture_soil, restore_soil},
    store::SnapshotStore,
    tree_codec::{capture_trees, restore_trees},
};
use std::path::{Path, PathBuf};

/// Path of the resource-unit index raster written next to `db_path`.
pub fn index_raster_path(db_path: &Path) -> PathBuf {
    db_path.with_extension("asc")
}

/// Resource-unit indices in real-world coordinates, -1 where no unit is active.
pub fn index_raster(landscape: &Landscape) -> AsciiRaster {
    AsciiRaster::from_grid(landscape.ru_grid(), &landscape.gis, |slot| {
        slot.map_or(-1.0, |s| f64::from(landscape.resource_units[s].index))
    })
}

pub fn save(landscape: &Landscape, path: &Path, settings: &ModelSettings) -> SnapshotResult<SaveReport> {
    let mut store = SnapshotStore::create(path)?;

    let trees = capture_trees(landscape);
    let soil = capture_soil(landscape);
    let snags = capture_snags(landscape);
    let saplings = if settings.regeneration_enabled {
        capture_saplings(landscape)
    } else {
        Vec::new()
    };

    let writer = store.writer()?;
    writer.reset_landscape_tables()?;
    writer.insert_trees(&trees)?;
    log::debug!("snapshot: saved {} trees", trees.len());
    writer.insert_soil(&soil)?;
    writer.insert_snags(&snags)?;
    if settings.regeneration_enabled {
        writer.insert_saplings(&saplings)?;
        log::debug!("snapshot: saved {} saplings", saplings.len());
    }
    writer.commit()?;

    let raster_path = index_raster_path(path);
    index_raster(landscape).write(&raster_path)?;
    log::debug!("snapshot: wrote resource unit index grid {}", raster_path.display());

    let report = SaveReport {
        trees: trees.len(),
        soil: soil.len(),
        snags: snags.len(),
        saplings: saplings.len(),
    };
    log::info!(
        "snapshot: saved {} ({} trees, {} soil, {} snag, {} sapling records)",
        path.display(),
        report.trees,
        report.soil,
        report.snags,
        report.saplings
    );
    Ok(report)
}

/// Replace the landscape's state with the snapshot at `path`, then rebuild
/// the light field and per-unit statistics.
pub fn load(landscape: &mut Landscape, path: &Path, settings: &ModelSettings) -> SnapshotResult<LoadReport> {
    let store = SnapshotStore::open_read_only(path)?;
    let remap = ResourceUnitRemap::build(landscape, &index_raster_path(path), path)?;
    let mut report = LoadReport { remapped: !remap.is_identity(), ..LoadReport::default() };

    let trees = store.read_trees()?;
    let soil = store.read_soil()?;
    let snags = store.read_snags()?;

    restore_trees(landscape, &trees, &remap, settings, &mut report)?;
    restore_soil(landscape, &soil, &remap, &mut report)?;
    restore_snags(landscape, &snags, &remap, &mut report)?;

    if settings.regeneration_enabled {
        let saplings = store.read_saplings()?;
        restore_saplings(landscape, &saplings, &remap, settings, &mut report)?;
    } else {
        log::debug!("snapshot: regeneration disabled, saplings not loaded");
    }
    drop(store);

    landscape.apply_and_read_light_pattern();
    landscape.recalculate_statistics();

    log::info!(
        "snapshot: loaded {} ({} trees, {} skipped; {} soil; {} snag; {} saplings, {} dropped)",
        path.display(),
        report.trees_loaded,
        report.trees_skipped,
        report.soil_loaded,
        report.snags_loaded,
        report.saplings_loaded,
        report.saplings_dropped
    );
    Ok(report)
}
