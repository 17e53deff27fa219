//! Stand-scoped snapshots: the trees and saplings on one stand's pixels.
//!
//! Many stands share one database; each save replaces only the rows of its
//! own stand id. Loads leave everything outside the stand untouched.

use crate::{
    config::ModelSettings,
    error::SnapshotResult,
    landscape::Landscape,
    report::{LoadReport, SaveReport},
    sapling_codec::{capture_stand_saplings, restore_stand_saplings},
    stand::StandFootprint,
    store::SnapshotStore,
    tree_codec::{capture_stand_trees, restore_stand_trees},
    types::StandId,
};
use std::path::Path;

pub fn save_stand(
    landscape: &Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    path: &Path,
    settings: &ModelSettings,
) -> SnapshotResult<SaveReport> {
    let mut store = SnapshotStore::open_stand(path)?;

    let trees = capture_stand_trees(landscape, footprint, stand_id);
    let saplings = if settings.regeneration_enabled {
        capture_stand_saplings(landscape, footprint, stand_id)
    } else {
        Vec::new()
    };

    let writer = store.writer()?;
    let replaced = writer.replace_stand_trees(stand_id, &trees)?;
    if settings.regeneration_enabled {
        writer.replace_stand_saplings(stand_id, &saplings)?;
    } else {
        let stale = writer.stand_sapling_rows(stand_id)?;
        if stale > 0 {
            log::warn!(
                "snapshot: regeneration is disabled; {stale} older sapling rows of stand {stand_id} \
                 are kept and will reload next to the new trees"
            );
        }
    }
    writer.commit()?;

    log::info!(
        "snapshot: saved stand {stand_id} to {} ({} trees replacing {replaced}, {} saplings)",
        path.display(),
        trees.len(),
        saplings.len()
    );
    Ok(SaveReport { trees: trees.len(), saplings: saplings.len(), ..SaveReport::default() })
}

/// Replace the trees and saplings on the stand's pixels with the stored
/// ones. Statistics are rebuilt for the resource units the stand touches.
pub fn load_stand(
    landscape: &mut Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    path: &Path,
    settings: &ModelSettings,
) -> SnapshotResult<LoadReport> {
    let store = SnapshotStore::open_read_only(path)?;
    let trees = store.read_stand_trees(stand_id)?;
    let saplings = if settings.regeneration_enabled {
        store.read_stand_saplings(stand_id)?
    } else {
        Vec::new()
    };
    drop(store);

    let mut report = LoadReport::default();
    let mut touched = restore_stand_trees(landscape, footprint, stand_id, &trees, &mut report)?;
    if settings.regeneration_enabled {
        touched.extend(restore_stand_saplings(landscape, footprint, stand_id, &saplings, &mut report)?);
    }

    for slot in touched {
        landscape.recalculate_statistics_for(slot);
    }

    log::info!(
        "snapshot: loaded stand {stand_id} from {} ({} trees removed, {} loaded, {} skipped; \
         {} saplings removed, {} loaded, {} dropped)",
        path.display(),
        report.trees_removed,
        report.trees_loaded,
        report.trees_skipped,
        report.saplings_removed,
        report.saplings_loaded,
        report.saplings_dropped
    );
    Ok(report)
}
