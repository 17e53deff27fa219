//! Loading a snapshot into a landscape that is shifted against, or only
//! covers part of, the landscape that saved it.

use forest_snapshot_core::{
    config::SnapshotConfig,
    error::SnapshotError,
    landscape::Landscape,
    snapshot,
    tree::Tree,
    types::PixelPos,
};
use std::path::Path;

fn tree(id: i32, species: usize, pixel: PixelPos) -> Tree {
    let mut t = Tree::new(id, species, pixel);
    t.age = 35;
    t.dbh = 28.0;
    t.height = 21.0;
    t.opacity = 0.7;
    t.leaf_area = 40.0;
    t.stem_mass = 350.0;
    t
}

fn landscape_at(origin_x: f64, columns: i32) -> (SnapshotConfig, Landscape) {
    let mut config = SnapshotConfig::default_test();
    config.landscape.gis_origin_x = origin_x;
    config.landscape.ru_columns = columns;
    let landscape = Landscape::from_config(&config);
    (config, landscape)
}

/// Two units at real-world x 0..200; tree 100 in unit 0, tree 200 in unit 1.
/// One sapling per unit, at (12, 40) and (70, 10).
fn save_two_tree_snapshot(db: &Path) {
    let (config, mut landscape) = landscape_at(0.0, 2);
    landscape.resource_units[0].trees.push(tree(100, 0, PixelPos::new(10, 20)));
    landscape.resource_units[1].trees.push(tree(200, 1, PixelPos::new(60, 30)));
    for (pixel, age, species) in [(PixelPos::new(12, 40), 3u16, 0i16), (PixelPos::new(70, 10), 6, 1)] {
        let cell = landscape.sapling_cell_mut(pixel).expect("cell");
        cell.add_if_slot_free(0.9, age, species).expect("slot");
    }
    if let Some(soil) = landscape.resource_units[0].soil.as_mut() {
        let mut state = soil.state();
        state.organic_matter.c = 77_000.0;
        soil.restore(&state);
    }
    snapshot::save(&landscape, db, &config.settings).expect("save");
}

#[test]
fn one_tile_shift_moves_tree_into_the_overlapping_unit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("shift.db");
    save_two_tree_snapshot(&db);

    // Live model origin sits one tile west: live unit 1 covers real-world
    // x 0..100, which was stored unit 0. Stored unit 1 (x 100..200) is gone.
    let (config, mut live) = landscape_at(-100.0, 2);
    let report = snapshot::load(&mut live, &db, &config.settings).expect("load");

    assert!(report.remapped);
    assert!(live.resource_units[0].trees.is_empty(), "live unit 0 has no stored counterpart");
    let moved = &live.resource_units[1].trees;
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, 100);
    // offset (50, 0) + (10, 20) mod 50
    assert_eq!(moved[0].pixel, PixelPos::new(60, 20));
    assert_eq!(report.trees_loaded, 1);
    assert_eq!(report.trees_skipped, 1, "tree 200 lies outside the live landscape");

    let soil = live.resource_units[1].soil.as_ref().expect("soil");
    assert_eq!(soil.state().organic_matter.c, 77_000.0);
    assert_eq!(report.soil_skipped, 1);

    // Sapling at stored (12, 40) folds onto live unit 1 like the tree.
    let cell = live.sapling_cell(PixelPos::new(62, 40)).expect("cell");
    assert_eq!(cell.occupied_count(), 1);
    let sapling = cell.occupied().next().expect("sapling");
    assert_eq!((sapling.age, sapling.species_index), (3, 0));
    assert_eq!(live.sapling_count(), 1, "nothing placed at the raw stored pixel");
    assert_eq!(report.saplings_loaded, 1);
    assert_eq!(report.saplings_skipped, 1, "the stored unit 1 sapling has no live unit");
}

#[test]
fn subset_landscape_keeps_only_covered_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("subset.db");
    save_two_tree_snapshot(&db);

    // A single unit at real-world x 100..200: only stored unit 1 survives.
    let (config, mut live) = landscape_at(100.0, 1);
    let report = snapshot::load(&mut live, &db, &config.settings).expect("load");

    let trees = &live.resource_units[0].trees;
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].id, 200);
    assert_eq!(trees[0].pixel, PixelPos::new(10, 30));
    assert_eq!(report.trees_skipped, 1);
    assert_eq!(report.snags_skipped, 1);
}

#[test]
fn misaligned_offset_fails_before_touching_the_landscape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("misaligned.db");
    save_two_tree_snapshot(&db);

    let (config, mut live) = landscape_at(-130.0, 2);
    live.resource_units[0].trees.push(tree(1, 2, PixelPos::new(5, 5)));

    let err = snapshot::load(&mut live, &db, &config.settings).expect_err("misaligned");
    assert!(
        matches!(err, SnapshotError::SpatialMisalignment { .. }),
        "unexpected error: {err}"
    );
    assert_eq!(live.tree_count(), 1, "landscape untouched");
    assert_eq!(live.resource_units[0].trees[0].id, 1);
}

#[test]
fn missing_index_grid_assumes_the_same_landscape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("identity.db");
    save_two_tree_snapshot(&db);
    std::fs::remove_file(snapshot::index_raster_path(&db)).expect("remove grid");

    // Without the grid even a shifted landscape gets identity placement.
    let (config, mut live) = landscape_at(-100.0, 2);
    let report = snapshot::load(&mut live, &db, &config.settings).expect("load");

    assert!(!report.remapped);
    assert_eq!(live.resource_units[0].trees[0].id, 100);
    assert_eq!(live.resource_units[1].trees[0].id, 200);
    assert_eq!(live.resource_units[1].trees[0].pixel, PixelPos::new(60, 30));
}

#[test]
fn unreadable_index_grid_assumes_the_same_landscape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("garbled.db");
    save_two_tree_snapshot(&db);
    std::fs::write(snapshot::index_raster_path(&db), "not a raster\n").expect("overwrite grid");

    let (config, mut live) = landscape_at(0.0, 2);
    let report = snapshot::load(&mut live, &db, &config.settings).expect("load");

    assert!(!report.remapped);
    assert_eq!(report.trees_loaded, 2);
}

#[test]
fn species_outside_the_subset_do_not_abort_the_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("subset_species.db");
    let (config, mut saved) = landscape_at(0.0, 2);
    let lade = saved.species.index_of("lade").expect("lade");
    saved.resource_units[0].trees.push(tree(100, 0, PixelPos::new(10, 20)));
    saved.resource_units[1].trees.push(tree(200, lade, PixelPos::new(60, 30)));
    let cell = saved.sapling_cell_mut(PixelPos::new(70, 10)).expect("cell");
    cell.add_if_slot_free(0.5, 2, lade as i16).expect("slot");
    snapshot::save(&saved, &db, &config.settings).expect("save");

    // Only stored unit 0 is covered, and the catalog no longer knows larch.
    let (mut reduced, _) = landscape_at(0.0, 1);
    reduced.species.retain(|s| s.id != "lade");
    let mut live = Landscape::from_config(&reduced);
    let report = snapshot::load(&mut live, &db, &reduced.settings).expect("load");

    assert_eq!(live.tree_count(), 1);
    assert_eq!(live.resource_units[0].trees[0].id, 100);
    assert_eq!((report.trees_loaded, report.trees_skipped), (1, 1));
    assert_eq!(report.saplings_skipped, 1);
    assert_eq!(live.sapling_count(), 0);
}
