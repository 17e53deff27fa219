//! Fatal and non-fatal load failures.

use forest_snapshot_core::{
    config::SnapshotConfig,
    error::SnapshotError,
    landscape::Landscape,
    snapshot,
    tree::Tree,
    types::PixelPos,
};

fn landscape_with_larch(config: &SnapshotConfig) -> Landscape {
    let mut landscape = Landscape::from_config(config);
    let lade = landscape.species.index_of("lade").expect("lade in test catalog");
    let mut tree = Tree::new(5, lade, PixelPos::new(20, 20));
    tree.dbh = 25.0;
    tree.height = 19.0;
    landscape.resource_units[0].trees.push(tree);
    landscape
}

#[test]
fn unknown_species_aborts_the_load() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("species.db");
    let config = SnapshotConfig::default_test();
    snapshot::save(&landscape_with_larch(&config), &db, &config.settings).expect("save");

    let mut reduced = config.clone();
    reduced.species.retain(|s| s.id != "lade");
    let mut live = Landscape::from_config(&reduced);
    live.resource_units[1].trees.push(Tree::new(1, 0, PixelPos::new(70, 10)));

    let err = snapshot::load(&mut live, &db, &reduced.settings).expect_err("unknown species");
    assert!(
        matches!(err, SnapshotError::UnknownSpecies { ref species } if species == "lade"),
        "unexpected error: {err}"
    );
    assert_eq!(live.tree_count(), 1, "trees are only cleared after species resolve");
}

#[test]
fn missing_store_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("does_not_exist.db");
    let config = SnapshotConfig::default_test();
    let mut live = Landscape::from_config(&config);

    let err = snapshot::load(&mut live, &db, &config.settings).expect_err("missing store");
    assert!(matches!(err, SnapshotError::StoreUnavailable { .. }), "unexpected error: {err}");
    assert!(!db.exists(), "load must not create the store");
}

#[test]
fn soil_records_without_live_soil_are_a_configuration_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("soil.db");
    let config = SnapshotConfig::default_test();
    snapshot::save(&Landscape::from_config(&config), &db, &config.settings).expect("save");

    let mut no_soil = config.clone();
    no_soil.landscape.soil_enabled = false;
    let mut live = Landscape::from_config(&no_soil);

    let err = snapshot::load(&mut live, &db, &no_soil.settings).expect_err("mismatch");
    assert!(
        matches!(err, SnapshotError::ConfigurationMismatch { module: "soil", .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn snag_records_without_live_snags_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("snags.db");
    let config = SnapshotConfig::default_test();
    snapshot::save(&landscape_with_larch(&config), &db, &config.settings).expect("save");

    let mut no_snags = config.clone();
    no_snags.landscape.snags_enabled = false;
    let mut live = Landscape::from_config(&no_snags);

    let report = snapshot::load(&mut live, &db, &no_snags.settings).expect("load");
    assert_eq!(report.snags_loaded, 0);
    assert_eq!(report.snags_skipped, 2);
    assert_eq!(report.trees_loaded, 1);
}

#[test]
fn soil_disabled_on_both_sides_loads_cleanly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nosoil.db");
    let mut config = SnapshotConfig::default_test();
    config.landscape.soil_enabled = false;
    let saved = snapshot::save(&landscape_with_larch(&config), &db, &config.settings).expect("save");
    assert_eq!(saved.soil, 0);

    let mut live = Landscape::from_config(&config);
    let report = snapshot::load(&mut live, &db, &config.settings).expect("load");
    assert_eq!(report.soil_loaded, 0);
    assert_eq!(report.trees_loaded, 1);
}

#[test]
fn save_into_unwritable_location_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("no_such_dir").join("snap.db");
    let config = SnapshotConfig::default_test();

    let err = snapshot::save(&Landscape::from_config(&config), &db, &config.settings).expect_err("no directory");
    assert!(matches!(err, SnapshotError::StoreUnavailable { .. }), "unexpected error: {err}");
}
