//! Trees <-> `trees` / `trees_stand` records.
//!
//! Full-landscape records carry the resource-unit index and the absolute
//! light pixel; on load the pixel is folded into whichever live unit the
//! stored index maps to. Stand records carry the real-world coordinate of
//! the pixel centre instead.

use crate::{
    config::ModelSettings,
    error::{SnapshotError, SnapshotResult},
    landscape::Landscape,
    remap::ResourceUnitRemap,
    report::LoadReport,
    stand::StandFootprint,
    tree::Tree,
    types::{PixelPos, StandId},
};
use std::collections::BTreeSet;

/// Scalar tree state shared by both record layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeValues {
    pub age: i32,
    pub height: f32,
    pub dbh: f32,
    pub leaf_area: f32,
    pub opacity: f32,
    pub foliage_mass: f32,
    pub stem_mass: f32,
    pub fine_root_mass: f32,
    pub coarse_root_mass: f32,
    pub npp_reserve: f32,
    pub stress_index: f32,
}

impl TreeValues {
    pub fn of(tree: &Tree) -> Self {
        Self {
            age: tree.age,
            height: tree.height,
            dbh: tree.dbh,
            leaf_area: tree.leaf_area,
            opacity: tree.opacity,
            foliage_mass: tree.foliage_mass,
            stem_mass: tree.stem_mass,
            fine_root_mass: tree.fine_root_mass,
            coarse_root_mass: tree.coarse_root_mass,
            npp_reserve: tree.npp_reserve,
            stress_index: tree.stress_index,
        }
    }

    fn apply(&self, tree: &mut Tree) {
        tree.age = self.age;
        tree.height = self.height;
        tree.dbh = self.dbh;
        tree.leaf_area = self.leaf_area;
        tree.opacity = self.opacity;
        tree.foliage_mass = self.foliage_mass;
        tree.stem_mass = self.stem_mass;
        tree.fine_root_mass = self.fine_root_mass;
        tree.coarse_root_mass = self.coarse_root_mass;
        tree.npp_reserve = self.npp_reserve;
        tree.stress_index = self.stress_index;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRecord {
    pub id: i32,
    pub ru_index: i32,
    pub x: i32,
    pub y: i32,
    pub species: String,
    pub values: TreeValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandTreeRecord {
    pub stand_id: StandId,
    pub id: i32,
    /// Real-world coordinate of the pixel centre.
    pub x: f64,
    pub y: f64,
    pub species: String,
    pub values: TreeValues,
}

fn species_index(landscape: &Landscape, id: &str) -> SnapshotResult<usize> {
    landscape
        .species
        .index_of(id)
        .ok_or_else(|| SnapshotError::UnknownSpecies { species: id.to_string() })
}

/// Build a tree from stored values; the stamp is rebuilt from dbh/height.
fn build_tree(landscape: &Landscape, id: i32, species: usize, pixel: PixelPos, values: &TreeValues) -> Tree {
    let mut tree = Tree::new(id, species, pixel);
    values.apply(&mut tree);
    tree.stamp = landscape.species.get(species).map(|s| s.stamp(tree.dbh, tree.height));
    tree
}

pub fn capture_trees(landscape: &Landscape) -> Vec<TreeRecord> {
    let mut records = Vec::with_capacity(landscape.tree_count());
    for ru in &landscape.resource_units {
        for tree in &ru.trees {
            records.push(TreeRecord {
                id: tree.id,
                ru_index: ru.index,
                x: tree.pixel.x,
                y: tree.pixel.y,
                species: species_id(landscape, tree.species),
                values: TreeValues::of(tree),
            });
        }
    }
    records
}

fn species_id(landscape: &Landscape, index: usize) -> String {
    landscape.species.get(index).map(|s| s.id.clone()).unwrap_or_default()
}

/// Clear every resource unit's tree list, then repopulate from `records`.
/// Records are resolved to a live resource unit and species up front, so an
/// unknown species on a live unit aborts before any tree is touched. Records
/// without a live unit are skipped whatever species they name.
pub fn restore_trees(
    landscape: &mut Landscape,
    records: &[TreeRecord],
    remap: &ResourceUnitRemap,
    settings: &ModelSettings,
    report: &mut LoadReport,
) -> SnapshotResult<()> {
    let targets: Vec<Option<(usize, usize)>> = records
        .iter()
        .map(|r| match remap.resolve(r.ru_index) {
            Some(slot) => species_index(landscape, &r.species).map(|species| Some((slot, species))),
            None => Ok(None),
        })
        .collect::<SnapshotResult<_>>()?;

    for ru in &mut landscape.resource_units {
        ru.trees.clear();
    }

    for (record, target) in records.iter().zip(targets) {
        let Some((slot, species)) = target else {
            report.trees_skipped += 1;
            continue;
        };
        let offset = landscape.resource_units[slot].light_offset;
        let pixel = PixelPos::new(record.x, record.y).fold_into(offset);
        let tree = build_tree(landscape, record.id, species, pixel, &record.values);
        landscape.resource_units[slot].trees.push(tree);

        report.trees_loaded += 1;
        if settings.progress_interval > 0 && report.trees_loaded % settings.progress_interval == 0 {
            log::debug!("snapshot: {} trees loaded...", report.trees_loaded);
        }
    }

    log::debug!(
        "snapshot: finished trees. N={} from trees in snapshot: {}",
        report.trees_loaded,
        records.len()
    );
    Ok(())
}

pub fn capture_stand_trees(
    landscape: &Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
) -> Vec<StandTreeRecord> {
    let mut records = Vec::new();
    for ru in &landscape.resource_units {
        for tree in ru.trees.iter().filter(|t| footprint.contains(stand_id, t.pixel)) {
            let (mx, my) = landscape.pixel_center(tree.pixel);
            let (x, y) = landscape.gis.model_to_gis(mx, my);
            records.push(StandTreeRecord {
                stand_id,
                id: tree.id,
                x,
                y,
                species: species_id(landscape, tree.species),
                values: TreeValues::of(tree),
            });
        }
    }
    records
}

/// Target pixel and resource-unit slot of a stored stand tree, if it falls
/// inside the extent and on the stand.
fn stand_target(
    landscape: &Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    x: f64,
    y: f64,
) -> Option<(PixelPos, usize)> {
    let (mx, my) = landscape.gis.gis_to_model(x, y);
    if !landscape.extent().contains(mx, my) {
        return None;
    }
    landscape
        .pixel_at(mx, my)
        .filter(|p| footprint.contains(stand_id, *p))
        .and_then(|p| landscape.resource_unit_at_pixel(p).map(|slot| (p, slot)))
}

/// Remove the live trees on the stand's pixels and insert the stored ones
/// that fall on those pixels. Returns the resource-unit slots touched.
pub fn restore_stand_trees(
    landscape: &mut Landscape,
    footprint: &impl StandFootprint,
    stand_id: StandId,
    records: &[StandTreeRecord],
    report: &mut LoadReport,
) -> SnapshotResult<BTreeSet<usize>> {
    let targets: Vec<Option<(PixelPos, usize, usize)>> = records
        .iter()
        .map(|r| match stand_target(landscape, footprint, stand_id, r.x, r.y) {
            Some((pixel, slot)) => species_index(landscape, &r.species).map(|species| Some((pixel, slot, species))),
            None => Ok(None),
        })
        .collect::<SnapshotResult<_>>()?;

    let mut touched = BTreeSet::new();
    for (slot, ru) in landscape.resource_units.iter_mut().enumerate() {
        let before = ru.trees.len();
        ru.trees.retain(|t| !footprint.contains(stand_id, t.pixel));
        let removed = before - ru.trees.len();
        if removed > 0 {
            report.trees_removed += removed;
            touched.insert(slot);
        }
    }

    for (record, target) in records.iter().zip(targets) {
        let Some((pixel, slot, species)) = target else {
            report.trees_skipped += 1;
            continue;
        };
        let tree = build_tree(landscape, record.id, species, pixel, &record.values);
        landscape.resource_units[slot].trees.push(tree);
        touched.insert(slot);
        report.trees_loaded += 1;
    }
    Ok(touched)
}
