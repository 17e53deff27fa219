//! `trees` and `trees_stand` queries.

use super::{SnapshotStore, SnapshotWriter};
use crate::{
    error::SnapshotResult,
    tree_codec::{StandTreeRecord, TreeRecord, TreeValues},
    types::StandId,
};
use rusqlite::{params, Row};

/// Scalar columns starting at `first`, in table order.
fn values_from_row(r: &Row<'_>, first: usize) -> rusqlite::Result<TreeValues> {
    let real = |i: usize| r.get::<_, f64>(first + i).map(|v| v as f32);
    Ok(TreeValues {
        age: r.get(first)?,
        height: real(1)?,
        dbh: real(2)?,
        leaf_area: real(3)?,
        opacity: real(4)?,
        foliage_mass: real(5)?,
        stem_mass: real(6)?,
        fine_root_mass: real(7)?,
        coarse_root_mass: real(8)?,
        npp_reserve: real(9)?,
        stress_index: real(10)?,
    })
}

fn value_columns(v: &TreeValues) -> [f64; 10] {
    [
        v.height,
        v.dbh,
        v.leaf_area,
        v.opacity,
        v.foliage_mass,
        v.stem_mass,
        v.fine_root_mass,
        v.coarse_root_mass,
        v.npp_reserve,
        v.stress_index,
    ]
    .map(f64::from)
}

impl SnapshotWriter<'_> {
    pub fn insert_trees(&self, records: &[TreeRecord]) -> SnapshotResult<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO trees (ID, RUindex, posX, posY, species, age, height, dbh, leafArea,
                                opacity, foliageMass, woodyMass, fineRootMass, coarseRootMass,
                                NPPReserve, stressIndex)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        for t in records {
            let v = value_columns(&t.values);
            stmt.execute(params![
                t.id, t.ru_index, t.x, t.y, t.species, t.values.age,
                v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8], v[9],
            ])?;
        }
        Ok(())
    }

    /// Replace every stored tree of `stand_id` with `records`.
    pub fn replace_stand_trees(&self, stand_id: StandId, records: &[StandTreeRecord]) -> SnapshotResult<usize> {
        let removed = self
            .tx
            .execute("DELETE FROM trees_stand WHERE standID = ?1", params![stand_id])?;
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO trees_stand (standID, ID, posX, posY, species, age, height, dbh, leafArea,
                                      opacity, foliageMass, woodyMass, fineRootMass, coarseRootMass,
                                      NPPReserve, stressIndex)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        for t in records {
            let v = value_columns(&t.values);
            stmt.execute(params![
                t.stand_id, t.id, t.x, t.y, t.species, t.values.age,
                v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8], v[9],
            ])?;
        }
        Ok(removed)
    }
}

impl SnapshotStore {
    pub fn read_trees(&self) -> SnapshotResult<Vec<TreeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT ID, RUindex, posX, posY, species, age, height, dbh, leafArea, opacity,
                    foliageMass, woodyMass, fineRootMass, coarseRootMass, NPPReserve, stressIndex
             FROM trees ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(TreeRecord {
                id: r.get(0)?,
                ru_index: r.get(1)?,
                x: r.get(2)?,
                y: r.get(3)?,
                species: r.get(4)?,
                values: values_from_row(r, 5)?,
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    pub fn read_stand_trees(&self, stand_id: StandId) -> SnapshotResult<Vec<StandTreeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT standID, ID, posX, posY, species, age, height, dbh, leafArea, opacity,
                    foliageMass, woodyMass, fineRootMass, coarseRootMass, NPPReserve, stressIndex
             FROM trees_stand WHERE standID = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![stand_id], |r| {
            Ok(StandTreeRecord {
                stand_id: r.get(0)?,
                id: r.get(1)?,
                x: r.get(2)?,
                y: r.get(3)?,
                species: r.get(4)?,
                values: values_from_row(r, 5)?,
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }
}
