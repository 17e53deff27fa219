//! `saplings` and `saplings_stand` queries.

use super::{SnapshotStore, SnapshotWriter};
use crate::{
    error::SnapshotResult,
    sapling_codec::{SaplingRecord, SaplingValues, StandSaplingRecord},
    types::StandId,
};
use rusqlite::{params, Row};

/// Narrow a stored integer into the in-memory field type.
fn narrow<T: TryFrom<i64>>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let v: i64 = r.get(idx)?;
    T::try_from(v).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, v))
}

/// Reads `species_index, age, height, stress_years, flags` at the given columns.
fn values_from_row(r: &Row<'_>, cols: [usize; 5]) -> rusqlite::Result<SaplingValues> {
    Ok(SaplingValues {
        species_index: narrow(r, cols[0])?,
        age: narrow(r, cols[1])?,
        height: r.get::<_, f64>(cols[2])? as f32,
        stress_years: narrow(r, cols[3])?,
        flags: narrow(r, cols[4])?,
    })
}

impl SnapshotWriter<'_> {
    pub fn insert_saplings(&self, records: &[SaplingRecord]) -> SnapshotResult<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO saplings (RUindex, species_index, posx, posy, age, height, stress_years, flags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for s in records {
            let v = &s.values;
            stmt.execute(params![
                s.ru_index,
                i64::from(v.species_index),
                s.x,
                s.y,
                i64::from(v.age),
                f64::from(v.height),
                i64::from(v.stress_years),
                i64::from(v.flags),
            ])?;
        }
        Ok(())
    }

    /// Number of stored saplings of `stand_id`.
    pub fn stand_sapling_rows(&self, stand_id: StandId) -> SnapshotResult<usize> {
        let n: i64 = self.tx.query_row(
            "SELECT COUNT(*) FROM saplings_stand WHERE standID = ?1",
            params![stand_id],
            |r| r.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    /// Replace every stored sapling of `stand_id` with `records`.
    pub fn replace_stand_saplings(
        &self,
        stand_id: StandId,
        records: &[StandSaplingRecord],
    ) -> SnapshotResult<usize> {
        let removed = self
            .tx
            .execute("DELETE FROM saplings_stand WHERE standID = ?1", params![stand_id])?;
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO saplings_stand (standID, posx, posy, species_index, age, height, stress_years, flags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for s in records {
            let v = &s.values;
            stmt.execute(params![
                s.stand_id,
                s.x,
                s.y,
                i64::from(v.species_index),
                i64::from(v.age),
                f64::from(v.height),
                i64::from(v.stress_years),
                i64::from(v.flags),
            ])?;
        }
        Ok(removed)
    }
}

impl SnapshotStore {
    pub fn read_saplings(&self) -> SnapshotResult<Vec<SaplingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT RUindex, species_index, posx, posy, age, height, stress_years, flags
             FROM saplings ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(SaplingRecord {
                ru_index: r.get(0)?,
                x: r.get(2)?,
                y: r.get(3)?,
                values: values_from_row(r, [1, 4, 5, 6, 7])?,
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    pub fn read_stand_saplings(&self, stand_id: StandId) -> SnapshotResult<Vec<StandSaplingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT standID, posx, posy, species_index, age, height, stress_years, flags
             FROM saplings_stand WHERE standID = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![stand_id], |r| {
            Ok(StandSaplingRecord {
                stand_id: r.get(0)?,
                x: r.get(1)?,
                y: r.get(2)?,
                values: values_from_row(r, [3, 4, 5, 6, 7])?,
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_age_is_a_schema_error() {
        let mut store = SnapshotStore::in_memory().expect("store");
        let writer = store.writer().expect("writer");
        writer.reset_landscape_tables().expect("reset");
        writer.commit().expect("commit");
        store
            .conn
            .execute(
                "INSERT INTO saplings (RUindex, species_index, posx, posy, age, height, stress_years, flags)
                 VALUES (0, 1, 3, 3, -2, 0.5, 0, 0)",
                [],
            )
            .expect("insert");

        assert!(store.read_saplings().is_err());
    }

    #[test]
    fn sapling_flags_and_stress_survive_the_table() {
        let mut store = SnapshotStore::in_memory().expect("store");
        let record = SaplingRecord {
            ru_index: 1,
            x: 88,
            y: 12,
            values: SaplingValues { species_index: 2, age: 7, height: 1.375, stress_years: 3, flags: 0x03 },
        };
        let writer = store.writer().expect("writer");
        writer.reset_landscape_tables().expect("reset");
        writer.insert_saplings(std::slice::from_ref(&record)).expect("insert");
        writer.commit().expect("commit");

        assert_eq!(store.read_saplings().expect("read"), vec![record]);
    }

    #[test]
    fn stand_sapling_rows_counts_one_stand() {
        let mut store = SnapshotStore::in_memory().expect("store");
        store
            .conn
            .execute_batch(include_str!("../../migrations/002_stand_snapshot.sql"))
            .expect("schema");
        let sapling = |stand_id| StandSaplingRecord {
            stand_id,
            x: 3.0,
            y: 5.0,
            values: SaplingValues { species_index: 0, age: 2, height: 0.4, stress_years: 0, flags: 0 },
        };
        let writer = store.writer().expect("writer");
        writer.replace_stand_saplings(1, &[sapling(1), sapling(1)]).expect("stand 1");
        writer.replace_stand_saplings(2, &[sapling(2)]).expect("stand 2");

        assert_eq!(writer.stand_sapling_rows(1).expect("count"), 2);
        assert_eq!(writer.stand_sapling_rows(2).expect("count"), 1);
        assert_eq!(writer.stand_sapling_rows(3).expect("count"), 0);
    }
}
