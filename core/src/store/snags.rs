//! `snag` queries.

use super::{SnapshotStore, SnapshotWriter};
use crate::{
    error::SnapshotResult,
    snag_codec::{SnagRecord, SNAG_REAL_COLUMNS},
};
use rusqlite::types::Value;

/// Real-valued columns, in `SnagState::visit_reals` order.
const REAL_COLUMNS: &str = "climateFactor, SWD1C, SWD1N, SWD2C, SWD2N, SWD3C, SWD3N, \
     totalSWDC, totalSWDN, NSnags1, NSnags2, NSnags3, dbh1, dbh2, dbh3, \
     height1, height2, height3, volume1, volume2, volume3, tsd1, tsd2, tsd3, \
     ksw1, ksw2, ksw3, halflife1, halflife2, halflife3, \
     branch1C, branch1N, branch2C, branch2N, branch3C, branch3N, \
     branch4C, branch4N, branch5C, branch5N";

impl SnapshotWriter<'_> {
    pub fn insert_snags(&self, records: &[SnagRecord]) -> SnapshotResult<()> {
        let placeholders = vec!["?"; SNAG_REAL_COLUMNS + 2].join(", ");
        let mut stmt = self.tx.prepare_cached(&format!(
            "INSERT INTO snag (RUIndex, {REAL_COLUMNS}, branchIndex) VALUES ({placeholders})"
        ))?;
        for s in records {
            let mut values = Vec::with_capacity(SNAG_REAL_COLUMNS + 2);
            values.push(Value::Integer(i64::from(s.ru_index)));
            values.extend(s.real_columns().into_iter().map(Value::Real));
            values.push(Value::Integer(s.state.branches.index as i64));
            stmt.execute(rusqlite::params_from_iter(values))?;
        }
        Ok(())
    }
}

impl SnapshotStore {
    pub fn read_snags(&self) -> SnapshotResult<Vec<SnagRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT RUIndex, {REAL_COLUMNS}, branchIndex FROM snag ORDER BY rowid"
        ))?;
        let rows = stmt.query_map([], |r| {
            let ru_index: i32 = r.get(0)?;
            let mut reals = Vec::with_capacity(SNAG_REAL_COLUMNS);
            for i in 1..=SNAG_REAL_COLUMNS {
                reals.push(r.get::<_, f64>(i)?);
            }
            let branch_col = SNAG_REAL_COLUMNS + 1;
            let branch_index: i64 = r.get(branch_col)?;
            SnagRecord::from_columns(ru_index, &reals, branch_index)
                .ok_or(rusqlite::Error::IntegralValueOutOfRange(branch_col, branch_index))
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
    use crate::{snags::SnagState, types::CNPair};

    #[test]
    fn snag_columns_survive_the_table() {
        let mut state = SnagState { climate_factor: 0.9, ..SnagState::default() };
        state.classes[0].pool = CNPair::new(800.0, 2.0);
        state.classes[2].decay_rate = 0.04;
        state.branches.slots[4] = CNPair::new(31.0, 0.3);
        state.branches.index = 4;
        let records = vec![SnagRecord { ru_index: 1, state }];

        let mut store = SnapshotStore::in_memory().expect("store");
        let writer = store.writer().expect("writer");
        writer.reset_landscape_tables().expect("reset");
        writer.insert_snags(&records).expect("insert");
        writer.commit().expect("commit");

        assert_eq!(store.read_snags().expect("read"), records);
    }

    #[test]
    fn branch_index_outside_ring_is_a_schema_error() {
        let mut store = SnapshotStore::in_memory().expect("store");
        let writer = store.writer().expect("writer");
        writer.reset_landscape_tables().expect("reset");
        writer
            .insert_snags(&[SnagRecord { ru_index: 0, state: SnagState::default() }])
            .expect("insert");
        writer.commit().expect("commit");
        store
            .conn
            .execute("UPDATE snag SET branchIndex = 7", [])
            .expect("update");

        let err = store.read_snags().expect_err("index 7 is outside the ring");
        assert!(matches!(
            err,
            crate::error::SnapshotError::Database(rusqlite::Error::IntegralValueOutOfRange(_, 7))
        ));
    }
}
