//! `soil` queries.

use super::{SnapshotStore, SnapshotWriter};
use crate::{
    error::SnapshotResult,
    soil::{DecomposingPool, SoilState},
    soil_codec::SoilRecord,
    types::CNPair,
};
use rusqlite::params;

impl SnapshotWriter<'_> {
    pub fn insert_soil(&self, records: &[SoilRecord]) -> SnapshotResult<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO soil (RUindex, kyl, kyr, inLabC, inLabN, inLabP, inRefC, inRefN, inRefP,
                               YLC, YLN, YLP, YRC, YRN, YRP, SOMC, SOMN, WaterContent, SnowPack)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        )?;
        for s in records {
            let st = &s.state;
            stmt.execute(params![
                s.ru_index,
                st.kyl,
                st.kyr,
                st.input_labile.mass.c,
                st.input_labile.mass.n,
                st.input_labile.parameter,
                st.input_refractory.mass.c,
                st.input_refractory.mass.n,
                st.input_refractory.parameter,
                st.young_labile.mass.c,
                st.young_labile.mass.n,
                st.young_labile.parameter,
                st.young_refractory.mass.c,
                st.young_refractory.mass.n,
                st.young_refractory.parameter,
                st.organic_matter.c,
                st.organic_matter.n,
                s.water_content,
                s.snow_pack,
            ])?;
        }
        Ok(())
    }
}

impl SnapshotStore {
    pub fn read_soil(&self) -> SnapshotResult<Vec<SoilRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT RUindex, kyl, kyr, inLabC, inLabN, inLabP, inRefC, inRefN, inRefP,
                    YLC, YLN, YLP, YRC, YRN, YRP, SOMC, SOMN, WaterContent, SnowPack
             FROM soil ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |r| {
            let pool = |first: usize| -> rusqlite::Result<DecomposingPool> {
                Ok(DecomposingPool::new(r.get(first)?, r.get(first + 1)?, r.get(first + 2)?))
            };
            Ok(SoilRecord {
                ru_index: r.get(0)?,
                state: SoilState {
                    kyl: r.get(1)?,
                    kyr: r.get(2)?,
                    input_labile: pool(3)?,
                    input_refractory: pool(6)?,
                    young_labile: pool(9)?,
                    young_refractory: pool(12)?,
                    organic_matter: CNPair::new(r.get(15)?, r.get(16)?),
                },
                water_content: r.get(17)?,
                snow_pack: r.get(18)?,
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }
}
