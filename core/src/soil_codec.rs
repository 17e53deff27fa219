//! Soil pools and water-cycle scalars <-> `soil` records.

use crate::{
    error::{SnapshotError, SnapshotResult},
    landscape::Landscape,
    remap::ResourceUnitRemap,
    report::LoadReport,
    soil::SoilState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SoilRecord {
    pub ru_index: i32,
    pub state: SoilState,
    pub water_content: f64,
    pub snow_pack: f64,
}

/// One record per resource unit that has a soil pool.
pub fn capture_soil(landscape: &Landscape) -> Vec<SoilRecord> {
    landscape
        .resource_units
        .iter()
        .filter_map(|ru| {
            let soil = ru.soil.as_ref()?;
            let (water_content, snow_pack) = ru.water.content();
            Some(SoilRecord { ru_index: ru.index, state: soil.state(), water_content, snow_pack })
        })
        .collect()
}

/// A record that maps onto a unit without soil means the live model was
/// configured differently from the one that saved the snapshot.
pub fn restore_soil(
    landscape: &mut Landscape,
    records: &[SoilRecord],
    remap: &ResourceUnitRemap,
    report: &mut LoadReport,
) -> SnapshotResult<()> {
    for record in records {
        let Some(slot) = remap.resolve(record.ru_index) else {
            report.soil_skipped += 1;
            continue;
        };
        let ru = &mut landscape.resource_units[slot];
        let Some(soil) = ru.soil.as_mut() else {
            return Err(SnapshotError::ConfigurationMismatch { ru_index: ru.index, module: "soil" });
        };
        soil.restore(&record.state);
        ru.water.set_content(record.water_content, record.snow_pack);
        report.soil_loaded += 1;
    }
    log::debug!("snapshot: loaded soil for {} resource units", report.soil_loaded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SnapshotConfig, soil::DecomposingPool, types::CNPair};

    fn record(ru_index: i32) -> SoilRecord {
        SoilRecord {
            ru_index,
            state: SoilState {
                kyl: 0.3,
                kyr: 0.07,
                input_labile: DecomposingPool::new(12.0, 0.4, 0.31),
                input_refractory: DecomposingPool::new(30.0, 0.15, 0.07),
                young_labile: DecomposingPool::new(2500.0, 80.0, 0.29),
                young_refractory: DecomposingPool::new(9000.0, 35.0, 0.06),
                organic_matter: CNPair::new(110_000.0, 6000.0),
            },
            water_content: 143.5,
            snow_pack: 12.0,
        }
    }

    #[test]
    fn restore_sets_pools_and_water_together() {
        let config = SnapshotConfig::default_test();
        let mut landscape = Landscape::from_config(&config);
        let remap = ResourceUnitRemap::identity(&landscape);
        let mut report = LoadReport::default();

        restore_soil(&mut landscape, &[record(1)], &remap, &mut report).expect("restore");

        let ru = &landscape.resource_units[1];
        assert_eq!(ru.soil.as_ref().map(|s| s.state()), Some(record(1).state));
        assert_eq!(ru.water.content(), (143.5, 12.0));
        assert_eq!(report.soil_loaded, 1);
    }

    #[test]
    fn unit_without_soil_is_a_configuration_mismatch() {
        let mut config = SnapshotConfig::default_test();
        config.landscape.soil_enabled = false;
        let mut landscape = Landscape::from_config(&config);
        let remap = ResourceUnitRemap::identity(&landscape);

        let err = restore_soil(&mut landscape, &[record(0)], &remap, &mut LoadReport::default())
            .expect_err("mismatch");
        assert!(matches!(err, SnapshotError::ConfigurationMismatch { ru_index: 0, module: "soil" }));
    }

    #[test]
    fn capture_skips_units_without_soil() {
        let mut config = SnapshotConfig::default_test();
        config.landscape.soil_enabled = false;
        let landscape = Landscape::from_config(&config);
        assert!(capture_soil(&landscape).is_empty());
    }
}
