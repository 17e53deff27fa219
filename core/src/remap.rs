//! Correspondence between resource-unit indices stored in a snapshot and
//! the resource units of the live landscape.
//!
//! With no usable index raster next to the snapshot the mapping is the
//! identity (same landscape reloaded). Otherwise every live unit samples the
//! raster at its real-world cell centre to learn which stored index covered
//! that spot at save time.

use crate::{
    error::{SnapshotError, SnapshotResult},
    landscape::Landscape,
    raster::AsciiRaster,
    types::RU_SIZE,
};
use std::collections::HashMap;
use std::path::Path;

const ALIGNMENT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default)]
pub struct ResourceUnitRemap {
    /// Stored index -> position in `Landscape::resource_units`.
    slots: HashMap<i32, usize>,
    identity: bool,
}

impl ResourceUnitRemap {
    /// Stored index == live index.
    pub fn identity(landscape: &Landscape) -> Self {
        let slots = landscape
            .resource_units
            .iter()
            .enumerate()
            .filter(|(_, ru)| ru.index >= 0)
            .map(|(slot, ru)| (ru.index, slot))
            .collect();
        Self { slots, identity: true }
    }

    /// Build from the companion raster at `raster_path`; falls back to the
    /// identity when it is missing or unreadable. A raster whose origin is
    /// not tile-aligned with the live landscape is a hard error.
    pub fn build(landscape: &Landscape, raster_path: &Path, snapshot_path: &Path) -> SnapshotResult<Self> {
        let raster = match AsciiRaster::read(raster_path) {
            Ok(r) => r,
            Err(e) => {
                log::warn!(
                    "snapshot: no valid resource unit index grid at {} ({e}); assuming identical landscape",
                    raster_path.display()
                );
                return Ok(Self::identity(landscape));
            }
        };
        Self::from_raster(landscape, &raster, snapshot_path)
    }

    pub fn from_raster(landscape: &Landscape, raster: &AsciiRaster, snapshot_path: &Path) -> SnapshotResult<Self> {
        let (to_x, to_y) = landscape.gis.gis_to_model(raster.xll, raster.yll);
        if !is_tile_aligned(to_x) || !is_tile_aligned(to_y) {
            let (offset_x, offset_y) = landscape.gis.model_to_gis(0.0, 0.0);
            return Err(SnapshotError::SpatialMisalignment {
                path: snapshot_path.to_path_buf(),
                origin_x: raster.xll,
                origin_y: raster.yll,
                offset_x,
                offset_y,
            });
        }

        let ru_grid = landscape.ru_grid();
        let mut slots = HashMap::new();
        for (slot, ru) in landscape.resource_units.iter().enumerate() {
            if ru.index < 0 {
                continue;
            }
            let (cx, cy) = ru_grid.cell_center(ru.cell);
            let (gx, gy) = landscape.gis.model_to_gis(cx, cy);
            match raster.value_at(gx, gy) {
                Some(stored) if stored > -1.0 => {
                    slots.insert(stored as i32, slot);
                }
                _ => {}
            }
        }
        log::debug!(
            "snapshot: remapped {} of {} resource units through index grid",
            slots.len(),
            landscape.resource_units.len()
        );
        Ok(Self { slots, identity: false })
    }

    /// Live resource-unit slot for a stored index, if the live landscape covers it.
    pub fn resolve(&self, stored_index: i32) -> Option<usize> {
        self.slots.get(&stored_index).copied()
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn is_tile_aligned(v: f64) -> bool {
    let r = v.rem_euclid(RU_SIZE);
    r < ALIGNMENT_TOLERANCE || RU_SIZE - r < ALIGNMENT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapshotConfig;

    fn landscape_at(origin_x: f64) -> Landscape {
        let mut config = SnapshotConfig::default_test();
        config.landscape.gis_origin_x = origin_x;
        Landscape::from_config(&config)
    }

    fn index_raster() -> AsciiRaster {
        // Two units saved at real-world x 0..200.
        AsciiRaster::parse("ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 100\nNODATA_value -9999\n0 1\n")
            .expect("raster")
    }

    #[test]
    fn identity_maps_every_live_unit() {
        let landscape = landscape_at(0.0);
        let remap = ResourceUnitRemap::identity(&landscape);
        assert!(remap.is_identity());
        assert_eq!(remap.resolve(0), Some(0));
        assert_eq!(remap.resolve(1), Some(1));
        assert_eq!(remap.resolve(2), None);
    }

    #[test]
    fn shifted_landscape_picks_up_overlapping_unit() {
        let landscape = landscape_at(-100.0);
        let remap = ResourceUnitRemap::from_raster(&landscape, &index_raster(), Path::new("s.db"))
            .expect("aligned");
        assert_eq!(remap.resolve(0), Some(1));
        assert_eq!(remap.resolve(1), None);
        assert_eq!(remap.len(), 1);
    }

    #[test]
    fn misaligned_raster_is_rejected() {
        let landscape = landscape_at(-130.0);
        let err = ResourceUnitRemap::from_raster(&landscape, &index_raster(), Path::new("s.db"))
            .expect_err("misaligned");
        assert!(matches!(err, SnapshotError::SpatialMisalignment { .. }));
    }

    #[test]
    fn missing_raster_falls_back_to_identity() {
        let landscape = landscape_at(0.0);
        let remap = ResourceUnitRemap::build(&landscape, Path::new("/nonexistent/x.asc"), Path::new("x.db"))
            .expect("fallback");
        assert!(remap.is_identity());
    }
}
