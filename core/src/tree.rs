//! Individual trees as owned by a resource unit.

use crate::{species::Stamp, types::PixelPos};

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Unique within the owning resource unit's save batch only.
    pub id: i32,
    /// Index into the landscape's species set.
    pub species: usize,
    /// Absolute light-grid pixel.
    pub pixel: PixelPos,
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

    // Derived state, rebuilt after a load.
    pub stamp: Option<Stamp>,
    pub light_resource_index: f32,
}

impl Tree {
    pub fn new(id: i32, species: usize, pixel: PixelPos) -> Self {
        Self {
            id,
            species,
            pixel,
            age: 0,
            height: 0.0,
            dbh: 0.0,
            leaf_area: 0.0,
            opacity: 0.0,
            foliage_mass: 0.0,
            stem_mass: 0.0,
            fine_root_mass: 0.0,
            coarse_root_mass: 0.0,
            npp_reserve: 0.0,
            stress_index: 0.0,
            stamp: None,
            light_resource_index: 0.0,
        }
    }

    /// Basal area in m².
    pub fn basal_area(&self) -> f64 {
        let r = f64::from(self.dbh) / 200.0;
        std::f64::consts::PI * r * r
    }
}
