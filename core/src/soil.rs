//! Soil carbon/nitrogen pools and the water-cycle scalars persisted with them.
//!
//! The snapshot code only ever sees `SoilState`; the pool layout below
//! stays private to this module.

use crate::types::CNPair;
use serde::{Deserialize, Serialize};

/// A decomposing pool: carbon/nitrogen mass plus its decomposition parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DecomposingPool {
    pub mass: CNPair,
    /// Pool-specific decomposition rate. Carries calibration state that
    /// cannot be recovered from `mass` alone.
    pub parameter: f64,
}

impl DecomposingPool {
    pub const fn new(c: f64, n: f64, parameter: f64) -> Self {
        Self { mass: CNPair::new(c, n), parameter }
    }
}

/// Exactly the persisted field set of a soil pool.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoilState {
    pub kyl: f64,
    pub kyr: f64,
    pub input_labile: DecomposingPool,
    pub input_refractory: DecomposingPool,
    pub young_labile: DecomposingPool,
    pub young_refractory: DecomposingPool,
    pub organic_matter: CNPair,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Soil {
    kyl: f64,
    kyr: f64,
    input_labile: DecomposingPool,
    input_refractory: DecomposingPool,
    young_labile: DecomposingPool,
    young_refractory: DecomposingPool,
    organic_matter: CNPair,
}

impl Soil {
    pub fn new(kyl: f64, kyr: f64) -> Self {
        Self {
            kyl,
            kyr,
            input_labile: DecomposingPool::new(0.0, 0.0, kyl),
            input_refractory: DecomposingPool::new(0.0, 0.0, kyr),
            young_labile: DecomposingPool::new(0.0, 0.0, kyl),
            young_refractory: DecomposingPool::new(0.0, 0.0, kyr),
            organic_matter: CNPair::default(),
        }
    }

    pub fn state(&self) -> SoilState {
        SoilState {
            kyl: self.kyl,
            kyr: self.kyr,
            input_labile: self.input_labile,
            input_refractory: self.input_refractory,
            young_labile: self.young_labile,
            young_refractory: self.young_refractory,
            organic_matter: self.organic_matter,
        }
    }

    pub fn restore(&mut self, state: &SoilState) {
        self.kyl = state.kyl;
        self.kyr = state.kyr;
        self.input_labile = state.input_labile;
        self.input_refractory = state.input_refractory;
        self.young_labile = state.young_labile;
        self.young_refractory = state.young_refractory;
        self.organic_matter = state.organic_matter;
    }

    /// Total soil carbon (kg/ha) over young and old pools.
    pub fn total_carbon(&self) -> f64 {
        self.young_labile.mass.c + self.young_refractory.mass.c + self.organic_matter.c
    }
}

/// Water content and snow pack of a resource unit. The two values are only
/// ever set together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterCycle {
    soil_water_content: f64,
    snow_pack: f64,
}

impl WaterCycle {
    pub fn content(&self) -> (f64, f64) {
        (self.soil_water_content, self.snow_pack)
    }

    pub fn set_content(&mut self, soil_water_content: f64, snow_pack: f64) {
        self.soil_water_content = soil_water_content;
        self.snow_pack = snow_pack;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_replaces_every_persisted_field() {
        let mut soil = Soil::new(0.3, 0.05);
        let state = SoilState {
            kyl: 0.25,
            kyr: 0.04,
            input_labile: DecomposingPool::new(10.0, 0.5, 0.31),
            input_refractory: DecomposingPool::new(20.0, 0.2, 0.06),
            young_labile: DecomposingPool::new(3000.0, 100.0, 0.27),
            young_refractory: DecomposingPool::new(8000.0, 40.0, 0.051),
            organic_matter: CNPair::new(90000.0, 4500.0),
        };
        soil.restore(&state);
        assert_eq!(soil.state(), state);
        assert_eq!(soil.total_carbon(), 3000.0 + 8000.0 + 90000.0);
    }
}
