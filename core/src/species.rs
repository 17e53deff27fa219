//! Species catalog and the light-interaction stamps derived from tree size.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Species {
    /// Short catalog code, e.g. "piab". Persisted in tree records.
    pub id: String,
    pub name: String,
    /// Crown radius (m) per cm of diameter.
    pub crown_radius_per_cm: f64,
    /// Upper bound on the stamp radius, in light pixels.
    pub max_stamp_radius: i32,
    /// Shading strength of a full crown, 0..1.
    pub shading: f64,
}

/// Light-interaction pattern of a single tree. Always derived from
/// diameter and height, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub dbh_class: u16,
    pub hd_class: u16,
    /// Radius in light pixels around the tree's own pixel.
    pub radius: i32,
}

impl Species {
    pub fn stamp(&self, dbh: f32, height: f32) -> Stamp {
        let dbh = f64::from(dbh.max(0.0));
        let height = f64::from(height.max(0.0));
        let dbh_class = (dbh / 5.0).floor().min(u16::MAX as f64) as u16;
        let hd = if dbh > 0.0 { height * 100.0 / dbh } else { 0.0 };
        let hd_class = (hd / 10.0).floor().clamp(0.0, 25.0) as u16;
        let crown_radius = dbh * self.crown_radius_per_cm;
        let radius = ((crown_radius / crate::types::LIGHT_CELL_SIZE).ceil() as i32)
            .clamp(0, self.max_stamp_radius);
        Stamp { dbh_class, hd_class, radius }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesSet {
    species: Vec<Species>,
}

impl SpeciesSet {
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Species> {
        self.species.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.species.iter().position(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spruce() -> Species {
        Species {
            id: "piab".into(),
            name: "Picea abies".into(),
            crown_radius_per_cm: 0.1,
            max_stamp_radius: 8,
            shading: 0.6,
        }
    }

    #[test]
    fn stamp_grows_with_diameter_and_caps() {
        let s = spruce();
        let small = s.stamp(10.0, 12.0);
        let large = s.stamp(60.0, 30.0);
        let huge = s.stamp(400.0, 40.0);
        assert!(small.radius < large.radius);
        assert_eq!(huge.radius, 8);
        assert_eq!(small.dbh_class, 2);
        assert_eq!(small.hd_class, 12);
    }

    #[test]
    fn lookup_by_id_and_index_agree() {
        let set = SpeciesSet::new(vec![spruce()]);
        assert_eq!(set.index_of("piab"), Some(0));
        assert_eq!(set.get(0).map(|s| s.id.as_str()), Some("piab"));
        assert_eq!(set.index_of("fasy"), None);
    }
}
