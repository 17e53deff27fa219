use crate::species::Species;
use serde::{Deserialize, Serialize};

/// Process-wide model switches the snapshot code consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// When false, sapling records are neither saved nor loaded.
    pub regeneration_enabled: bool,
    /// Log a progress line every this many trees/saplings.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_progress_interval() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandscapeConfig {
    pub ru_columns: i32,
    pub ru_rows: i32,
    /// Real-world coordinate of the model origin (south-west corner).
    pub gis_origin_x: f64,
    pub gis_origin_y: f64,
    #[serde(default = "default_true")]
    pub soil_enabled: bool,
    #[serde(default = "default_true")]
    pub snags_enabled: bool,
    /// Resource-unit cells (x, y) left out of the simulated area.
    #[serde(default)]
    pub inactive_cells: Vec<[i32; 2]>,
    pub soil_kyl: f64,
    pub soil_kyr: f64,
    pub snag_climate_factor: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct SpeciesFile {
    species: Vec<Species>,
}

#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub settings: ModelSettings,
    pub landscape: LandscapeConfig,
    pub species: Vec<Species>,
}

impl SnapshotConfig {
    /// Load from the data/ directory.
    /// In tests, use SnapshotConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let settings_path = format!("{data_dir}/model_settings.json");
        let settings_content = std::fs::read_to_string(&settings_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {settings_path}: {e}"))?;
        let settings: ModelSettings = serde_json::from_str(&settings_content)?;

        let landscape_path = format!("{data_dir}/landscape.json");
        let landscape_content = std::fs::read_to_string(&landscape_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {landscape_path}: {e}"))?;
        let landscape: LandscapeConfig = serde_json::from_str(&landscape_content)?;
        if landscape.ru_columns <= 0 || landscape.ru_rows <= 0 {
            anyhow::bail!(
                "{landscape_path}: landscape needs at least one resource unit, got {} x {}",
                landscape.ru_columns,
                landscape.ru_rows
            );
        }

        let species_path = format!("{data_dir}/species.json");
        let species_content = std::fs::read_to_string(&species_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {species_path}: {e}"))?;
        let species_file: SpeciesFile = serde_json::from_str(&species_content)?;
        if species_file.species.is_empty() {
            anyhow::bail!("{species_path} defines no species");
        }

        Ok(Self { settings, landscape, species: species_file.species })
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Two resource units side by side, three species.
    pub fn default_test() -> Self {
        Self {
            settings: ModelSettings {
                regeneration_enabled: true,
                progress_interval: 10_000,
            },
            landscape: LandscapeConfig {
                ru_columns: 2,
                ru_rows: 1,
                gis_origin_x: 0.0,
                gis_origin_y: 0.0,
                soil_enabled: true,
                snags_enabled: true,
                inactive_cells: Vec::new(),
                soil_kyl: 0.33,
                soil_kyr: 0.0807,
                snag_climate_factor: 1.0,
            },
            species: vec![
                Species {
                    id: "piab".into(),
                    name: "Picea abies".into(),
                    crown_radius_per_cm: 0.08,
                    max_stamp_radius: 6,
                    shading: 0.7,
                },
                Species {
                    id: "fasy".into(),
                    name: "Fagus sylvatica".into(),
                    crown_radius_per_cm: 0.12,
                    max_stamp_radius: 8,
                    shading: 0.8,
                },
                Species {
                    id: "lade".into(),
                    name: "Larix decidua".into(),
                    crown_radius_per_cm: 0.07,
                    max_stamp_radius: 6,
                    shading: 0.4,
                },
            ],
        }
    }
}
