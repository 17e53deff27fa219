use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot store '{path}' cannot be opened: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(
        "Loading of snapshot '{path}' failed: the offset from the current project location \
         ({offset_x}/{offset_y}) is not a multiple of the resource unit size relative to the \
         snapshot grid (origin-x: {origin_x}, origin-y: {origin_y})"
    )]
    SpatialMisalignment {
        path: PathBuf,
        origin_x: f64,
        origin_y: f64,
        offset_x: f64,
        offset_y: f64,
    },

    #[error("Snapshot references unknown species '{species}'")]
    UnknownSpecies { species: String },

    #[error("Snapshot holds {module} data for resource unit {ru_index}, but {module} is disabled in this run")]
    ConfigurationMismatch { ru_index: i32, module: &'static str },

    #[error("Invalid raster '{path}': {reason}")]
    Raster { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
