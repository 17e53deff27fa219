//! Snapshot save/load for an individual-based forest landscape model.
//!
//! `snapshot` handles whole-landscape snapshots, `stand_snapshot` the
//! stand-scoped ones. Everything else is the landscape model they read
//! from and write into.

pub mod config;
pub mod demo;
pub mod error;
pub mod grid;
pub mod landscape;
pub mod raster;
pub mod remap;
pub mod report;
pub mod resource_unit;
pub mod rng;
pub mod sapling;
pub mod sapling_codec;
pub mod snag_codec;
pub mod snags;
pub mod snapshot;
pub mod soil;
pub mod soil_codec;
pub mod species;
pub mod stand;
pub mod stand_snapshot;
pub mod store;
pub mod tree;
pub mod tree_codec;
pub mod types;
