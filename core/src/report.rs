//! Counters returned by every snapshot operation.
//!
//! Non-fatal conditions (record outside the live landscape, full sapling
//! cell, stored unit without a live counterpart) end up here instead of
//! aborting the pass.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub trees: usize,
    pub soil: usize,
    pub snags: usize,
    pub saplings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// True when a companion index raster drove the remapping.
    pub remapped: bool,
    pub trees_loaded: usize,
    /// Tree records with no live resource unit or outside the live extent.
    pub trees_skipped: usize,
    /// Live trees removed before a stand-scoped load.
    pub trees_removed: usize,
    pub soil_loaded: usize,
    pub soil_skipped: usize,
    pub snags_loaded: usize,
    pub snags_skipped: usize,
    pub saplings_loaded: usize,
    /// Sapling records whose target cell had no free slot.
    pub saplings_dropped: usize,
    /// Sapling records with no live resource unit or cell.
    pub saplings_skipped: usize,
    /// Live saplings cleared before a stand-scoped load.
    pub saplings_removed: usize,
}
