//! Snag pools <-> `snag` records.
//!
//! The 40 real columns follow `SnagState::visit_reals`; the branch-ring
//! position is stored separately as an integer.

use crate::{
    error::SnapshotResult,
    landscape::Landscape,
    remap::ResourceUnitRemap,
    report::LoadReport,
    snags::{SnagState, BRANCH_YEARS},
};

pub const SNAG_REAL_COLUMNS: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct SnagRecord {
    pub ru_index: i32,
    pub state: SnagState,
}

impl SnagRecord {
    pub fn real_columns(&self) -> Vec<f64> {
        let mut state = self.state;
        let mut out = Vec::with_capacity(SNAG_REAL_COLUMNS);
        state.visit_reals(|v| out.push(*v));
        out
    }

    /// Rebuild from stored columns. Returns `None` if `reals` has the wrong
    /// length or `branch_index` is outside the ring.
    pub fn from_columns(ru_index: i32, reals: &[f64], branch_index: i64) -> Option<Self> {
        if reals.len() != SNAG_REAL_COLUMNS {
            return None;
        }
        let index = usize::try_from(branch_index).ok().filter(|i| *i < BRANCH_YEARS)?;
        let mut state = SnagState::default();
        let mut values = reals.iter();
        state.visit_reals(|v| {
            if let Some(x) = values.next() {
                *v = *x;
            }
        });
        state.branches.index = index;
        Some(Self { ru_index, state })
    }
}

pub fn capture_snags(landscape: &Landscape) -> Vec<SnagRecord> {
    landscape
        .resource_units
        .iter()
        .filter_map(|ru| {
            let snags = ru.snags.as_ref()?;
            Some(SnagRecord { ru_index: ru.index, state: snags.state() })
        })
        .collect()
}

/// Records for units that have no snag pool in the live model are skipped.
pub fn restore_snags(
    landscape: &mut Landscape,
    records: &[SnagRecord],
    remap: &ResourceUnitRemap,
    report: &mut LoadReport,
) -> SnapshotResult<()> {
    for record in records {
        let snags = remap
            .resolve(record.ru_index)
            .and_then(|slot| landscape.resource_units[slot].snags.as_mut());
        match snags {
            Some(snags) => {
                snags.restore(&record.state);
                report.snags_loaded += 1;
            }
            None => report.snags_skipped += 1,
        }
    }
    log::debug!(
        "snapshot: loaded snags for {} resource units ({} skipped)",
        report.snags_loaded,
        report.snags_skipped
    );
    Ok(())
}
