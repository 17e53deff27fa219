//! Standing deadwood and the rotating branch-litter buffer.

use crate::types::CNPair;

pub const SNAG_CLASSES: usize = 3;
pub const BRANCH_YEARS: usize = 5;

/// One diameter class of standing dead wood.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnagClass {
    pub pool: CNPair,
    pub count: f64,
    pub mean_dbh: f64,
    pub mean_height: f64,
    pub mean_volume: f64,
    pub time_since_death: f64,
    pub decay_rate: f64,
    pub half_life: f64,
}

/// Fixed five-year branch and coarse-root litter buffer. `index` is the
/// slot the next year's input is written to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BranchRing {
    pub slots: [CNPair; BRANCH_YEARS],
    pub index: usize,
}

impl BranchRing {
    /// Add this year's input to the current slot.
    pub fn add(&mut self, input: CNPair) {
        self.slots[self.index] += input;
    }

    /// Move to the next year, handing back the slot that falls out of the
    /// buffer (it becomes the new, empty current slot).
    pub fn advance(&mut self) -> CNPair {
        self.index = (self.index + 1) % BRANCH_YEARS;
        std::mem::take(&mut self.slots[self.index])
    }

    pub fn total(&self) -> CNPair {
        let mut sum = CNPair::default();
        for slot in &self.slots {
            sum += *slot;
        }
        sum
    }
}

/// Exactly the persisted field set of a snag pool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnagState {
    pub climate_factor: f64,
    pub classes: [SnagClass; SNAG_CLASSES],
    pub total_standing: CNPair,
    pub branches: BranchRing,
}

impl SnagState {
    /// Walk every real-valued field in persisted column order. Reading and
    /// writing both go through here, so the order cannot drift apart.
    pub fn visit_reals(&mut self, mut f: impl FnMut(&mut f64)) {
        f(&mut self.climate_factor);
        for class in &mut self.classes {
            f(&mut class.pool.c);
            f(&mut class.pool.n);
        }
        f(&mut self.total_standing.c);
        f(&mut self.total_standing.n);
        for class in &mut self.classes {
            f(&mut class.count);
        }
        for class in &mut self.classes {
            f(&mut class.mean_dbh);
        }
        for class in &mut self.classes {
            f(&mut class.mean_height);
        }
        for class in &mut self.classes {
            f(&mut class.mean_volume);
        }
        for class in &mut self.classes {
            f(&mut class.time_since_death);
        }
        for class in &mut self.classes {
            f(&mut class.decay_rate);
        }
        for class in &mut self.classes {
            f(&mut class.half_life);
        }
        for slot in &mut self.branches.slots {
            f(&mut slot.c);
            f(&mut slot.n);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snags {
    state: SnagState,
}

impl Snags {
    pub fn new(climate_factor: f64) -> Self {
        Self {
            state: SnagState { climate_factor, ..SnagState::default() },
        }
    }

    pub fn state(&self) -> SnagState {
        self.state
    }

    pub fn restore(&mut self, state: &SnagState) {
        self.state = *state;
    }

    /// Carbon in standing snags plus the branch buffer.
    pub fn total_carbon(&self) -> f64 {
        self.state.total_standing.c + self.state.branches.total().c
    }
}
