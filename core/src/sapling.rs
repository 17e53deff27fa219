//! Regeneration layer: per-pixel sapling cells with a fixed number of slots.

use crate::types::NSAPCELLS;

/// Bit flags packed into `SaplingTree::flags`.
pub const FLAG_SPROUT: u8 = 0x01;
pub const FLAG_BROWSED: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaplingTree {
    pub age: u16,
    /// Height in m; a slot is occupied when this is > 0.
    pub height: f32,
    /// Index into the species set, -1 for an empty slot.
    pub species_index: i16,
    /// Consecutive years under stress.
    pub stress_years: u8,
    pub flags: u8,
}

impl Default for SaplingTree {
    fn default() -> Self {
        Self { age: 0, height: 0.0, species_index: -1, stress_years: 0, flags: 0 }
    }
}

impl SaplingTree {
    pub fn is_occupied(&self) -> bool {
        self.height > 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_sprout(&self) -> bool {
        self.flags & FLAG_SPROUT != 0
    }

    pub fn set_sprout(&mut self, sprout: bool) {
        self.set_flag(FLAG_SPROUT, sprout);
    }

    pub fn is_browsed(&self) -> bool {
        self.flags & FLAG_BROWSED != 0
    }

    pub fn set_browsed(&mut self, browsed: bool) {
        self.set_flag(FLAG_BROWSED, browsed);
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaplingCell {
    /// False for pixels outside any active resource unit.
    pub on_landscape: bool,
    pub saplings: [SaplingTree; NSAPCELLS],
}

impl Default for SaplingCell {
    fn default() -> Self {
        Self { on_landscape: false, saplings: [SaplingTree::default(); NSAPCELLS] }
    }
}

impl SaplingCell {
    pub fn free_slot(&self) -> Option<usize> {
        self.saplings.iter().position(|s| !s.is_occupied())
    }

    pub fn occupied_count(&self) -> usize {
        self.saplings.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn occupied(&self) -> impl Iterator<Item = &SaplingTree> {
        self.saplings.iter().filter(|s| s.is_occupied())
    }

    /// Put a sapling into the first free slot. Returns `None` when the cell
    /// is full; the cell never grows beyond `NSAPCELLS`.
    pub fn add_if_slot_free(&mut self, height: f32, age: u16, species_index: i16) -> Option<&mut SaplingTree> {
        let slot = self.free_slot()?;
        let sapling = &mut self.saplings[slot];
        *sapling = SaplingTree { age, height, species_index, stress_years: 0, flags: 0 };
        Some(sapling)
    }

    /// Empty every slot, returning how many were occupied.
    pub fn clear(&mut self) -> usize {
        let n = self.occupied_count();
        self.saplings.iter_mut().for_each(SaplingTree::clear);
        n
    }
}
